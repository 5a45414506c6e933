//! Preset management commands.
//!
//! Provides commands to list, show, create, and delete stored presets.

#![allow(clippy::print_literal)]

use super::common::{Context, read_chain};
use anyhow::Context as _;
use clap::{Args, Subcommand};
use pedalrack_config::NewPreset;
use serde_json::{Map, Value};
use std::path::PathBuf;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List stored presets
    List {
        /// Print summaries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a preset and its resolved chain
    Show {
        /// Preset id
        id: String,

        /// Print the stored record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate an effect chain and store it as a preset
    Create {
        /// Name for the new preset
        name: String,

        /// Inline JSON chain
        #[arg(short, long, conflicts_with = "file")]
        chain: Option<String>,

        /// JSON file holding the chain ('-' reads stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Free-form metadata as a JSON object
        #[arg(long, value_name = "JSON")]
        metadata: Option<String>,
    },

    /// Delete a preset
    Delete {
        /// Preset id
        id: String,
    },

    /// Show the preset directory
    Paths,
}

pub fn run(ctx: &Context, args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { json } => list(ctx, json),
        PresetsCommand::Show { id, json } => show(ctx, &id, json),
        PresetsCommand::Create {
            name,
            chain,
            file,
            description,
            metadata,
        } => create(
            ctx,
            name,
            chain.as_deref(),
            file,
            description,
            metadata.as_deref(),
        ),
        PresetsCommand::Delete { id } => delete(ctx, &id),
        PresetsCommand::Paths => {
            println!("Preset directory: {}", ctx.settings.presets.dir.display());
            println!("Settings file:    {}", ctx.settings_path.display());
            Ok(())
        }
    }
}

fn list(ctx: &Context, json: bool) -> anyhow::Result<()> {
    let presets = ctx.store()?.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&presets)?);
        return Ok(());
    }

    if presets.is_empty() {
        println!("No presets in {}", ctx.settings.presets.dir.display());
        return Ok(());
    }

    println!("  {:32}  {:24}  {:7}  {}", "ID", "Name", "Effects", "Created");
    println!("  {:32}  {:24}  {:7}  {}", "--", "----", "-------", "-------");
    for preset in &presets {
        println!(
            "  {:32}  {:24}  {:7}  {}",
            preset.id,
            preset.name,
            preset.effects_count,
            preset.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!();
    println!("{} preset(s)", presets.len());

    Ok(())
}

fn show(ctx: &Context, id: &str, json: bool) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let preset = store.load(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&preset)?);
        return Ok(());
    }

    println!("{}", preset.name);
    println!("{}", "=".repeat(preset.name.len()));
    println!("ID: {}", preset.id);
    println!("Created: {}", preset.created_at.to_rfc3339());
    if !preset.description.is_empty() {
        println!();
        println!("{}", preset.description);
    }

    println!();
    match store.resolve(id) {
        Ok(chain) => {
            println!("Effect chain:");
            for (index, effect) in chain.iter().enumerate() {
                println!("  [{index}] {} -> {}", effect.id, effect.plugin);
                for (name, value) in &effect.args {
                    println!("      {name} = {value}");
                }
            }
        }
        // Stored presets can go stale when asset directories change.
        Err(err) => println!("Effect chain no longer resolves: {err}"),
    }

    Ok(())
}

fn create(
    ctx: &Context,
    name: String,
    chain: Option<&str>,
    file: Option<PathBuf>,
    description: Option<String>,
    metadata: Option<&str>,
) -> anyhow::Result<()> {
    let effects = read_chain(file.as_deref(), chain)?;
    let mut new = NewPreset::new(name, effects);
    if let Some(description) = description {
        new = new.with_description(description);
    }
    if let Some(text) = metadata {
        let metadata: Map<String, Value> =
            serde_json::from_str(text).context("--metadata must be a JSON object")?;
        new = new.with_metadata(metadata);
    }

    let preset = ctx.store()?.create(new)?;
    println!("Created preset '{}' ({})", preset.name, preset.id);
    Ok(())
}

fn delete(ctx: &Context, id: &str) -> anyhow::Result<()> {
    ctx.store()?.delete(id)?;
    println!("Deleted preset {id}");
    Ok(())
}

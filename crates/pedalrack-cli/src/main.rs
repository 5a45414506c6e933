//! pedalrack CLI - effect catalog, chain validation, and preset management.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pedalrack")]
#[command(author, version, about = "Pedalrack effect chain tools", long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available effects and their parameters
    Effects(commands::effects::EffectsArgs),

    /// Validate an effect chain without processing audio
    Validate(commands::validate::ValidateArgs),

    /// Create, list, and delete presets
    Presets(commands::presets::PresetsArgs),

    /// Show the effective settings
    Settings(commands::settings::SettingsArgs),
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = commands::common::Context::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Effects(args) => commands::effects::run(&ctx, args),
        Commands::Validate(args) => commands::validate::run(&ctx, args),
        Commands::Presets(args) => commands::presets::run(&ctx, args),
        Commands::Settings(args) => commands::settings::run(&ctx, args),
    }
}

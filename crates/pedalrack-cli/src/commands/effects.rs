//! Effect listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use super::common::Context;
use clap::Args;
use pedalrack_registry::{EffectSummary, EffectTag};
use serde_json::Value;

#[derive(Args)]
pub struct EffectsArgs {
    /// Show details for a specific effect (id or alias)
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,

    /// Only list effects carrying this tag
    #[arg(long, value_name = "TAG")]
    tag: Option<String>,

    /// Print the catalog as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(ctx: &Context, args: EffectsArgs) -> anyhow::Result<()> {
    let registry = ctx.registry()?;

    if let Some(id) = &args.effect {
        let summary = registry.lookup(id)?.summary();
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_detail(&summary);
        }
        return Ok(());
    }

    let effects: Vec<EffectSummary> = match &args.tag {
        Some(name) => {
            let tag = EffectTag::from_name(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown tag: {name}"))?;
            registry
                .effects_with_tag(tag)
                .into_iter()
                .map(|def| def.summary())
                .collect()
        }
        None => registry.list_all(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&effects)?);
        return Ok(());
    }

    println!("Available Effects");
    println!("=================");
    println!();
    println!("  {:16}  {:24}  {}", "ID", "Name", "Description");
    println!("  {:16}  {:24}  {}", "--", "----", "-----------");
    for effect in &effects {
        println!("  {:16}  {:24}  {}", effect.id, effect.name, effect.description);
    }
    println!();
    println!("Use 'pedalrack effects <EFFECT>' for parameter details.");

    Ok(())
}

fn print_detail(effect: &EffectSummary) {
    println!("{} ({})", effect.name, effect.id);
    println!("{}", "=".repeat(effect.name.len() + effect.id.len() + 3));
    println!();
    if !effect.description.is_empty() {
        println!("{}", effect.description);
        println!();
    }
    if !effect.aliases.is_empty() {
        println!("Aliases: {}", effect.aliases.join(", "));
    }
    if !effect.tags.is_empty() {
        let tags: Vec<&str> = effect.tags.iter().map(EffectTag::name).collect();
        println!("Tags: {}", tags.join(", "));
    }

    println!();
    println!("Parameters:");
    println!();
    println!("  {:20}  {:6}  {:12}  {}", "Name", "Type", "Default", "Range");
    println!("  {:20}  {:6}  {:12}  {}", "----", "----", "-------", "-----");
    for param in &effect.params {
        let default = match &param.default {
            _ if param.required => "(required)".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
            None => "-".to_string(),
        };
        println!(
            "  {:20}  {:6}  {:12}  {}",
            param.name,
            param.kind.as_str(),
            default,
            range(param.min, param.max, param.options.as_deref())
        );
        if let Some(help) = &param.help {
            println!("  {:20}  {}", "", help);
        }
    }

    if let Some(notes) = &effect.notes {
        println!();
        println!("Notes: {notes}");
    }
}

fn range(min: Option<f64>, max: Option<f64>, options: Option<&[String]>) -> String {
    match (min, max, options) {
        (_, _, Some([])) => "(no options available)".to_string(),
        (_, _, Some(options)) => options.join(" | "),
        (Some(min), Some(max), None) => format!("{min} to {max}"),
        (Some(min), None, None) => format!(">= {min}"),
        (None, Some(max), None) => format!("<= {max}"),
        (None, None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_column() {
        assert_eq!(range(Some(0.0), Some(1.0), None), "0 to 1");
        assert_eq!(range(Some(-60.0), None, None), ">= -60");
        assert_eq!(range(None, None, None), "");
        let options = vec!["a.wav".to_string(), "b.wav".to_string()];
        assert_eq!(range(None, None, Some(options.as_slice())), "a.wav | b.wav");
        assert_eq!(range(None, None, Some(&[][..])), "(no options available)");
    }
}

//! Chain validation command.

use super::common::{Context, read_chain};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ValidateArgs {
    /// JSON file holding the chain ('-' reads stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Inline JSON chain instead of a file
    #[arg(short, long, conflicts_with = "file")]
    chain: Option<String>,

    /// Print the resolved chain as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(ctx: &Context, args: ValidateArgs) -> anyhow::Result<()> {
    let requests = read_chain(args.file.as_deref(), args.chain.as_deref())?;
    let chain = ctx.resolver()?.resolve_chain(&requests)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&chain)?);
        return Ok(());
    }

    println!("Chain is valid ({} effects)", chain.len());
    for (index, effect) in chain.iter().enumerate() {
        println!();
        println!("  [{index}] {} -> {}", effect.id, effect.plugin);
        for (name, value) in &effect.args {
            println!("      {name} = {value}");
        }
    }

    Ok(())
}

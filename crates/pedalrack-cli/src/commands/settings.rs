//! Settings display and initialization.

use super::common::Context;
use clap::Args;
use pedalrack_config::Settings;

#[derive(Args)]
pub struct SettingsArgs {
    /// Write default settings to the settings file if it does not exist
    #[arg(long)]
    init: bool,
}

pub fn run(ctx: &Context, args: SettingsArgs) -> anyhow::Result<()> {
    if args.init {
        if ctx.settings_path.exists() {
            anyhow::bail!(
                "settings file already exists: {}",
                ctx.settings_path.display()
            );
        }
        Settings::default().save(&ctx.settings_path)?;
        println!("Wrote {}", ctx.settings_path.display());
        return Ok(());
    }

    println!("# {}", ctx.settings_path.display());
    print!("{}", ctx.settings.to_toml()?);
    Ok(())
}

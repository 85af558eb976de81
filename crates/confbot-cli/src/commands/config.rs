use clap::Subcommand;
use confbot_core::Config;

use super::{CliResult, Context};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "conference.month_label", "search.inline_limit")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

fn save(ctx: &Context, config: &Config) -> CliResult {
    match &ctx.config_path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    Ok(())
}

pub fn run(mut ctx: Context, action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => match ctx.config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            ctx.config.set(&key, &value)?;
            save(&ctx, &ctx.config)?;
            println!("ok");
        }
        ConfigAction::List => {
            let json = serde_json::to_string_pretty(&ctx.config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            save(&ctx, &Config::default())?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

use clap::{Args, Subcommand};
use anyhow::Result;

use crate::config::env::EnvParser;
use crate::config::Config as AppConfig;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show configuration file path
    Path,

    /// List all available configuration keys
    Keys,
}

pub async fn execute(args: ConfigArgs, config: &AppConfig) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            println!("Current configuration:");
            for key in AppConfig::keys() {
                if let Some(value) = config.get_value(key) {
                    println!("  {}: {}", key, value);
                }
            }

            let overrides = EnvParser::get_all_touhoudb_vars();
            if !overrides.is_empty() {
                println!("\nEnvironment overrides:");
                for (key, value) in overrides {
                    println!("  {}={}", key, value);
                }
            }
        }

        ConfigCommands::Get { key } => match config.get_value(&key) {
            Some(value) => println!("{}", value),
            None => anyhow::bail!("Unknown configuration key: {}", key),
        },

        ConfigCommands::Path => {
            println!("{}", AppConfig::config_path()?.display());
        }

        ConfigCommands::Keys => {
            println!("Available configuration keys:");
            for key in AppConfig::keys() {
                println!("  {}", key);
            }
        }
    }

    Ok(())
}

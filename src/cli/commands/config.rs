use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use std::process::ExitCode;

use crate::config::BenchConfig;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
}

pub fn execute(args: ConfigArgs, config: &BenchConfig) -> Result<ExitCode> {
    match args.command {
        ConfigCommand::Show { format } => {
            let rendered = match format {
                ConfigFormat::Toml => config.to_toml()?,
                ConfigFormat::Json => config.to_json()?,
            };
            println!("{}", rendered.trim_end());
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "pkc")]
#[command(about = "PK-Central admin CLI - schema bootstrap, static data import and dev tokens")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create missing tables and indexes")]
    Schema,

    #[command(about = "Seed a static lookup collection from a JSON array file")]
    Import(commands::import::ImportArgs),

    #[command(about = "Issue a JWT for a user id (development and test only)")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = crate::config::config();

    match cli.command {
        Commands::Schema => commands::schema::handle(config, output_format).await,
        Commands::Import(args) => commands::import::handle(args, config, output_format).await,
        Commands::Token(args) => commands::token::handle(args, config, output_format),
    }
}

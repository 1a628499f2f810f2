pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::PanelConfig;

#[derive(Parser)]
#[command(name = "analyses-panel")]
#[command(about = "Terminal client for the additional-analyses admin panel")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "API server base URL (overrides PANEL_API_URL)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in, sign out and session status")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "List, browse and manage additional analyses")]
    Analyses {
        #[command(subcommand)]
        cmd: commands::analyses::AnalysesCommands,
    },
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

/// Environment config with `--server` applied on top
pub fn resolve_config(cli: &Cli) -> PanelConfig {
    let mut config = crate::config::config().clone();
    if let Some(server) = &cli.server {
        config.api.base_url = server.trim_end_matches('/').to_string();
    }
    config
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = resolve_config(&cli);

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &config, output_format).await,
        Commands::Analyses { cmd } => commands::analyses::handle(cmd, &config, output_format).await,
    }
}

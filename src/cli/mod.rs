pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "agency")]
#[command(about = "Agency CLI - operator access to ZeroDB, the knowledge base and reseller wallets")]
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
    #[command(about = "Verify a token with the identity service and show who it belongs to")]
    Whoami {
        #[arg(long, help = "Session token or API key")]
        token: String,
    },

    #[command(about = "ZeroDB table operations")]
    Tables {
        #[command(subcommand)]
        cmd: commands::tables::TablesCommands,
    },

    #[command(about = "Knowledge base vector operations")]
    Kb {
        #[command(subcommand)]
        cmd: commands::kb::KbCommands,
    },

    #[command(about = "Chatbot conversation memory")]
    Memory {
        #[command(subcommand)]
        cmd: commands::memory::MemoryCommands,
    },

    #[command(about = "Reseller wallet")]
    Wallet {
        #[command(subcommand)]
        cmd: commands::wallet::WalletCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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
    let config = AppConfig::from_env();

    match cli.command {
        Commands::Whoami { token } => commands::whoami::handle(&token, &config, output_format).await,
        Commands::Tables { cmd } => commands::tables::handle(cmd, &config, output_format).await,
        Commands::Kb { cmd } => commands::kb::handle(cmd, &config, output_format).await,
        Commands::Memory { cmd } => commands::memory::handle(cmd, &config, output_format).await,
        Commands::Wallet { cmd } => commands::wallet::handle(cmd, &config, output_format).await,
    }
}

use anyhow::Context;
use clap::Subcommand;

use crate::cli::{utils::output_item, OutputFormat};
use crate::config::AppConfig;
use crate::zerodb::{KnowledgeStore, ZeroDbClient};

#[derive(Subcommand)]
pub enum MemoryCommands {
    #[command(about = "Search a chatbot session's stored memory")]
    Search {
        #[arg(help = "Session ID (the session_id cookie value)")]
        session_id: String,
        #[arg(help = "Query text")]
        query: String,
        #[arg(long, default_value_t = 10, help = "Maximum results")]
        limit: usize,
    },
}

pub async fn handle(cmd: MemoryCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        MemoryCommands::Search { session_id, query, limit } => {
            let client = ZeroDbClient::new(config.zerodb.clone());
            let result = client
                .search_memory(&session_id, &query, limit)
                .await
                .with_context(|| format!("Memory search failed for session '{}'", session_id))?;
            output_item(&output_format, &result)
        }
    }
}

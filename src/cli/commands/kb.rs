use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::{
    utils::{output_rows, output_success},
    OutputFormat,
};
use crate::config::AppConfig;
use crate::zerodb::{KnowledgeStore, VectorRecord, ZeroDbClient};

#[derive(Subcommand)]
pub enum KbCommands {
    #[command(about = "Semantic search over a knowledge base collection")]
    Search {
        #[arg(help = "Query text")]
        query: String,
        #[arg(long, help = "Collection name (defaults to KNOWLEDGE_COLLECTION)")]
        collection: Option<String>,
        #[arg(long, help = "Number of results (defaults to CHAT_TOP_K)")]
        top_k: Option<usize>,
    },

    #[command(about = "Upsert vectors from a JSON file containing an array of records")]
    Upsert {
        #[arg(help = "Path to a JSON array of {id, vector?, text?, metadata?}")]
        file: String,
        #[arg(long, help = "Collection name (defaults to KNOWLEDGE_COLLECTION)")]
        collection: Option<String>,
    },
}

pub async fn handle(cmd: KbCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ZeroDbClient::new(config.zerodb.clone());

    match cmd {
        KbCommands::Search { query, collection, top_k } => {
            let collection = collection.unwrap_or_else(|| config.chat.knowledge_collection.clone());
            let hits = client
                .search_similar_text(&collection, &query, top_k.unwrap_or(config.chat.top_k))
                .await
                .context("Knowledge base search failed")?;
            let rows = hits
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()?;
            output_rows(&output_format, "results", &rows)
        }
        KbCommands::Upsert { file, collection } => {
            let collection = collection.unwrap_or_else(|| config.chat.knowledge_collection.clone());
            let content = std::fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file))?;
            let vectors: Vec<VectorRecord> =
                serde_json::from_str(&content).with_context(|| format!("{} is not a JSON array of vector records", file))?;
            let count = vectors.len();

            let response = client
                .upsert_vectors(&collection, vectors)
                .await
                .context("Vector upsert failed")?;

            output_success(
                &output_format,
                &format!("Upserted {} vectors into '{}'", count, collection),
                Some(json!({ "collection": collection, "count": count, "response": response })),
            )
        }
    }
}

use anyhow::Context;
use clap::Subcommand;
use serde_json::{Map, Value};

use crate::cli::{utils::output_rows, OutputFormat};
use crate::config::AppConfig;
use crate::zerodb::{TableStore, ZeroDbClient};

#[derive(Subcommand)]
pub enum TablesCommands {
    #[command(about = "Query rows from a ZeroDB table")]
    Query {
        #[arg(help = "Table name (case_studies, chat_logs, contact_submissions)")]
        table: String,
        #[arg(long, help = "JSON object of equality filters, e.g. '{\"status\":\"new\"}'")]
        filter: Option<String>,
    },
}

pub async fn handle(cmd: TablesCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TablesCommands::Query { table, filter } => {
            let filter = parse_filter(filter.as_deref())?;
            let client = ZeroDbClient::new(config.zerodb.clone());
            let rows = client
                .query_rows(&table, filter)
                .await
                .with_context(|| format!("Failed to query table '{}'", table))?;
            output_rows(&output_format, &table, &rows)
        }
    }
}

pub(crate) fn parse_filter(raw: Option<&str>) -> anyhow::Result<Map<String, Value>> {
    let Some(raw) = raw else {
        return Ok(Map::new());
    };
    match serde_json::from_str::<Value>(raw).context("--filter must be valid JSON")? {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("--filter must be a JSON object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parsing() {
        assert!(parse_filter(None).unwrap().is_empty());
        let map = parse_filter(Some(r#"{"status":"new"}"#)).unwrap();
        assert_eq!(map["status"], "new");
        assert!(parse_filter(Some("[1]")).is_err());
        assert!(parse_filter(Some("{oops")).is_err());
    }
}

//! Thin client for the ZeroDB table, vector and memory APIs.
//!
//! No retries, batching or caching happen here: a failed remote call surfaces
//! as a [`ZeroDbError`] and the caller decides what that means for its request.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::auth::attach_token;
use crate::config::ZeroDbSettings;

/// Rows returned by a table query are capped remotely at this many.
pub const QUERY_LIMIT: usize = 100;

/// Agent identity recorded with conversational memory.
pub const MEMORY_AGENT_ID: &str = "blaq-chatbot";

#[derive(Debug, thiserror::Error)]
pub enum ZeroDbError {
    #[error("ZeroDB request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("ZeroDB returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("ZeroDB response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// One chatbot exchange kept as session-scoped memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub session_id: String,
    pub message: String,
    pub response: String,
    pub message_type: String,
}

#[derive(Debug, Deserialize)]
struct RowsResponse {
    #[serde(default)]
    rows: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// Row-level persistence used by the admin and contact handlers
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Insert one record; returns the stored row (with its remote id) or `Null`.
    async fn insert_row(&self, table: &str, record: Value) -> Result<Value, ZeroDbError>;

    /// Equality-filtered query, at most [`QUERY_LIMIT`] rows.
    async fn query_rows(&self, table: &str, filter: Map<String, Value>) -> Result<Vec<Value>, ZeroDbError>;
}

/// Vector search and conversational memory used by the chatbot
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    async fn upsert_vectors(&self, collection: &str, vectors: Vec<VectorRecord>) -> Result<Value, ZeroDbError>;

    async fn search_similar_text(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, ZeroDbError>;

    async fn store_memory(&self, entry: &MemoryEntry) -> Result<Value, ZeroDbError>;

    async fn search_memory(&self, session_id: &str, query: &str, limit: usize) -> Result<Value, ZeroDbError>;
}

/// Constructed once at startup and shared through `AppState`
#[derive(Clone)]
pub struct ZeroDbClient {
    client: reqwest::Client,
    settings: ZeroDbSettings,
}

impl ZeroDbClient {
    pub fn new(settings: ZeroDbSettings) -> Self {
        let settings = ZeroDbSettings {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            ..settings
        };
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    /// Copy of this client that authenticates with a different credential
    pub fn with_api_key(&self, key: impl Into<String>) -> Self {
        let mut settings = self.settings.clone();
        settings.api_key = Some(key.into());
        Self {
            client: self.client.clone(),
            settings,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.settings.project_id
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ZeroDbError> {
        let url = format!("{}{}", self.settings.base_url, path);
        tracing::debug!(%url, "ZeroDB request");

        let mut request = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(self.settings.timeout_secs))
            .json(body);
        if let Some(key) = &self.settings.api_key {
            request = attach_token(request, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ZeroDbError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl TableStore for ZeroDbClient {
    async fn insert_row(&self, table: &str, record: Value) -> Result<Value, ZeroDbError> {
        let path = format!("/v1/public/zerodb/tables/{table}/insert");
        let body = self.post(&path, &json!({ "rows": [record] })).await?;
        if body.is_null() {
            return Ok(Value::Null);
        }
        let rows: RowsResponse = serde_json::from_value(body)?;
        Ok(rows.rows.into_iter().next().unwrap_or(Value::Null))
    }

    async fn query_rows(&self, table: &str, filter: Map<String, Value>) -> Result<Vec<Value>, ZeroDbError> {
        let path = format!("/v1/public/zerodb/tables/{table}/query");
        let body = self
            .post(&path, &json!({ "filter": filter, "limit": QUERY_LIMIT }))
            .await?;
        if body.is_null() {
            return Ok(Vec::new());
        }
        let rows: RowsResponse = serde_json::from_value(body)?;
        Ok(rows.rows)
    }
}

#[async_trait]
impl KnowledgeStore for ZeroDbClient {
    async fn upsert_vectors(&self, collection: &str, vectors: Vec<VectorRecord>) -> Result<Value, ZeroDbError> {
        self.post(
            "/v1/public/zerodb/vectors/upsert",
            &json!({ "collection_name": collection, "vectors": vectors }),
        )
        .await
    }

    async fn search_similar_text(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, ZeroDbError> {
        let body = self
            .post(
                "/v1/public/zerodb/vectors/search/text",
                &json!({ "collection_name": collection, "query_text": query, "top_k": top_k }),
            )
            .await?;
        if body.is_null() {
            return Ok(Vec::new());
        }
        let parsed: SearchResponse = serde_json::from_value(body)?;
        Ok(parsed.results)
    }

    async fn store_memory(&self, entry: &MemoryEntry) -> Result<Value, ZeroDbError> {
        let path = format!("/projects/{}/database/memory/store", self.settings.project_id);
        self.post(
            &path,
            &json!({
                "agent_id": MEMORY_AGENT_ID,
                "session_id": entry.session_id,
                "content": entry.message,
                "role": "user",
                "metadata": {
                    "response": entry.response,
                    "message_type": entry.message_type,
                },
            }),
        )
        .await
    }

    async fn search_memory(&self, session_id: &str, query: &str, limit: usize) -> Result<Value, ZeroDbError> {
        let path = format!("/projects/{}/database/memory/search", self.settings.project_id);
        self.post(
            &path,
            &json!({ "query": query, "session_id": session_id, "limit": limit }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ZeroDbSettings {
        ZeroDbSettings {
            base_url: "http://zerodb.local/".to_string(),
            project_id: "proj-1".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ZeroDbClient::new(settings());
        assert_eq!(client.settings.base_url, "http://zerodb.local");
    }

    #[test]
    fn with_api_key_leaves_original_untouched() {
        let client = ZeroDbClient::new(settings());
        let rotated = client.with_api_key("eyJrotated");
        assert!(client.settings.api_key.is_none());
        assert_eq!(rotated.settings.api_key.as_deref(), Some("eyJrotated"));
        assert_eq!(rotated.project_id(), "proj-1");
    }

    #[test]
    fn vector_record_omits_absent_fields() {
        let record = VectorRecord {
            id: "doc-1".to_string(),
            vector: None,
            text: Some("RAG systems".to_string()),
            metadata: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({ "id": "doc-1", "text": "RAG systems" }));
    }
}

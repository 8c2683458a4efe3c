//! Authenticated CRUD endpoints over ZeroDB tables.
//!
//! Every handler here runs behind the rate limiter and the auth guard, in that
//! order. GET fetches with equality filters and then searches, sorts and
//! slices locally. POST validates, sanitizes, stamps and inserts.

pub mod case_studies;
pub mod chat_logs;
pub mod contacts;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::query::{paginate, sort_rows, ListParams};

/// Sort, count and slice rows into the list payload shared by all resources.
pub(crate) fn list_payload(key: &str, mut rows: Vec<Value>, params: &ListParams) -> Map<String, Value> {
    sort_rows(&mut rows, &params.sort_by, params.sort_order);
    let total = rows.len();
    let page = paginate(rows, params.limit, params.offset);

    let mut data = Map::new();
    data.insert(key.to_string(), Value::Array(page));
    data.insert("total".to_string(), json!(total));
    data.insert("limit".to_string(), json!(params.limit));
    data.insert("offset".to_string(), json!(params.offset));
    data
}

/// Insert a record and echo it back with the id the store assigned.
pub(crate) async fn insert_record<T: Serialize>(state: &AppState, table: &str, record: &T) -> Result<Value, ApiError> {
    let mut value = serde_json::to_value(record).map_err(|e| {
        tracing::error!(error = %e, table, "Failed to encode record");
        ApiError::upstream("Failed to encode record")
    })?;

    let row = state.tables.insert_row(table, value.clone()).await?;
    let id = row.get("id").cloned().unwrap_or(Value::Null);

    if let Value::Object(fields) = &mut value {
        fields.insert("id".to_string(), id);
    }
    Ok(value)
}

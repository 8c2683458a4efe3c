use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    Extension,
};
use chrono::Utc;
use serde_json::{json, Map, Value};

use super::{insert_record, list_payload};
use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::parse_json;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::chat_log::TABLE;
use crate::models::{MessageType, NewChatLog};
use crate::query::{equality_filters, search_rows, ChatStats, ListParams};

const SORTABLE: &[&str] = &["created_at", "session_id", "message_type"];
const SEARCH_FIELDS: &[&str] = &["message", "response"];

/// GET /api/admin/chat-logs
///
/// Supports `session_id` and `message_type` equality filters plus a free-text
/// `search` over message and response. Stats cover every matching row, not
/// just the returned page.
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Map<String, Value>> {
    let params = ListParams::from_query(&raw, SORTABLE, state.config.api.default_page_size)?;

    let filter = equality_filters(&raw, &["session_id", "message_type"]);
    if let Some(kind) = filter.get("message_type").and_then(Value::as_str) {
        if MessageType::parse(kind).is_none() {
            return Err(ApiError::bad_request("message_type must be 'rag' or 'chatbot'"));
        }
    }

    let mut rows = state.tables.query_rows(TABLE, filter).await?;
    if let Some(term) = raw.get("search").filter(|t| !t.trim().is_empty()) {
        rows = search_rows(rows, term.trim(), SEARCH_FIELDS);
    }

    let stats = ChatStats::from_rows(&rows);
    let mut data = list_payload("chat_logs", rows, &params);
    data.insert("stats".to_string(), json!(stats));

    Ok(ApiResponse::success(data))
}

/// POST /api/admin/chat-logs
pub async fn create(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    body: Bytes,
) -> ApiResult<Value> {
    let input = parse_json(&body)?;
    let record = NewChatLog::validate(&input)
        .map_err(ApiError::validation)?
        .sanitize()
        .into_record(Utc::now());

    let stored = insert_record(&state, TABLE, &record).await?;
    tracing::info!(
        user = %user.id,
        table = TABLE,
        session_id = %record.session_id,
        id = %stored["id"],
        "Chat log created"
    );

    Ok(ApiResponse::created(stored))
}

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{cookie_value, session_cookie};
use crate::chat::ChatResponder;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::MessageType;

pub const SESSION_COOKIE: &str = "session_id";
const SESSION_SECS: u64 = 30 * 24 * 60 * 60;
const HISTORY_LIMIT: usize = 20;

fn new_session_id() -> String {
    format!("session_{}", Uuid::new_v4().simple())
}

/// POST /api/chat
pub async fn send(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> ApiResult<Value> {
    let input: Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::invalid_input("Invalid JSON in request body"))?;

    let message = input
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::invalid_input("Message is required"))?;

    let kind = match input.get("type") {
        None | Some(Value::Null) => MessageType::Chatbot,
        Some(v) => v
            .as_str()
            .and_then(MessageType::parse)
            .ok_or_else(|| ApiError::invalid_input("type must be either \"chatbot\" or \"rag\""))?,
    };

    let session_id = cookie_value(&headers, SESSION_COOKIE).unwrap_or_else(new_session_id);

    let responder = ChatResponder {
        knowledge: state.knowledge.as_ref(),
        completion: state.completion.as_ref(),
        collection: &state.config.chat.knowledge_collection,
        top_k: state.config.chat.top_k,
    };
    let reply = responder.respond(&session_id, message, kind).await;
    tracing::info!(session_id = %session_id, kind = %kind, relevant = reply.has_relevant_content, "Chat reply sent");

    let cookie = session_cookie(SESSION_COOKIE, &session_id, SESSION_SECS, state.config.auth.cookie_secure);
    let sources_count = reply.sources.len();

    let data = json!({
        "response": reply.response,
        "session_id": session_id,
        "metadata": {
            "has_relevant_content": reply.has_relevant_content,
            "type": kind,
            "sources_count": sources_count,
        },
        "sources": reply.sources,
    });
    Ok(ApiResponse::success(data).with_cookie(cookie))
}

/// GET /api/chat?query=
pub async fn history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Value> {
    let session_id =
        cookie_value(&headers, SESSION_COOKIE).ok_or_else(|| ApiError::invalid_input("No active session"))?;
    let query = raw.get("query").map(String::as_str).unwrap_or_default();

    let history = state
        .knowledge
        .search_memory(&session_id, query, HISTORY_LIMIT)
        .await?;

    Ok(ApiResponse::success(json!({
        "session_id": session_id,
        "history": history,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_prefixed_and_unique() {
        let a = new_session_id();
        let b = new_session_id();
        assert!(a.starts_with("session_"));
        assert_ne!(a, b);
    }
}

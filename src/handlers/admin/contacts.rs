use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    Extension,
};
use chrono::Utc;
use serde_json::{Map, Value};

use super::{insert_record, list_payload};
use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::parse_json;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::contact::TABLE;
use crate::models::NewContact;
use crate::query::{equality_filters, ListParams};

const SORTABLE: &[&str] = &["created_at", "name", "email", "status", "project_type"];

/// GET /api/admin/contacts
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Map<String, Value>> {
    let params = ListParams::from_query(&raw, SORTABLE, state.config.api.default_page_size)?;
    let filter = equality_filters(&raw, &["status", "email", "project_type"]);

    let rows = state.tables.query_rows(TABLE, filter).await?;
    Ok(ApiResponse::success(list_payload("contacts", rows, &params)))
}

/// POST /api/admin/contacts
pub async fn create(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    body: Bytes,
) -> ApiResult<Value> {
    let input = parse_json(&body)?;
    let record = NewContact::validate(&input)
        .map_err(ApiError::validation)?
        .sanitize()
        .into_record(Utc::now());

    let stored = insert_record(&state, TABLE, &record).await?;
    tracing::info!(user = %user.id, table = TABLE, id = %stored["id"], "Contact created");

    Ok(ApiResponse::created(stored))
}

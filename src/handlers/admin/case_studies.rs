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
use crate::models::case_study::TABLE;
use crate::models::NewCaseStudy;
use crate::query::{parse_bool, ListParams};

const SORTABLE: &[&str] = &["created_at", "updated_at", "order_index", "title", "client"];

/// GET /api/admin/case-studies
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Map<String, Value>> {
    let params = ListParams::from_query(&raw, SORTABLE, state.config.api.default_page_size)?;

    let mut filter = Map::new();
    if let Some(published) = raw.get("published").filter(|v| !v.is_empty()) {
        filter.insert("published".to_string(), Value::Bool(parse_bool("published", published)?));
    }

    let rows = state.tables.query_rows(TABLE, filter).await?;
    Ok(ApiResponse::success(list_payload("case_studies", rows, &params)))
}

/// POST /api/admin/case-studies
pub async fn create(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    body: Bytes,
) -> ApiResult<Value> {
    let input = parse_json(&body)?;
    let record = NewCaseStudy::validate(&input)
        .map_err(ApiError::validation)?
        .sanitize()
        .into_record(Utc::now());

    let stored = insert_record(&state, TABLE, &record).await?;
    tracing::info!(user = %user.id, table = TABLE, id = %stored["id"], "Case study created");

    Ok(ApiResponse::created(stored))
}

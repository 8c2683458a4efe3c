//! Reseller wallet endpoints. The caller's credential is passed through to the
//! payments API, which is the one that decides whether it is any good.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    Extension,
};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::auth::Credential;
use crate::error::ApiError;
use crate::handlers::parse_json;
use crate::middleware::{ApiResponse, ApiResult};
use crate::payments::{DepositRequest, Transaction, TransactionPage, Wallet, WithdrawRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionsQuery {
    pub page: u32,
    pub page_size: u32,
}

impl TransactionsQuery {
    pub fn from_query(raw: &HashMap<String, String>) -> Result<Self, ApiError> {
        Ok(Self {
            page: parse_page(raw, "page", 1)?,
            page_size: parse_page(raw, "page_size", 10)?,
        })
    }
}

fn parse_page(raw: &HashMap<String, String>, param: &str, default: u32) -> Result<u32, ApiError> {
    match raw.get(param).map(|v| v.trim()) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| ApiError::bad_request(format!("{param} must be a positive integer, got '{value}'"))),
    }
}

/// GET /api/wallet
pub async fn show(State(state): State<AppState>, Extension(credential): Extension<Credential>) -> ApiResult<Wallet> {
    let wallet = state.payments.wallet(&credential).await?;
    Ok(ApiResponse::success(wallet))
}

/// POST /api/wallet
pub async fn create(State(state): State<AppState>, Extension(credential): Extension<Credential>) -> ApiResult<Wallet> {
    let wallet = state.payments.create_wallet(&credential).await?;
    tracing::info!(wallet_id = %wallet.id, "Wallet created");
    Ok(ApiResponse::created(wallet))
}

/// GET /api/wallet/transactions?page=1&page_size=10
pub async fn transactions(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<TransactionPage> {
    let query = TransactionsQuery::from_query(&raw)?;
    let result = state.payments.transactions(&credential, query.page, query.page_size).await?;
    Ok(ApiResponse::success(result))
}

fn decode<T: for<'de> Deserialize<'de>>(body: &Bytes) -> Result<T, ApiError> {
    let input: Value = parse_json(body)?;
    serde_json::from_value(input).map_err(|e| ApiError::validation(vec![e.to_string()]))
}

/// POST /api/wallet/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    body: Bytes,
) -> ApiResult<Transaction> {
    let request: WithdrawRequest = decode(&body)?;
    request.validate().map_err(ApiError::validation)?;

    let tx = state.payments.withdraw(&credential, &request).await?;
    tracing::info!(transaction_id = %tx.id, amount = %request.amount_usd, "Withdrawal requested");
    Ok(ApiResponse::success(tx))
}

/// POST /api/wallet/deposit
pub async fn deposit(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    body: Bytes,
) -> ApiResult<Transaction> {
    let request: DepositRequest = decode(&body)?;
    request.validate().map_err(ApiError::validation)?;

    let tx = state.payments.deposit(&credential, &request).await?;
    tracing::info!(transaction_id = %tx.id, amount = %request.amount_usd, "Deposit requested");
    Ok(ApiResponse::success(tx))
}

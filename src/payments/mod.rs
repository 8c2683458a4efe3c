//! Reseller wallet client for the AINative payments API.
//!
//! The caller's own credential is forwarded on every call; this service never
//! holds payment credentials of its own.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::auth::Credential;
use crate::config::PaymentsConfig;

pub mod types;

pub use types::{
    DepositRequest, KycStatus, Transaction, TransactionPage, TransactionStatus, TransactionType, Wallet,
    WithdrawRequest,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which wallet call failed; each has its own client-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchWallet,
    CreateWallet,
    FetchTransactions,
    Withdraw,
    Deposit,
}

impl Operation {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::FetchWallet => "Failed to fetch wallet data",
            Operation::CreateWallet => "Failed to create wallet",
            Operation::FetchTransactions => "Failed to fetch transactions",
            Operation::Withdraw => "Failed to process withdrawal",
            Operation::Deposit => "Failed to process deposit",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentsError {
    #[error("Payments API rejected the credential")]
    Unauthorized,

    #[error("{}: {reason}", .operation.failure_message())]
    Failed { operation: Operation, reason: String },
}

impl PaymentsError {
    fn failed(operation: Operation, reason: impl ToString) -> Self {
        PaymentsError::Failed {
            operation,
            reason: reason.to_string(),
        }
    }

    pub fn client_message(&self) -> &'static str {
        match self {
            PaymentsError::Unauthorized => "Invalid or expired authentication token",
            PaymentsError::Failed { operation, .. } => operation.failure_message(),
        }
    }
}

#[async_trait]
pub trait PaymentsApi: Send + Sync {
    async fn wallet(&self, credential: &Credential) -> Result<Wallet, PaymentsError>;

    async fn create_wallet(&self, credential: &Credential) -> Result<Wallet, PaymentsError>;

    async fn transactions(
        &self,
        credential: &Credential,
        page: u32,
        page_size: u32,
    ) -> Result<TransactionPage, PaymentsError>;

    async fn withdraw(&self, credential: &Credential, request: &WithdrawRequest) -> Result<Transaction, PaymentsError>;

    async fn deposit(&self, credential: &Credential, request: &DepositRequest) -> Result<Transaction, PaymentsError>;
}

pub struct PaymentsClient {
    client: reqwest::Client,
    base_url: String,
}

impl PaymentsClient {
    pub fn new(config: &PaymentsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PaymentsError> {
        let response = request
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| PaymentsError::failed(operation, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PaymentsError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentsError::failed(operation, format!("HTTP {}: {}", status.as_u16(), body)));
        }

        response.json::<T>().await.map_err(|e| PaymentsError::failed(operation, e))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl PaymentsApi for PaymentsClient {
    async fn wallet(&self, credential: &Credential) -> Result<Wallet, PaymentsError> {
        let request = self
            .client
            .get(self.url("/v1/payments/wallets/me"))
            .bearer_auth(credential.as_str());
        self.send(Operation::FetchWallet, request).await
    }

    async fn create_wallet(&self, credential: &Credential) -> Result<Wallet, PaymentsError> {
        let request = self
            .client
            .post(self.url("/v1/payments/wallets"))
            .bearer_auth(credential.as_str());
        self.send(Operation::CreateWallet, request).await
    }

    async fn transactions(
        &self,
        credential: &Credential,
        page: u32,
        page_size: u32,
    ) -> Result<TransactionPage, PaymentsError> {
        let request = self
            .client
            .get(self.url("/v1/payments/transactions"))
            .query(&[("page", page), ("page_size", page_size)])
            .bearer_auth(credential.as_str());
        self.send(Operation::FetchTransactions, request).await
    }

    async fn withdraw(&self, credential: &Credential, body: &WithdrawRequest) -> Result<Transaction, PaymentsError> {
        let request = self
            .client
            .post(self.url("/v1/payments/withdraw"))
            .bearer_auth(credential.as_str())
            .json(body);
        self.send(Operation::Withdraw, request).await
    }

    async fn deposit(&self, credential: &Credential, body: &DepositRequest) -> Result<Transaction, PaymentsError> {
        let request = self
            .client
            .post(self.url("/v1/payments/deposit"))
            .bearer_auth(credential.as_str())
            .json(body);
        self.send(Operation::Deposit, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_messages_name_the_operation() {
        let err = PaymentsError::failed(Operation::Withdraw, "HTTP 500");
        assert_eq!(err.client_message(), "Failed to process withdrawal");
        assert_eq!(err.to_string(), "Failed to process withdrawal: HTTP 500");
        assert_eq!(PaymentsError::Unauthorized.client_message(), "Invalid or expired authentication token");
    }

    #[test]
    fn base_url_is_normalised() {
        let client = PaymentsClient::new(&PaymentsConfig {
            base_url: "https://api.example.com/".to_string(),
        });
        assert_eq!(client.url("/v1/payments/wallets/me"), "https://api.example.com/v1/payments/wallets/me");
    }
}

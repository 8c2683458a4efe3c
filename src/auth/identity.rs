use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{AuthError, Credential, Principal};
use crate::config::AuthConfig;

/// Tokens issued by a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub access_token: String,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("no token received")]
    MissingToken,
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

/// Remote "who am I" and login endpoints
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn verify(&self, credential: &Credential) -> Result<Principal, AuthError>;

    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, LoginError>;
}

/// Identity service backed by the AINative admin auth API
pub struct RemoteIdentityService {
    client: reqwest::Client,
    api_url: String,
    verify_timeout: Duration,
    login_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    id: Option<Value>,
    user_id: Option<Value>,
    email: Option<String>,
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

impl RemoteIdentityService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            verify_timeout: Duration::from_millis(config.timeout_ms),
            login_timeout: Duration::from_millis(config.login_timeout_ms),
        }
    }
}

#[async_trait]
impl IdentityService for RemoteIdentityService {
    async fn verify(&self, credential: &Credential) -> Result<Principal, AuthError> {
        let url = format!("{}/v1/admin/auth/me", self.api_url);
        let request = credential.apply(self.client.get(&url).timeout(self.verify_timeout));

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AuthError::Service("Authentication verification timed out".to_string())
            } else {
                AuthError::Service(format!("Authentication verification failed: {e}"))
            }
        })?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                return Err(AuthError::Unauthenticated(
                    "Invalid or expired authentication token".to_string(),
                ))
            }
            StatusCode::FORBIDDEN => {
                return Err(AuthError::Forbidden("Insufficient permissions".to_string()))
            }
            status if !status.is_success() => {
                return Err(AuthError::Service(format!(
                    "Authentication verification failed with HTTP {}",
                    status.as_u16()
                )))
            }
            _ => {}
        }

        let me: MeResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Service(format!("Invalid authentication response: {e}")))?;

        Ok(me.into_principal())
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, LoginError> {
        let url = format!("{}/v1/auth/login", self.api_url);
        let response = self
            .client
            .post(&url)
            .timeout(self.login_timeout)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| LoginError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(LoginError::InvalidCredentials),
            status if !status.is_success() => {
                return Err(LoginError::Unavailable(format!("HTTP {}", status.as_u16())))
            }
            _ => {}
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| LoginError::Unavailable(e.to_string()))?;

        match body.access_token {
            Some(access_token) if !access_token.is_empty() => Ok(LoginGrant {
                access_token,
                expires_in: body.expires_in,
            }),
            _ => Err(LoginError::MissingToken),
        }
    }
}

impl MeResponse {
    fn into_principal(self) -> Principal {
        let id = self
            .id
            .or(self.user_id)
            .map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_else(|| "admin".to_string());

        Principal {
            id,
            email: self.email.unwrap_or_else(|| "admin@ainative.studio".to_string()),
            role: Some(self.role.unwrap_or_else(|| "admin".to_string())),
        }
    }
}

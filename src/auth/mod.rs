use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

pub mod identity;

pub use identity::{IdentityService, LoginError, LoginGrant, RemoteIdentityService};

/// Authenticated principal returned by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("identity service error: {0}")]
    Service(String),
}

/// How a credential travels to the AINative platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialTransport {
    Bearer,
    ApiKey,
}

/// A raw session token or API key lifted from an inbound request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// JWTs (base64url of `{"`) start with `eyJ`; everything else is an API key.
    pub fn transport(&self) -> CredentialTransport {
        transport_for(&self.0)
    }

    /// Attach the credential to an outbound request
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        attach_token(request, &self.0)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

pub fn transport_for(token: &str) -> CredentialTransport {
    if token.starts_with("eyJ") {
        CredentialTransport::Bearer
    } else {
        CredentialTransport::ApiKey
    }
}

/// Shared by every AINative client so they all pick the same header for a token.
pub fn attach_token(request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
    match transport_for(token) {
        CredentialTransport::Bearer => request.bearer_auth(token),
        CredentialTransport::ApiKey => request.header("X-API-Key", token),
    }
}

/// Locate a credential: session cookie, then `Authorization: Bearer`, then `x-api-key`.
pub fn extract_credential(headers: &HeaderMap, cookie_name: &str) -> Option<Credential> {
    if let Some(token) = cookie_value(headers, cookie_name) {
        return Some(Credential::new(token));
    }

    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(Credential::new(token));
    }

    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Credential::new)
}

/// Read a single cookie out of every `Cookie` header on the request
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all("cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value for an HTTP-only, same-site session cookie. A zero
/// `max_age_secs` tells the browser to drop it.
pub fn session_cookie(name: &str, value: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!("{name}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extract and verify the caller. A request without any credential never reaches
/// the identity service.
pub async fn authenticate(
    headers: &HeaderMap,
    cookie_name: &str,
    identity: &dyn IdentityService,
) -> Result<Principal, AuthError> {
    let credential = extract_credential(headers, cookie_name)
        .ok_or_else(|| AuthError::Unauthenticated("No authentication token provided".to_string()))?;
    identity.verify(&credential).await
}

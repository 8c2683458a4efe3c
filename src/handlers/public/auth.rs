use axum::{body::Bytes, extract::State, Extension};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::{session_cookie, LoginError, LoginGrant};
use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::handlers::parse_json;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// Cookie lifetime when the identity service doesn't say (7 days)
pub const DEFAULT_SESSION_SECS: u64 = 7 * 24 * 60 * 60;

fn required_field<'a>(input: &'a Value, key: &str) -> Option<&'a str> {
    input.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// POST /api/auth/login
pub async fn login(State(state): State<AppState>, body: Bytes) -> ApiResult<Value> {
    let input = parse_json(&body)?;
    let (Some(username), Some(password)) = (required_field(&input, "username"), required_field(&input, "password"))
    else {
        return Err(ApiError::bad_request("Username and password are required"));
    };

    let auth = &state.config.auth;
    let (grant, message) = match state.identity.login(username, password).await {
        Ok(grant) => (grant, "Authentication successful"),
        Err(LoginError::InvalidCredentials) => {
            tracing::info!(username, "Login rejected");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
        Err(LoginError::MissingToken) => {
            return Err(ApiError::unauthorized("Authentication failed - no token received"));
        }
        Err(LoginError::Unavailable(reason)) => {
            tracing::warn!(error = %reason, "Identity service unavailable during login");
            let grant = fallback_grant(auth, username, password)
                .ok_or_else(|| ApiError::service_unavailable("Authentication service unavailable"))?;
            tracing::info!(username, "Using fallback authentication");
            (grant, "Authentication successful (fallback mode)")
        }
    };

    let cookie = session_cookie(
        &auth.cookie_name,
        &grant.access_token,
        grant.expires_in.unwrap_or(DEFAULT_SESSION_SECS),
        auth.cookie_secure,
    );

    Ok(ApiResponse::success(json!({ "user": { "username": username } }))
        .with_message(message)
        .with_cookie(cookie))
}

/// Local-development login used only when the identity service can't be reached
fn fallback_grant(auth: &AuthConfig, username: &str, password: &str) -> Option<LoginGrant> {
    auth.fallback
        .as_ref()
        .filter(|f| f.username == username && f.password == password)
        .map(|f| LoginGrant {
            access_token: f.token.clone(),
            expires_in: None,
        })
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> ApiResponse<()> {
    let auth = &state.config.auth;
    let cookie = session_cookie(&auth.cookie_name, "", 0, auth.cookie_secure);

    ApiResponse::success(())
        .with_message("Logged out successfully")
        .with_cookie(cookie)
}

/// GET /api/auth/verify (behind the auth guard)
pub async fn verify(Extension(AuthUser(user)): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({ "user": user })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, FallbackLogin};

    #[test]
    fn fallback_requires_matching_credentials() {
        let mut auth = AppConfig::development().auth;
        assert!(fallback_grant(&auth, "admin", "pw").is_none());

        auth.fallback = Some(FallbackLogin {
            username: "admin".to_string(),
            password: "pw".to_string(),
            token: "env-token".to_string(),
        });
        assert!(fallback_grant(&auth, "admin", "wrong").is_none());
        assert_eq!(fallback_grant(&auth, "admin", "pw").unwrap().access_token, "env-token");
    }
}

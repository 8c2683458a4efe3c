use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{self, extract_credential, Principal};
use crate::error::ApiError;

/// Authenticated admin context injected into request extensions
#[derive(Clone, Debug)]
pub struct AuthUser(pub Principal);

/// Verifies the caller with the identity service and injects [`AuthUser`].
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = match auth::authenticate(&headers, &state.config.auth.cookie_name, state.identity.as_ref()).await {
        Ok(principal) => principal,
        Err(e) => {
            tracing::info!(path = %request.uri().path(), reason = %e, "Rejected admin request");
            return Err(e.into());
        }
    };

    tracing::debug!(user = %principal.id, "Authenticated admin request");
    request.extensions_mut().insert(AuthUser(principal));

    Ok(next.run(request).await)
}

/// Requires a credential to be present and forwards it untouched; the
/// downstream service is the one that judges it.
pub async fn require_credential(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = extract_credential(request.headers(), &state.config.auth.cookie_name)
        .ok_or_else(|| ApiError::unauthorized("No authentication token provided"))?;

    request.extensions_mut().insert(credential);
    Ok(next.run(request).await)
}

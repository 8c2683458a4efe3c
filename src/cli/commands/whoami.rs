use anyhow::Context;
use serde_json::json;

use crate::auth::{Credential, CredentialTransport, IdentityService, RemoteIdentityService};
use crate::cli::{utils::output_item, OutputFormat};
use crate::config::AppConfig;

pub async fn handle(token: &str, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let credential = Credential::new(token);
    let identity = RemoteIdentityService::new(&config.auth);

    let principal = identity
        .verify(&credential)
        .await
        .context("Token verification failed")?;

    let transport = match credential.transport() {
        CredentialTransport::Bearer => "bearer",
        CredentialTransport::ApiKey => "api_key",
    };

    output_item(
        &output_format,
        &json!({
            "id": principal.id,
            "email": principal.email,
            "role": principal.role,
            "transport": transport,
        }),
    )
}

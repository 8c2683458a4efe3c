use agency_api::{config::AppConfig, router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up ZERODB_PROJECT_ID, RESEND_API_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agency_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Agency API in {:?} mode", config.environment);
    if config.zerodb.api_key.is_none() {
        tracing::warn!("AINATIVE_API_KEY is not set; ZeroDB calls will be unauthenticated");
    }
    if config.mail.api_key.is_none() {
        tracing::warn!("RESEND_API_KEY is not set; contact notifications will not be emailed");
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let app = router(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Agency API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

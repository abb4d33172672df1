use gitcanvas_server::{AuthServer, ServerConfig};
use gitcanvas_telemetry::TelemetryConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gitcanvas_telemetry::init_subscriber(&TelemetryConfig::default());

    let config = ServerConfig::from_env();
    if config.client_id.is_none() {
        tracing::warn!("GITHUB_CLIENT_ID is not set; the OAuth flow will answer 500");
    }

    AuthServer::new(config).start().await?;
    Ok(())
}

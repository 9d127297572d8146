use anyhow::Result;
use code_copilot::config::Config;
use code_copilot::openrouter::OpenRouterGateway;
use code_copilot::server::{self, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("code_copilot=info".parse()?),
        )
        .init();

    info!("Starting Code Copilot server");

    // Load configuration from environment
    let config = Config::from_env()?;

    let gateway = Arc::new(OpenRouterGateway::from_config(&config));
    let app = server::router(AppState { gateway });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {} (model: {})", addr, config.openrouter_model);

    axum::serve(listener, app).await?;

    Ok(())
}

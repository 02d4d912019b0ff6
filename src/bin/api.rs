use budget_assistant::{api::start_server, assistant::Assistant, config::Config};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Missing LLM credentials are fatal at startup
    let config = Config::from_env()?;

    info!("🚀 Budget Assistant - API Server");
    info!("📍 Port: {}", config.port);

    let assistant = Arc::new(Assistant::new(&config));

    info!("✅ Assistant initialized");
    info!("📡 Starting API server...");

    start_server(assistant, config.port).await?;

    Ok(())
}

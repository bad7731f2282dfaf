use std::sync::Arc;

use document_compliance_service::{AppConfig, ModelClient, OpenRouterClient, create_app};
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig::from_env();

    // Missing credential is fatal here, before any request is served.
    let model: Arc<dyn ModelClient> =
        match OpenRouterClient::from_env(&config.model, config.temperature) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000);

    let app = create_app(config, model).await?;
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    let addr = listener.local_addr()?;

    info!("Document Compliance Service starting on {}", addr);
    info!("Health check endpoint: http://{}/health", addr);
    info!("Analyze endpoint: POST http://{}/documents/analyze", addr);
    info!("Rewrite endpoint: POST http://{}/documents/rewrite", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

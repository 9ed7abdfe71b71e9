use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use projmail::ai::{DraftAssistant, GeminiClient};
use projmail::api::{build_router, AppState};
use projmail::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "projmail=info,tower_http=debug".into()),
        ))
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    info!("Connecting to database: {}", config.database_url);
    let pool = sqlx::PgPool::connect(&config.database_url).await?;

    let assistant: Option<Arc<dyn DraftAssistant>> = match &config.gemini_api_key {
        Some(key) => {
            match GeminiClient::new(key, Duration::from_secs(config.ai_timeout_secs)) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    warn!("AI draft assistant disabled: {e}");
                    None
                }
            }
        }
        None => {
            info!("GEMINI_API_KEY not configured; AI draft assistant disabled");
            None
        }
    };

    let state = AppState::new(pool, assistant);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! bank-insights HTTP Server
//!
//! Axum-based server for the personal banking dashboard: login, rule-based
//! insights, a category chart and a model-written recommendation.

mod chart;
mod config;
mod handlers;
mod render;
mod routes;
mod session;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bank_advisor::rules::UniformMarket;
use bank_advisor::{InsightEngine, NarrativeGenerator, RecordStore, SqliteStore};
use insight_core::LlmProvider;
use insight_runtime::OllamaProvider;

use crate::config::ServerConfig;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment first so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Open account records
    let store = SqliteStore::open(&config.database_path)?;
    if config.seed_demo_data {
        let seeded = store.seed_demo_data()?;
        if seeded > 0 {
            tracing::info!("Seeded {} demo accounts", seeded);
        }
    }
    tracing::info!("✓ Records at {}", config.database_path.display());

    // Initialize text model
    let provider: Arc<dyn LlmProvider> =
        Arc::new(OllamaProvider::from_config(config.ollama.clone()));

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to Ollama");
            if let Ok(info) = provider.info().await {
                for model in info.models {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not available - recommendations will use fallback text");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    // Build insight pipeline
    let narrator = NarrativeGenerator::new(provider.clone(), config.narrative_config());
    let engine = InsightEngine::new(
        Arc::new(UniformMarket),
        config.thresholds.clone(),
        narrator,
    );

    // Sessions
    let secret = config.session_secret.clone().unwrap_or_else(|| {
        tracing::warn!("⚠ SESSION_SECRET not set - sessions will not survive a restart");
        format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        )
    });
    let sessions = SessionStore::new(secret.as_bytes(), config.session_lifetime)?;

    let store: Arc<dyn RecordStore> = Arc::new(store);
    let state = AppState {
        store,
        engine: Arc::new(engine),
        sessions: Arc::new(sessions),
        provider,
    };

    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 bank-insights server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /              - Login page");
    tracing::info!("  POST /login         - Submit credentials");
    tracing::info!("  GET  /dashboard     - Account dashboard");
    tracing::info!("  GET  /logout        - End session");
    tracing::info!("  GET  /api/insights  - Dashboard as JSON");
    tracing::info!("  GET  /health        - Health check");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

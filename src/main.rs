//! Career Plus Assistant server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use career_plus_assistant::adapters::ai::{MockAssistant, OpenAIAssistant};
use career_plus_assistant::adapters::http::{api_router, AssistantAppState};
use career_plus_assistant::adapters::marketplace::HttpMarketplaceClient;
use career_plus_assistant::adapters::storage::InMemorySessionStore;
use career_plus_assistant::application::AssistantService;
use career_plus_assistant::config::{AppConfig, ServerConfig};
use career_plus_assistant::ports::RemoteAssistant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let assistant: Arc<dyn RemoteAssistant> = match config.ai.openai() {
        Some(openai) => Arc::new(OpenAIAssistant::new(openai)?),
        None => {
            tracing::warn!("no OpenAI API key configured, free-text questions get mock replies");
            Arc::new(MockAssistant::new())
        }
    };
    let marketplace = Arc::new(HttpMarketplaceClient::new(config.marketplace.client())?);

    let service = Arc::new(AssistantService::new(
        config.service(),
        Arc::new(InMemorySessionStore::new()),
        assistant,
        marketplace.clone(),
        marketplace,
    ));
    tokio::spawn(expire_idle_sessions(
        service.clone(),
        config.assistant.session_ttl(),
    ));

    let app = api_router(
        AssistantAppState::new(service),
        &config.server.cors_origins_list(),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "career plus assistant listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured level. JSON output in production.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Sweeps idle sessions twice per TTL for the life of the process.
async fn expire_idle_sessions(service: Arc<AssistantService>, ttl: Duration) {
    let mut ticker = tokio::time::interval((ttl / 2).max(Duration::from_secs(1)));
    loop {
        ticker.tick().await;
        if let Err(e) = service.expire_idle().await {
            tracing::warn!(error = %e, "idle session sweep failed");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

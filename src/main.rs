use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use police_assistant::adapters::ai::{OpenAIProvider, PromptReplyGenerator};
use police_assistant::adapters::catalog::{InMemoryViolationRegistry, JsonServiceCatalog};
use police_assistant::adapters::flow::FileFlowLoader;
use police_assistant::adapters::http::{app_router, AppState, HttpSettings};
use police_assistant::adapters::session::InMemorySessionStore;
use police_assistant::application::handlers::chat::ChatTurnHandler;
use police_assistant::config::{AppConfig, ValidationError};
use police_assistant::domain::flow::FlowEngine;
use police_assistant::ports::{SessionStore, ViolationLookup};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let flow = FileFlowLoader::new(&config.data.flow_path).load().await?;
    let engine = FlowEngine::new(Arc::new(flow));

    let catalog = JsonServiceCatalog::load(&config.data.catalog_path).await?;
    let violations: Arc<dyn ViolationLookup> = match &config.data.violations_path {
        Some(path) => Arc::new(InMemoryViolationRegistry::load(path).await?),
        None => Arc::new(InMemoryViolationRegistry::with_sample_data()),
    };

    let provider_config = config
        .ai
        .openai_config()
        .ok_or(ValidationError::MissingRequired("OPENAI_API_KEY"))?;
    let provider = Arc::new(OpenAIProvider::new(provider_config)?);
    let replies = Arc::new(PromptReplyGenerator::new(provider, config.ai.reply_settings()));

    let store = Arc::new(InMemorySessionStore::start(config.session.store_config()));
    let store_port: Arc<dyn SessionStore> = store.clone();

    let chat = Arc::new(ChatTurnHandler::new(
        store_port.clone(),
        engine,
        Arc::new(catalog),
        violations,
        replies,
    ));

    let settings = HttpSettings {
        request_timeout: config.server.request_timeout(),
        cors_origins: config.server.cors_origins_list(),
    };
    let app = app_router(AppState::new(store_port, chat), &settings);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        model = %config.ai.model,
        "Police assistant listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.shutdown().await;
    tracing::info!("Police assistant stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

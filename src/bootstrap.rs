use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use crate::{
    application::aggregate_store::AggregateStore,
    config::AppConfig,
    infrastructure::{
        kafka::{probe_brokers, spawn_consumers},
        metrics::EventMetrics,
    },
    interfaces::http::router::build_router,
    state::AppState,
};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load()?;
    let kafka_cfg = Arc::new(config.kafka.clone());

    probe_brokers(&kafka_cfg)
        .await
        .with_context(|| format!("Failed to create consumer for {}", kafka_cfg.brokers))?;

    let store = Arc::new(AggregateStore::new());
    let metrics = EventMetrics::new()?;
    let shared_state = Arc::new(AppState::new(store, metrics));

    // Consumers are not awaited; they end with the process.
    let consumers = spawn_consumers(kafka_cfg, shared_state.clone());
    info!("{} topic consumer(s) spawned", consumers.len());

    let router: Router = build_router(shared_state);
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Analytics Service listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown signal received, exiting");
    Ok(())
}

fn init_tracing() {
    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::builder()
                    .with_default_directive(Level::INFO.into())
                    .from_env_lossy()
            }))
            .finish(),
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

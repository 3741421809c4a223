//! Brasa Server — subscription store and notification dispatch service
//! for the Brasa installable web app.
//!
//! Main entry point that wires the store, dispatcher, worker, and HTTP
//! API together and runs until interrupted.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use brasa_core::config::AppConfig;
use brasa_core::error::AppError;
use brasa_core::traits::SystemClock;
use brasa_push::gateway::HttpPushSender;
use brasa_push::payload::builder::PayloadBuilder;
use brasa_worker::dedup::SendDeduplicator;
use brasa_worker::jobs::dispatch::NotificationDispatchJob;

#[tokio::main]
async fn main() {
    let env = std::env::var("BRASA_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => fmt().with_env_filter(filter).json().init(),
        _ => fmt().with_env_filter(filter).init(),
    }
}

async fn run(mut config: AppConfig) -> Result<(), AppError> {
    // Missing messaging credentials disable that subsystem only; the
    // subscription API keeps serving.
    if config.messaging.enabled {
        if let Err(e) = config.messaging.validate() {
            tracing::warn!(error = %e, "Messaging subsystem disabled");
            config.messaging.enabled = false;
        }
    }

    let config = Arc::new(config);

    tracing::info!(
        provider = %config.database.provider,
        "Initializing subscription store"
    );
    let store_manager = brasa_database::StoreManager::new(&config.database).await?;
    let store = store_manager.store();

    let dispatcher = if config.messaging.enabled {
        let sender = Arc::new(HttpPushSender::new(&config.messaging)?);
        let window = Duration::from_secs(config.messaging.dedup_window_seconds);
        Some(Arc::new(NotificationDispatchJob::new(
            Arc::clone(&store),
            sender,
            PayloadBuilder::new().with_dedup_window(window),
            SendDeduplicator::new(window),
            Arc::new(SystemClock),
        )))
    } else {
        None
    };

    let mut scheduler = None;
    if config.worker.enabled {
        let s = brasa_worker::CronScheduler::new(config.worker.clone()).await?;
        s.register_default_tasks(Arc::clone(&store)).await?;
        s.start().await?;
        scheduler = Some(s);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, shutting down");
        }
        let _ = shutdown_tx.send(true);
    });

    let state = brasa_api::AppState::new(Arc::clone(&config), store, dispatcher);
    brasa_api::run_server(state, shutdown_rx).await?;

    if let Some(mut s) = scheduler {
        s.shutdown().await?;
    }

    tracing::info!("Server stopped");
    Ok(())
}

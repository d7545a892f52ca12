//! Service entry point: HTTP server plus the optional queue consumer.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assessment_ingest::adapters::forwarding::{HttpForwarder, HttpForwarderConfig};
use assessment_ingest::adapters::http::{build_router, IngestionHandlers, RouterConfig};
use assessment_ingest::adapters::postgres::PostgresAssessmentStore;
use assessment_ingest::adapters::queue::{
    QueueConsumer, QueueConsumerConfig, RedisQueue, RedisQueueConfig,
};
use assessment_ingest::adapters::sheets::{
    GoogleSheetsConfig, GoogleSheetsProvider, ServiceAccountKey,
};
use assessment_ingest::application::{
    ImportSheetsHandler, ParseSheetsHandler, TreeAssembler,
};
use assessment_ingest::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    // Spreadsheet provider
    let key = ServiceAccountKey::from_file(&config.sheets.credentials_path)?;
    let mut sheets_config = GoogleSheetsConfig::default()
        .with_api_base_url(config.sheets.api_base_url.clone())
        .with_timeout(config.sheets.timeout());
    if let Some(token_url) = &config.sheets.token_url {
        sheets_config = sheets_config.with_token_url(token_url.clone());
    }
    let provider = Arc::new(GoogleSheetsProvider::from_key(sheets_config, key)?);
    let assembler = Arc::new(TreeAssembler::new(provider));

    // Synchronous path: persist directly
    let pool = config.database.pool_options().connect(&config.database.url).await?;
    let store = Arc::new(PostgresAssessmentStore::new(pool));
    let parse_handler = Arc::new(ParseSheetsHandler::new(assembler.clone(), store));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Asynchronous path: consume the queue and forward
    let consumer_task = if config.broker.enabled {
        let forwarder = HttpForwarder::new(
            HttpForwarderConfig::new(config.forwarding.base_url.clone())
                .with_timeout(config.forwarding.timeout()),
        )?;
        let import_handler = Arc::new(ImportSheetsHandler::new(assembler, Arc::new(forwarder)));

        let queue = RedisQueue::new(
            &config.redis.url,
            RedisQueueConfig::new(&config.broker.queue, &config.broker.consumer_name)
                .with_connect_timeout(config.redis.timeout()),
        )?;
        if let Err(e) = queue.recover_stranded().await {
            tracing::warn!(error = %e, "Could not requeue stranded messages; continuing");
        }

        let consumer = QueueConsumer::new(
            Arc::new(queue),
            import_handler,
            QueueConsumerConfig::default()
                .with_poll_timeout(config.broker.poll_timeout())
                .with_reconnect_backoff(
                    config.broker.reconnect_initial_backoff(),
                    config.broker.reconnect_max_backoff(),
                )
                .with_retry_delay(config.broker.retry_delay()),
        );
        let rx = shutdown_rx.clone();
        tracing::info!(queue = %config.broker.queue, "Starting queue consumer");
        Some(tokio::spawn(async move { consumer.run(rx).await }))
    } else {
        tracing::info!("Queue consumer disabled");
        None
    };

    // HTTP server
    let router = build_router(
        IngestionHandlers::new(parse_handler),
        &RouterConfig {
            cors_origins: config.server.allowed_origins(),
        },
    );
    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    if let Some(task) = consumer_task {
        task.await?;
    }
    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_filter));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolves on Ctrl+C or SIGTERM and tells background tasks to stop.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
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

    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(true);
}

//!
//! Booking service entry point: REST API over the availability engine.
//! Reads configuration from TOML file (~/.config/roomly-booking/config.toml).

use std::sync::Arc;
use std::time::Duration;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use roomly_booking::application::availability::AvailabilityEngine;
use roomly_booking::application::services::start_hold_expiry_task;
use roomly_booking::config::AppConfig;
use roomly_booking::domain::RepositoryProvider;
use roomly_booking::infrastructure::database::migrator::Migrator;
use roomly_booking::shared::retry::{retry_with_backoff, RetryConfig};
use roomly_booking::shared::shutdown::ShutdownCoordinator;
use roomly_booking::{
    create_api_router, create_event_bus, default_config_path, init_database, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("ROOMLY_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Roomly Booking Service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("📊 Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = retry_with_backoff(
        RetryConfig {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            ..RetryConfig::default()
        },
        || init_database(&db_config),
        |_| true,
        "init_database",
    )
    .await
    .map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e
    })?;

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Initialize repository provider
    let repos: Arc<dyn RepositoryProvider> =
        Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    // Initialize event bus for real-time notifications
    let event_bus = create_event_bus();
    info!("🔔 Event bus initialized for real-time notifications");

    // ── Availability engine (the only admission path) ──────────
    let engine = Arc::new(
        AvailabilityEngine::new(repos.clone(), event_bus.clone()).with_lock_wait(
            Duration::from_millis(app_cfg.booking.admission_lock_wait_ms),
        ),
    );

    // Initialize shutdown coordinator
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();

    // Start listening for shutdown signals (SIGTERM, SIGINT)
    shutdown.start_signal_listener();

    // Start the stale-hold sweeper
    start_hold_expiry_task(
        repos.clone(),
        engine.clone(),
        shutdown_signal.clone(),
        app_cfg.booking.hold_expiry_check_secs,
        app_cfg.booking.hold_ttl_minutes,
    );

    // Create REST API router
    let api_router = create_api_router(
        engine,
        repos,
        event_bus,
        db.clone(),
        prometheus_handle,
    );

    // Start REST API server with graceful shutdown
    let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    let api_server = axum::serve(
        listener,
        api_router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        api_shutdown.wait().await;
        info!("🛑 REST API server received shutdown signal");
    });

    info!("🚀 Server started. Press Ctrl+C to shutdown gracefully.");

    if let Err(e) = api_server.await {
        error!("REST API server error: {}", e);
    }

    // Perform final cleanup; trigger first so the coordinator's wait
    // returns even when the server exited on its own.
    shutdown_signal.trigger();
    shutdown
        .shutdown_with_cleanup(|| async move {
            info!("🧹 Performing final cleanup...");
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("✅ Database connection closed");
            }
        })
        .await;

    info!("👋 Roomly Booking Service shutdown complete");
    Ok(())
}

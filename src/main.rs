//! motorclub worker
//!
//! Connects to PostgreSQL, optionally applies migrations, and runs the
//! club subscription expiry sweep until Ctrl-C.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};

use motorclub::adapters::postgres::{PostgresSubscriptionRepository, MIGRATOR};
use motorclub::adapters::{ExpirySweeper, LoggingEventPublisher};
use motorclub::application::ExpireSubscriptionsHandler;
use motorclub::config::{AppConfig, LoggingConfig};

fn init_tracing(logging: &LoggingConfig) {
    let builder = tracing_subscriber::fmt().with_env_filter(logging.env_filter());
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    config.validate()?;

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    info!(max_connections = config.database.max_connections, "Connected to PostgreSQL");

    if config.database.run_migrations {
        MIGRATOR.run(&pool).await?;
        info!("Migrations applied");
    }

    if !config.sweep.enabled {
        info!("Expiry sweep disabled; nothing to do");
        return Ok(());
    }

    let subscriptions = Arc::new(PostgresSubscriptionRepository::new(pool.clone()));
    let events = Arc::new(LoggingEventPublisher::new());
    let handler = Arc::new(ExpireSubscriptionsHandler::new(subscriptions, events));
    let sweeper = ExpirySweeper::new(handler, config.sweep.interval());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    if shutdown_tx.send(true).is_err() {
        error!("Expiry sweeper exited before shutdown");
    }
    worker.await?;

    pool.close().await;
    Ok(())
}

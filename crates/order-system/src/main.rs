//! Order system server: loads config, opens the payment session and serves the REST API.

use std::sync::Arc;

use anyhow::Context;
use order_system::api::{self, AppState};
use order_system::config::AppConfig;
use order_system::database::{DbManager, OrderRepository};
use order_system::services::{OrderService, SdkDemo};
use order_system::{shutdown, telemetry};
use reddio_pay::Session;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init(telemetry::LogFormat::from_env())?;

    let config = AppConfig::load()?;
    info!(?config, "configuration loaded");

    let db = Arc::new(DbManager::new(&config.database_path, config.database_pool_size)?);
    db.run_migrations().context("failed to run database migrations")?;

    let session = Arc::new(
        Session::open(config.reddio_url.clone(), config.reddio_api_key.clone())
            .await
            .context("failed to open Reddio Pay session")?,
    );

    if config.run_demo {
        let report = SdkDemo::new(Arc::clone(&session)).run_all().await;
        if !report.failed.is_empty() {
            warn!(failed = ?report.failed, "some walkthrough steps failed");
        }
    }

    let service = OrderService::new(OrderRepository::new(Arc::clone(&db)), session.clone());
    let app = api::router(AppState::new(Arc::new(service), db));

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "order system listening");

    let stop = shutdown::install()?;
    axum::serve(listener, app)
        .with_graceful_shutdown(stop.cancelled_owned())
        .await
        .context("server error")?;

    session.close().await;
    info!("order system stopped");
    Ok(())
}

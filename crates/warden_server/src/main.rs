use anyhow::Context;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use warden_costs::BillingClient;
use warden_dispatch::SlackNotifier;
use warden_server::api::router::create_router;
use warden_server::api::setup::setup_logging;
use warden_server::api::state::AppState;
use warden_server::worker::DailyWorker;
use warden_settings::ServerConfig;
use warden_sql::PostgresClient;

async fn shutdown_signal(shutdown_tx: watch::Sender<()>) {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
    let _ = shutdown_tx.send(());
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    setup_logging()?;

    let config = Arc::new(ServerConfig::default());

    let pool = PostgresClient::create_db_pool(&config.database_settings)
        .await
        .with_context(|| "Failed to create Postgres pool")?;

    let notifier = SlackNotifier::new(&config.slack_settings)
        .with_context(|| "Failed to create Slack notifier")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(());

    if config.worker_settings.enabled {
        let billing = BillingClient::new(&config.cost_settings)
            .with_context(|| "Failed to create billing client")?;
        let daily_worker = DailyWorker::new(
            pool.clone(),
            notifier.clone(),
            billing,
            config.worker_settings.clone(),
        );
        daily_worker.start(shutdown_rx.clone());
    }

    let app_state = Arc::new(AppState {
        db_pool: pool,
        config: config.clone(),
        notifier,
    });

    let router = create_router(app_state.clone())
        .await
        .with_context(|| "Failed to create router")?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Warden server listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .with_context(|| "Server error")?;

    app_state.shutdown().await;
    Ok(())
}

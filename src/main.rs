use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use clusterview::engine::Engine;
use clusterview::environment;
use clusterview::logging::configure_logging;
use clusterview::store::DynamoItemStore;
use clusterview::web;

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();

    let refresh_interval = environment::refresh_interval();
    info!(
        "Starting clusterview: table {}, refresh every {:?}",
        environment::table_name(),
        refresh_interval
    );

    let engine = Engine::new(refresh_interval);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Credential/region resolution is async; until it completes the engine
    // skips its cycles rather than block the clock.
    {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            let store = DynamoItemStore::new().await;
            engine.install_store(Arc::new(store));
        });
    }

    let fetch_task = tokio::spawn(Arc::clone(&engine).fetch_loop(shutdown_rx.clone()));
    let countdown_task = tokio::spawn(Arc::clone(&engine).countdown_loop(shutdown_rx.clone()));

    let web_task = tokio::spawn({
        let snapshot_rx = engine.subscribe_snapshot();
        let refresh_rx = engine.subscribe_refresh();
        async move {
            if let Err(err) = web::web_loop(snapshot_rx, refresh_rx).await {
                error!("Display API failed: {}", err);
            }
        }
    });

    if signal::ctrl_c().await.is_err() {
        error!("Failed to listen for ctrl-c");
    }
    info!("Shutdown requested, stopping periodic tasks");
    let _ = shutdown_tx.send(true);

    let _ = fetch_task.await;
    let _ = countdown_task.await;
    web_task.abort();

    Ok(())
}

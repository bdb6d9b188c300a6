use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::engine::{ClusterSnapshot, RefreshState};
use crate::environment;
use crate::TARGET_WEB_REQUEST;

/// Read-only handles onto the engine's published output. The handlers own
/// no state of their own; everything is already resident from the last
/// aggregation pass.
#[derive(Clone)]
struct AppState {
    snapshot_rx: watch::Receiver<ClusterSnapshot>,
    refresh_rx: watch::Receiver<RefreshState>,
}

/// Serve the display-layer API until the process exits.
pub async fn web_loop(
    snapshot_rx: watch::Receiver<ClusterSnapshot>,
    refresh_rx: watch::Receiver<RefreshState>,
) -> Result<()> {
    let state = AppState {
        snapshot_rx,
        refresh_rx,
    };
    let app = Router::new()
        .route("/clusters", get(list_clusters))
        .route("/clusters/{partition_key}/articles", get(view_articles))
        .route("/refresh", get(refresh_state))
        .with_state(state);

    let addr = environment::listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(target: TARGET_WEB_REQUEST, "Display API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Latest ranked snapshot: clusters plus the global article total.
async fn list_clusters(State(state): State<AppState>) -> Json<ClusterSnapshot> {
    Json(state.snapshot_rx.borrow().clone())
}

/// Countdown/progress signal, advanced once per second by the engine.
async fn refresh_state(State(state): State<AppState>) -> Json<RefreshState> {
    Json(*state.refresh_rx.borrow())
}

/// Article detail for one cluster, served verbatim from the resident
/// snapshot. No store fetch happens here.
async fn view_articles(
    State(state): State<AppState>,
    Path(partition_key): Path<String>,
) -> impl IntoResponse {
    let articles = state
        .snapshot_rx
        .borrow()
        .clusters
        .iter()
        .find(|cluster| cluster.partition_key == partition_key)
        .map(|cluster| cluster.articles.clone());

    match articles {
        Some(articles) => Json(articles).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

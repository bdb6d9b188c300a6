use std::env;
use tokio::time::Duration;

/// Name of the denormalized table holding cluster and article records.
pub fn table_name() -> String {
    env::var("CLUSTER_TABLE_NAME").unwrap_or_else(|_| "cluster-table".to_string())
}

/// Optional region override for the table; when unset the ambient AWS
/// provider chain decides.
pub fn table_region() -> Option<String> {
    env::var("CLUSTER_TABLE_REGION").ok().filter(|r| !r.trim().is_empty())
}

/// Fixed cadence of the refresh cycle. Clamped to at least one second so
/// the countdown signal always has at least one tick per cycle.
pub fn refresh_interval() -> Duration {
    let millis = env::var("REFRESH_INTERVAL_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(5000);
    Duration::from_millis(millis.max(1000))
}

/// Bind address for the display-layer API.
pub fn listen_addr() -> String {
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);
    format!("0.0.0.0:{}", port)
}

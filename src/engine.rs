use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, OnceCell};
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

use crate::aggregation::{assemble_clusters, collect_all_items, group_items, Cluster};
use crate::store::{ItemStore, StoreError};
use crate::TARGET_AGGREGATION;

/// The engine's published output for one refresh cycle. Replaced wholesale
/// when a cycle completes, never mutated in place.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSnapshot {
    pub clusters: Vec<Cluster>,
    pub total_articles: usize,
    pub generated_at: DateTime<Utc>,
}

impl Default for ClusterSnapshot {
    fn default() -> Self {
        Self {
            clusters: Vec::new(),
            total_articles: 0,
            generated_at: Utc::now(),
        }
    }
}

/// Countdown/progress signal for the display layer, advanced once per
/// second independent of any fetch activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RefreshState {
    pub progress_fraction: f64,
    pub seconds_remaining: u64,
}

impl RefreshState {
    fn initial(refresh_interval: Duration) -> Self {
        Self {
            progress_fraction: 0.0,
            seconds_remaining: refresh_interval.as_secs().max(1),
        }
    }

    /// One 1 Hz tick: the countdown wraps back to the full interval below
    /// one second, and progress moves ahead by `1/interval` per tick.
    /// Progress is recomputed from the countdown position each tick rather
    /// than accumulated, so it returns to exactly 0.0 at every wrap
    /// instead of drifting in floating point.
    fn advance(self, refresh_interval: Duration) -> Self {
        let total = refresh_interval.as_secs().max(1);
        let seconds_remaining = if self.seconds_remaining <= 1 {
            total
        } else {
            self.seconds_remaining - 1
        };
        Self {
            progress_fraction: (total - seconds_remaining) as f64 / total as f64,
            seconds_remaining,
        }
    }
}

/// The aggregation engine: owns the store handle, the refresh clock and
/// the published output. All state lives here and is rebuilt every cycle;
/// the display layer only ever sees it through the watch channels.
pub struct Engine {
    store: OnceCell<Arc<dyn ItemStore>>,
    refresh_interval: Duration,
    runs_issued: AtomicU64,
    snapshot_tx: watch::Sender<ClusterSnapshot>,
    refresh_tx: watch::Sender<RefreshState>,
}

impl Engine {
    pub fn new(refresh_interval: Duration) -> Arc<Self> {
        let (snapshot_tx, _) = watch::channel(ClusterSnapshot::default());
        let (refresh_tx, _) = watch::channel(RefreshState::initial(refresh_interval));
        Arc::new(Self {
            store: OnceCell::new(),
            refresh_interval,
            runs_issued: AtomicU64::new(0),
            snapshot_tx,
            refresh_tx,
        })
    }

    pub fn subscribe_snapshot(&self) -> watch::Receiver<ClusterSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn subscribe_refresh(&self) -> watch::Receiver<RefreshState> {
        self.refresh_tx.subscribe()
    }

    /// Install the store handle once its async credential/config setup is
    /// done. Cycles firing before this resolves skip silently.
    pub fn install_store(&self, store: Arc<dyn ItemStore>) {
        if self.store.set(store).is_err() {
            warn!(target: TARGET_AGGREGATION, "Store handle was already installed");
        }
    }

    /// Periodic fetch task: one aggregation cycle per interval tick, until
    /// the shutdown signal fires. Cycles may outlive their interval and
    /// overlap the next; publication is guarded by the run id so a stale
    /// run never replaces a newer result.
    pub async fn fetch_loop(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.refresh_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // Claim the run id at tick time so "latest issued"
                    // always matches tick order, not task start order.
                    let run_id = self.next_run_id();
                    let engine = Arc::clone(&self);
                    let shutdown = shutdown.clone();
                    tokio::spawn(async move {
                        engine.run_cycle(run_id, shutdown).await;
                    });
                }
                _ = shutdown.changed() => {
                    info!(target: TARGET_AGGREGATION, "Fetch task stopping");
                    break;
                }
            }
        }
    }

    fn store(&self) -> Result<&Arc<dyn ItemStore>, StoreError> {
        self.store.get().ok_or(StoreError::Uninitialized)
    }

    fn next_run_id(&self) -> u64 {
        self.runs_issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// One collect → group → assemble → publish cycle.
    async fn run_cycle(&self, run_id: u64, shutdown: watch::Receiver<bool>) {
        let store = match self.store() {
            Ok(store) => store,
            Err(err) => {
                debug!(target: TARGET_AGGREGATION, "Skipping cycle {}: {}", run_id, err);
                return;
            }
        };

        let items = match collect_all_items(store.as_ref()).await {
            Ok(items) => items,
            Err(err) => {
                // Keep the previously published result; the interval is
                // the retry mechanism.
                error!(target: TARGET_AGGREGATION, "Cycle {} aborted: {}", run_id, err);
                return;
            }
        };

        let grouped = group_items(&items);
        let clusters = assemble_clusters(&items, &grouped.buckets);

        // A cycle finishing after teardown must not publish.
        if *shutdown.borrow() {
            debug!(target: TARGET_AGGREGATION, "Cycle {} finished after shutdown, discarding", run_id);
            return;
        }
        // Last issued wins: a slow run that was lapped by a newer one is
        // dropped instead of clobbering the newer result.
        if run_id != self.runs_issued.load(Ordering::SeqCst) {
            warn!(target: TARGET_AGGREGATION, "Cycle {} superseded before completion, discarding", run_id);
            return;
        }

        info!(
            target: TARGET_AGGREGATION,
            "Cycle {}: published {} clusters from {} articles",
            run_id,
            clusters.len(),
            grouped.article_count
        );
        // send_replace keeps the published value even when no display
        // receiver is alive at publish time.
        self.snapshot_tx.send_replace(ClusterSnapshot {
            clusters,
            total_articles: grouped.article_count,
            generated_at: Utc::now(),
        });
    }

    /// 1 Hz countdown task. Purely presentational; never gates fetching.
    pub async fn countdown_loop(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(Duration::from_secs(1));
        // The first tick completes immediately; the countdown starts one
        // second after launch, like the fetch clock it mirrors.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let refresh_interval = self.refresh_interval;
                    self.refresh_tx
                        .send_modify(|state| *state = state.advance(refresh_interval));
                }
                _ = shutdown.changed() => {
                    info!(target: TARGET_AGGREGATION, "Countdown task stopping");
                    break;
                }
            }
        }
    }
}

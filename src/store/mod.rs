pub mod dynamo;

pub use dynamo::DynamoItemStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::aggregation::Item;

/// Opaque continuation cursor for a paginated scan. DynamoDB hands back
/// the key pair of the last evaluated item; any store implementation may
/// put whatever round-trips through `scan_page` in here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanKey {
    pub partition_key: String,
    pub sort_key: String,
}

/// One page of an unordered table scan. A present `last_evaluated_key`
/// means more pages remain.
#[derive(Debug, Default)]
pub struct ScanPage {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<ScanKey>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store client has not finished its async credential/config
    /// setup. The engine skips the cycle and retries on the next tick.
    #[error("item store is not initialized yet")]
    Uninitialized,
    /// A page request failed. The current cycle is aborted and the
    /// previously published result stays live until the next tick.
    #[error("scan request failed: {0}")]
    Scan(String),
}

/// Paginated, unordered access to the denormalized item table.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Fetch one page, resuming from `exclusive_start_key` when given.
    async fn scan_page(&self, exclusive_start_key: Option<ScanKey>)
        -> Result<ScanPage, StoreError>;
}

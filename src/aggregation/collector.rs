use tracing::debug;

use crate::store::{ItemStore, StoreError};
use crate::TARGET_AGGREGATION;

use super::types::Item;

/// Drain every page of a table scan into one in-memory item set.
///
/// Pages are requested strictly sequentially because each continuation
/// token comes from the previous response. The returned items carry no
/// ordering guarantee.
pub async fn collect_all_items(store: &dyn ItemStore) -> Result<Vec<Item>, StoreError> {
    let mut all_items = Vec::new();
    let mut exclusive_start_key = None;
    let mut pages = 0usize;

    loop {
        let page = store.scan_page(exclusive_start_key).await?;
        pages += 1;
        all_items.extend(page.items);
        match page.last_evaluated_key {
            Some(key) => exclusive_start_key = Some(key),
            None => break,
        }
    }

    debug!(
        target: TARGET_AGGREGATION,
        "Collected {} items across {} pages",
        all_items.len(),
        pages
    );
    Ok(all_items)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::aggregation::fixtures::article_item;
    use crate::store::{ScanKey, ScanPage};

    /// Scripted store yielding a fixed page sequence and counting requests.
    struct PagedStore {
        pages: Vec<Vec<Item>>,
        requests: AtomicUsize,
    }

    impl PagedStore {
        fn new(pages: Vec<Vec<Item>>) -> Self {
            Self {
                pages,
                requests: AtomicUsize::new(0),
            }
        }

        fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ItemStore for PagedStore {
        async fn scan_page(
            &self,
            exclusive_start_key: Option<ScanKey>,
        ) -> Result<ScanPage, StoreError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let index: usize = exclusive_start_key
                .map(|key| key.sort_key.parse().expect("scripted continuation token"))
                .unwrap_or(0);
            let items = self.pages.get(index).cloned().unwrap_or_default();
            let last_evaluated_key = (index + 1 < self.pages.len()).then(|| ScanKey {
                partition_key: "PAGE".to_string(),
                sort_key: (index + 1).to_string(),
            });
            Ok(ScanPage {
                items,
                last_evaluated_key,
            })
        }
    }

    #[tokio::test]
    async fn single_page_issues_one_request() {
        let store = PagedStore::new(vec![vec![article_item("c1", 1, Some("2024-01-01"))]]);
        let items = collect_all_items(&store).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(store.requests(), 1);
    }

    #[tokio::test]
    async fn merges_all_pages_into_one_set() {
        let store = PagedStore::new(vec![
            vec![
                article_item("c1", 1, Some("2024-01-01")),
                article_item("c1", 2, Some("2024-01-02")),
            ],
            vec![],
            vec![article_item("c2", 3, Some("2024-01-03"))],
        ]);

        let items = collect_all_items(&store).await.unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(store.requests(), 3);
        // Page order is preserved within the merged set.
        assert_eq!(items[0].sort_key, "ARTICLE#1");
        assert_eq!(items[2].sort_key, "ARTICLE#3");
    }

    #[tokio::test]
    async fn empty_table_yields_empty_set() {
        let store = PagedStore::new(vec![vec![]]);
        let items = collect_all_items(&store).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(store.requests(), 1);
    }

    struct FailingStore;

    #[async_trait]
    impl ItemStore for FailingStore {
        async fn scan_page(
            &self,
            _exclusive_start_key: Option<ScanKey>,
        ) -> Result<ScanPage, StoreError> {
            Err(StoreError::Scan("access denied".to_string()))
        }
    }

    #[tokio::test]
    async fn page_failure_aborts_collection() {
        let err = collect_all_items(&FailingStore).await.unwrap_err();
        assert!(matches!(err, StoreError::Scan(_)));
    }
}

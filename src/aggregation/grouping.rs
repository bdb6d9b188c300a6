use std::collections::HashMap;

use super::types::Item;

/// Output of the grouping pass: article lists keyed by owning partition,
/// plus the global count of well-formed articles.
#[derive(Debug, Default)]
pub struct GroupedItems {
    pub buckets: HashMap<String, Vec<Item>>,
    pub article_count: usize,
}

/// Partition the collected item set into per-cluster article buckets.
///
/// Two explicit passes over the same set: the first reserves a bucket for
/// every cluster record (clusters that never receive an article keep an
/// empty bucket), the second attaches well-formed articles to the bucket
/// of their partition key. The scan result is unordered, so attachment
/// must not depend on whether a cluster record happened to precede its
/// articles.
///
/// Articles whose partition has no cluster record still count toward the
/// global total but are not bucketed.
pub fn group_items(items: &[Item]) -> GroupedItems {
    let mut grouped = GroupedItems::default();

    for item in items {
        if item.is_cluster {
            grouped
                .buckets
                .entry(item.partition_key.clone())
                .or_default();
        }
    }

    for item in items {
        if !item.is_well_formed_article() {
            continue;
        }
        grouped.article_count += 1;
        if let Some(bucket) = grouped.buckets.get_mut(&item.partition_key) {
            bucket.push(item.clone());
        }
    }

    grouped
}

use std::collections::HashMap;

use super::types::{Cluster, Item};
use super::MIN_CLUSTER_ARTICLES;

/// Join cluster records with their article buckets and rank the result.
///
/// A cluster is shown only once summarization has filled in its
/// `generated_summary` and at least `MIN_CLUSTER_ARTICLES` articles were
/// bucketed under it. Ranking is by article count descending; the sort is
/// stable so equal-count clusters keep their relative order between
/// cycles instead of flickering.
pub fn assemble_clusters(items: &[Item], buckets: &HashMap<String, Vec<Item>>) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = items
        .iter()
        .filter(|item| item.is_cluster && item.has_generated_summary())
        .filter_map(|item| {
            let bucket = buckets.get(&item.partition_key)?;
            if bucket.len() < MIN_CLUSTER_ARTICLES {
                return None;
            }
            Some(Cluster {
                partition_key: item.partition_key.clone(),
                description: item.description.clone(),
                generated_summary: item.generated_summary.clone().unwrap_or_default(),
                article_count: bucket.len(),
                articles: bucket.clone(),
            })
        })
        .collect();

    clusters.sort_by(|a, b| b.article_count.cmp(&a.article_count));
    clusters
}

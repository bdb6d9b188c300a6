// Module declarations
pub mod assembler;
pub mod collector;
pub mod grouping;
pub mod types;

pub use assembler::assemble_clusters;
pub use collector::collect_all_items;
pub use grouping::{group_items, GroupedItems};
pub use types::{Cluster, Item};

/// Sort key prefix identifying article records within a partition.
pub const ARTICLE_SORT_KEY_PREFIX: &str = "ARTICLE#";

/// Minimum number of bucketed articles before a cluster is worth showing.
pub const MIN_CLUSTER_ARTICLES: usize = 3;

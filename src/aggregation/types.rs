use serde::{Deserialize, Serialize};

use super::ARTICLE_SORT_KEY_PREFIX;

/// A raw record from the item store. Every record belongs to exactly one
/// partition and is either the cluster record for that partition or one of
/// its article records, distinguished by `is_cluster`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "PK")]
    pub partition_key: String,
    #[serde(rename = "SK")]
    pub sort_key: String,
    #[serde(default)]
    pub is_cluster: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Item {
    /// A well-formed article record: not a cluster record, carries the
    /// article sort key prefix, and has a publication date. Records
    /// missing the date are incomplete and excluded from all counts.
    pub fn is_well_formed_article(&self) -> bool {
        !self.is_cluster
            && self.sort_key.starts_with(ARTICLE_SORT_KEY_PREFIX)
            && self
                .publication_date
                .as_deref()
                .is_some_and(|date| !date.is_empty())
    }

    /// Summarization has run for this cluster record.
    pub fn has_generated_summary(&self) -> bool {
        self.generated_summary
            .as_deref()
            .is_some_and(|summary| !summary.is_empty())
    }
}

/// A displayable cluster joined with its article records. Materialized
/// fresh every refresh cycle and replaced wholesale on the next; never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    pub partition_key: String,
    pub description: Option<String>,
    pub generated_summary: String,
    /// Store scan order, not chronological.
    pub articles: Vec<Item>,
    pub article_count: usize,
}

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::aggregation::Item;
use crate::environment;
use crate::TARGET_STORE;

use super::{ItemStore, ScanKey, ScanPage, StoreError};

/// DynamoDB-backed item store scanning one fixed table.
pub struct DynamoItemStore {
    client: Client,
    table_name: String,
}

impl DynamoItemStore {
    /// Resolve shared AWS config (credentials, region) and build the
    /// client. This is the single async initialization step; refresh
    /// cycles only read the resulting handle.
    pub async fn new() -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = environment::table_region() {
            loader = loader.region(Region::new(region));
        }
        let config = loader.load().await;
        let table_name = environment::table_name();
        info!(target: TARGET_STORE, "DynamoDB client ready for table {}", table_name);

        Self {
            client: Client::new(&config),
            table_name,
        }
    }
}

#[async_trait::async_trait]
impl ItemStore for DynamoItemStore {
    async fn scan_page(
        &self,
        exclusive_start_key: Option<ScanKey>,
    ) -> Result<ScanPage, StoreError> {
        let mut request = self.client.scan().table_name(&self.table_name);
        if let Some(key) = exclusive_start_key {
            request = request
                .exclusive_start_key("PK", AttributeValue::S(key.partition_key))
                .exclusive_start_key("SK", AttributeValue::S(key.sort_key));
        }

        let output = request
            .send()
            .await
            .map_err(|err| StoreError::Scan(err.to_string()))?;

        let items: Vec<Item> = output
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(item_from_attributes)
            .collect();
        let last_evaluated_key = output
            .last_evaluated_key
            .as_ref()
            .and_then(scan_key_from_attributes);

        debug!(
            target: TARGET_STORE,
            "Scanned page with {} items from {} (more: {})",
            items.len(),
            self.table_name,
            last_evaluated_key.is_some()
        );

        Ok(ScanPage {
            items,
            last_evaluated_key,
        })
    }
}

fn string_attr(attributes: &HashMap<String, AttributeValue>, name: &str) -> Option<String> {
    attributes.get(name).and_then(|v| v.as_s().ok()).cloned()
}

fn bool_attr(attributes: &HashMap<String, AttributeValue>, name: &str) -> bool {
    attributes
        .get(name)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(false)
}

/// Convert one raw attribute map into an `Item`. Records without the key
/// pair are malformed and silently dropped rather than failing the scan.
fn item_from_attributes(attributes: HashMap<String, AttributeValue>) -> Option<Item> {
    let (Some(partition_key), Some(sort_key)) =
        (string_attr(&attributes, "PK"), string_attr(&attributes, "SK"))
    else {
        debug!(target: TARGET_STORE, "Dropping record without PK/SK");
        return None;
    };

    Some(Item {
        partition_key,
        sort_key,
        is_cluster: bool_attr(&attributes, "is_cluster"),
        description: string_attr(&attributes, "description"),
        generated_summary: string_attr(&attributes, "generated_summary"),
        publication_date: string_attr(&attributes, "publication_date"),
        title: string_attr(&attributes, "title"),
        summary: string_attr(&attributes, "summary"),
        text: string_attr(&attributes, "text"),
    })
}

fn scan_key_from_attributes(attributes: &HashMap<String, AttributeValue>) -> Option<ScanKey> {
    Some(ScanKey {
        partition_key: string_attr(attributes, "PK")?,
        sort_key: string_attr(attributes, "SK")?,
    })
}

pub mod aggregation;
pub mod engine;
pub mod environment;
pub mod logging;
pub mod store;
pub mod web;

pub const TARGET_STORE: &str = "store_request";
pub const TARGET_AGGREGATION: &str = "aggregation";
pub const TARGET_WEB_REQUEST: &str = "web_request";

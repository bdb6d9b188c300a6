use std::io;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub fn configure_logging() {
    // Stdout log configuration
    let stdout_log = fmt::layer().with_writer(io::stdout).with_filter(EnvFilter::new(
        "info,aggregation=info,store_request=warn,web_request=warn,aws_config=warn,aws_smithy_runtime=warn,hyper=warn",
    ));

    // File log configuration
    let file_appender = rolling::daily("logs", "clusterview.log");
    let file_log = fmt::layer().with_writer(file_appender).with_filter(EnvFilter::new(
        "info,aggregation=debug,store_request=debug,web_request=info",
    ));

    tracing_subscriber::Registry::default()
        .with(stdout_log)
        .with(file_log)
        .init();
}

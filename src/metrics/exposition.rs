//! Text exposition of the metrics registry.

use crate::metrics::{MetricsError, ServiceMetrics};
use prometheus_client::encoding::text::encode;

/// Content type of the OpenMetrics text produced by [`encode_metrics`].
pub const CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Encode every registered instrument into the OpenMetrics text format.
///
/// Each instrument is read independently; the output is not a consistent
/// snapshot across instruments.
pub fn encode_metrics(metrics: &ServiceMetrics) -> Result<String, MetricsError> {
    let mut buffer = String::new();
    encode(&mut buffer, metrics.registry())?;
    Ok(buffer)
}

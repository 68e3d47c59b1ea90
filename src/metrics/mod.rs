//! Metrics collection and exposition.

mod collector;
mod exposition;

pub use collector::{
    FloatGauge, MetricsError, MetricsRegistry, PathLabels, PathValue, ServiceMetrics,
    CURRENT_GOROUTINES, HTTP_REQUESTS, LAST_REQUEST_TIMESTAMP,
};
pub use exposition::{encode_metrics, CONTENT_TYPE};

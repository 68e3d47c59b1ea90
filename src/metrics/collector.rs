//! Metrics collector using prometheus-client.
//!
//! Owns the registry and the three service instruments: the per-path request
//! counter, the last request timestamp and the simulated work gauge.

use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue, LabelValueEncoder};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::{Metric, Registry};
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Name of the request counter. The text encoder appends `_total`.
pub const HTTP_REQUESTS: &str = "http_requests";
/// Name of the last request timestamp gauge.
pub const LAST_REQUEST_TIMESTAMP: &str = "last_request_timestamp_seconds";
/// Name of the simulated work gauge.
pub const CURRENT_GOROUTINES: &str = "current_goroutines";

/// Gauge holding a floating point value.
pub type FloatGauge = Gauge<f64, AtomicU64>;

/// Errors raised while registering or encoding metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metric '{0}' is already registered")]
    DuplicateMetric(String),

    #[error("failed to encode metrics: {0}")]
    EncodeError(#[from] std::fmt::Error),
}

/// Labels for request metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct PathLabels {
    pub path: PathValue,
}

/// Request path used as a label value.
///
/// The text encoder writes label values verbatim, so `\`, `"` and newlines
/// are escaped here to keep the exposition parseable.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct PathValue(String);

impl PathValue {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The unescaped path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EncodeLabelValue for PathValue {
    fn encode(&self, encoder: &mut LabelValueEncoder) -> Result<(), std::fmt::Error> {
        for c in self.0.chars() {
            match c {
                '\\' => encoder.write_str("\\\\")?,
                '"' => encoder.write_str("\\\"")?,
                '\n' => encoder.write_str("\\n")?,
                c => encoder.write_char(c)?,
            }
        }
        Ok(())
    }
}

/// Registry wrapper that refuses a second registration under the same name.
///
/// `Registry::register` accepts duplicates silently and would emit the
/// metric twice, so names are tracked here.
pub struct MetricsRegistry {
    registry: Registry,
    names: HashSet<String>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            registry: Registry::default(),
            names: HashSet::new(),
        }
    }

    /// Register a metric under `name`.
    pub fn register(
        &mut self,
        name: &str,
        help: &str,
        metric: impl Metric,
    ) -> Result<(), MetricsError> {
        if !self.names.insert(name.to_string()) {
            return Err(MetricsError::DuplicateMetric(name.to_string()));
        }
        self.registry.register(name, help, metric);
        Ok(())
    }

    /// Consume the wrapper, returning the populated registry.
    pub fn into_inner(self) -> Registry {
        self.registry
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects and stores all service metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    inner: Arc<ServiceMetricsInner>,
}

struct ServiceMetricsInner {
    /// Total requests counter, one series per request path.
    requests_total: Family<PathLabels, Counter>,
    /// Unix timestamp (seconds) of the last root request.
    last_request_timestamp: FloatGauge,
    /// Value produced by the simulated workload.
    current_goroutines: FloatGauge,
    /// The prometheus registry.
    registry: Registry,
}

impl ServiceMetrics {
    /// Create the instruments and register each of them exactly once.
    pub fn new() -> Result<Self, MetricsError> {
        let mut registry = MetricsRegistry::new();

        let requests_total = Family::<PathLabels, Counter>::default();
        let last_request_timestamp = FloatGauge::default();
        let current_goroutines = FloatGauge::default();

        registry.register(
            HTTP_REQUESTS,
            "Total number of HTTP requests",
            requests_total.clone(),
        )?;
        registry.register(
            LAST_REQUEST_TIMESTAMP,
            "Unix timestamp of the last HTTP request",
            last_request_timestamp.clone(),
        )?;
        registry.register(
            CURRENT_GOROUTINES,
            "Number of active goroutines",
            current_goroutines.clone(),
        )?;

        Ok(Self {
            inner: Arc::new(ServiceMetricsInner {
                requests_total,
                last_request_timestamp,
                current_goroutines,
                registry: registry.into_inner(),
            }),
        })
    }

    /// Get the prometheus registry for encoding.
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Count a request for `path`, creating its series on first use.
    pub fn record_request(&self, path: &str) {
        let labels = PathLabels {
            path: PathValue::new(path),
        };
        self.inner.requests_total.get_or_create(&labels).inc();
    }

    /// Store `now` as the last request time, truncated to whole seconds.
    pub fn record_request_time(&self, now: SystemTime) {
        let secs = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.inner.last_request_timestamp.set(secs as f64);
    }

    /// Overwrite the simulated work gauge.
    pub fn set_current_goroutines(&self, value: f64) {
        self.inner.current_goroutines.set(value);
    }

    pub fn last_request_timestamp(&self) -> f64 {
        self.inner.last_request_timestamp.get()
    }

    pub fn current_goroutines(&self) -> f64 {
        self.inner.current_goroutines.get()
    }
}

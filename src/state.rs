//! Shared application state.

use crate::config::Config;
use crate::metrics::{MetricsError, ServiceMetrics};
use crate::service::{SimulatedWork, Workload};
use crate::util::ShutdownSignal;
use std::sync::Arc;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Metrics registry and instruments.
    metrics: ServiceMetrics,

    /// Work performed by the root route.
    workload: Arc<dyn Workload>,

    /// Path serving the metrics exposition.
    metrics_path: Arc<str>,

    /// Path serving the health check.
    health_path: Arc<str>,

    /// Shutdown signal.
    shutdown: ShutdownSignal,
}

impl AppState {
    /// Create application state, registering a fresh set of metrics.
    pub fn new(config: &Config) -> Result<Self, MetricsError> {
        Ok(Self {
            metrics: ServiceMetrics::new()?,
            workload: Arc::new(SimulatedWork::new(&config.work)),
            metrics_path: Arc::from(config.server.metrics_path.as_str()),
            health_path: Arc::from(config.server.health_path.as_str()),
            shutdown: ShutdownSignal::new(),
        })
    }

    /// Replace the workload run by the root route.
    pub fn with_workload(mut self, workload: Arc<dyn Workload>) -> Self {
        self.workload = workload;
        self
    }

    /// Get the metrics.
    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    /// Get the workload.
    pub fn workload(&self) -> &dyn Workload {
        self.workload.as_ref()
    }

    /// Get the metrics exposition path.
    pub fn metrics_path(&self) -> &str {
        &self.metrics_path
    }

    /// Get the health check path.
    pub fn health_path(&self) -> &str {
        &self.health_path
    }

    /// Get the shutdown signal.
    pub fn shutdown(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Trigger shutdown.
    pub fn trigger_shutdown(&self) {
        self.shutdown.shutdown();
    }
}

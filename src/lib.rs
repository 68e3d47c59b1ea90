//! sample-service - A sample HTTP microservice instrumented with Prometheus metrics
//!
//! The service exposes three kinds of routes:
//! - a health check answering `OK`
//! - a metrics endpoint in the OpenMetrics text format
//! - a catch-all root route that counts requests per path and runs a
//!   simulated workload

pub mod config;
pub mod metrics;
pub mod server;
pub mod service;
pub mod state;
pub mod util;

pub use config::Config;
pub use state::AppState;

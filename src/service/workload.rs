//! Simulated business logic run by the root route.

use crate::config::WorkConfig;
use std::time::Duration;

/// Work performed for each root request.
pub trait Workload: Send + Sync {
    /// How long the request should take, given its declared content length.
    ///
    /// `None` means the length is unknown or unparsable.
    fn delay(&self, content_length: Option<u64>) -> Duration;

    /// Value reported on the work gauge once the request has finished.
    fn gauge_value(&self, path: &str) -> f64;
}

/// Sleeps `content_length % modulus` units and reports `path.len() + offset`.
#[derive(Debug, Clone)]
pub struct SimulatedWork {
    modulus: u64,
    unit: Duration,
    gauge_offset: f64,
}

impl SimulatedWork {
    pub fn new(config: &WorkConfig) -> Self {
        Self {
            modulus: config.modulus,
            unit: config.unit,
            gauge_offset: config.gauge_offset,
        }
    }
}

impl Default for SimulatedWork {
    fn default() -> Self {
        Self::new(&WorkConfig::default())
    }
}

impl Workload for SimulatedWork {
    fn delay(&self, content_length: Option<u64>) -> Duration {
        let units = content_length
            .and_then(|len| len.checked_rem(self.modulus))
            .unwrap_or(0);
        self.unit
            .saturating_mul(u32::try_from(units).unwrap_or(u32::MAX))
    }

    fn gauge_value(&self, path: &str) -> f64 {
        path.len() as f64 + self.gauge_offset
    }
}

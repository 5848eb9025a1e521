//! Boot Resource Loading
//!
//! The first boot step. The shipped loader only simulates latency and can
//! not fail, but the trait is fallible so a real loader's error propagates
//! out of boot.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ControllerError;

/// Store key for the load timestamp
pub const LOAD_TIME_KEY: &str = "loadTime";

/// Written once into the store when loading finishes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootResult {
    /// Completion time, milliseconds since the Unix epoch
    pub load_time_ms: i64,
}

impl BootResult {
    /// Stamp with the current wall-clock time
    #[must_use]
    pub fn now() -> Self {
        Self {
            load_time_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Loads whatever the page needs before wiring
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    /// Load resources
    async fn load(&self) -> Result<BootResult, ControllerError>;
}

/// Fixed-delay loader
#[derive(Clone, Copy, Debug)]
pub struct SimulatedResourceLoader {
    delay: Duration,
}

impl SimulatedResourceLoader {
    /// Loader that completes after `delay`
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedResourceLoader {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[async_trait]
impl ResourceLoader for SimulatedResourceLoader {
    async fn load(&self) -> Result<BootResult, ControllerError> {
        tokio::time::sleep(self.delay).await;
        Ok(BootResult::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_loader_waits() {
        let loader = SimulatedResourceLoader::new(Duration::from_millis(100));
        let start = tokio::time::Instant::now();
        let result = loader.load().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert!(result.load_time_ms > 0);
    }
}

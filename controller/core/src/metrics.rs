//! Performance Metrics
//!
//! Best-effort telemetry logged once at the end of boot. Absent figures are
//! reported as `unknown`; collection never fails.

use serde::Serialize;

use crate::capabilities::PerformanceProbe;

/// Placeholder for figures the host cannot provide
pub const UNKNOWN: &str = "unknown";

/// Snapshot of host performance figures
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Milliseconds since the time origin when boot finished
    pub load_time_ms: f64,
    /// Device memory in GB, or `unknown`
    pub memory: String,
    /// Effective connection type, or `unknown`
    pub connection: String,
}

impl PerformanceMetrics {
    /// Collect from a probe
    ///
    /// Returns `None` when the host has no performance timing at all.
    pub fn collect(probe: &dyn PerformanceProbe) -> Option<Self> {
        let load_time_ms = probe.now_ms()?;
        Some(Self {
            load_time_ms,
            memory: probe
                .device_memory_gb()
                .map_or_else(|| UNKNOWN.to_string(), |gb| gb.to_string()),
            connection: probe
                .connection_type()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
        })
    }

    /// Collect and log at info level
    pub fn log(probe: &dyn PerformanceProbe) -> Option<Self> {
        let Some(metrics) = Self::collect(probe) else {
            tracing::debug!("Performance timing unavailable, skipping metrics");
            return None;
        };
        tracing::info!(
            load_time_ms = metrics.load_time_ms,
            memory = %metrics.memory,
            connection = %metrics.connection,
            "Performance metrics"
        );
        Some(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{NoPerformance, ProcessPerformance};

    struct FixedProbe;

    impl PerformanceProbe for FixedProbe {
        fn now_ms(&self) -> Option<f64> {
            Some(123.5)
        }

        fn connection_type(&self) -> Option<String> {
            Some(String::new())
        }
    }

    #[test]
    fn test_missing_figures_are_unknown() {
        let metrics = PerformanceMetrics::collect(&FixedProbe).unwrap();
        assert_eq!(metrics.load_time_ms, 123.5);
        assert_eq!(metrics.memory, UNKNOWN);
        assert_eq!(metrics.connection, UNKNOWN);
    }

    #[test]
    fn test_full_probe() {
        let probe = ProcessPerformance::new()
            .with_device_memory_gb(4.0)
            .with_connection_type("3g");
        let metrics = PerformanceMetrics::log(&probe).unwrap();
        assert_eq!(metrics.memory, "4");
        assert_eq!(metrics.connection, "3g");
    }

    #[test]
    fn test_no_timing_skips() {
        assert!(PerformanceMetrics::collect(&NoPerformance).is_none());
        assert!(PerformanceMetrics::log(&NoPerformance).is_none());
    }
}

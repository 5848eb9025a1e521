//! Host Capabilities
//!
//! Optional features of the hosting environment, injected into the
//! controller instead of probed at runtime. Each capability has a null
//! implementation for hosts that lack it, so the core logic never checks
//! whether a feature exists.
//!
//! - [`VisibilityProvider`]: viewport-intersection observation
//! - [`PerformanceProbe`]: timing, device memory, connection type

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::dom::NodeId;

// ============================================================================
// Visibility observation
// ============================================================================

/// One observed element's intersection state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// The observed element
    pub target: NodeId,
    /// Whether the element currently intersects the viewport
    pub is_intersecting: bool,
    /// Visible fraction of the element (0.0 - 1.0)
    pub ratio: f64,
}

/// Called with a batch of entries whose state crossed the threshold
pub type IntersectionCallback = Arc<dyn Fn(&[IntersectionEntry]) + Send + Sync>;

/// A live observer
pub trait VisibilityObserver: Send + Sync {
    /// Start tracking an element
    fn observe(&self, target: NodeId);

    /// Number of tracked elements
    fn observed_count(&self) -> usize;
}

/// Factory for visibility observers
pub trait VisibilityProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Whether observers created here ever report entries
    fn is_supported(&self) -> bool {
        true
    }

    /// Create an observer reporting entries that cross `threshold`
    fn create_observer(
        &self,
        threshold: f64,
        callback: IntersectionCallback,
    ) -> Arc<dyn VisibilityObserver>;
}

/// Provider for hosts without visibility observation
#[derive(Clone, Copy, Debug, Default)]
pub struct NoVisibility;

struct NoopObserver;

impl VisibilityObserver for NoopObserver {
    fn observe(&self, _target: NodeId) {}

    fn observed_count(&self) -> usize {
        0
    }
}

impl VisibilityProvider for NoVisibility {
    fn name(&self) -> &str {
        "none"
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn create_observer(
        &self,
        _threshold: f64,
        _callback: IntersectionCallback,
    ) -> Arc<dyn VisibilityObserver> {
        Arc::new(NoopObserver)
    }
}

struct ViewportObserver {
    threshold: f64,
    callback: IntersectionCallback,
    targets: Mutex<Vec<NodeId>>,
}

impl VisibilityObserver for ViewportObserver {
    fn observe(&self, target: NodeId) {
        let mut targets = self.targets.lock();
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    fn observed_count(&self) -> usize {
        self.targets.lock().len()
    }
}

/// In-memory viewport driven by explicit scroll reports
///
/// The host tells the viewport which elements are how visible; every
/// observer gets the entries for the targets it tracks.
#[derive(Clone, Default)]
pub struct InMemoryViewport {
    observers: Arc<Mutex<Vec<Arc<ViewportObserver>>>>,
}

impl InMemoryViewport {
    /// Create an empty viewport
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of observers created so far
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    /// Report visible fractions for a set of elements
    ///
    /// An entry is intersecting when its ratio is positive and at least the
    /// observer's threshold. Callbacks run after the viewport's lock is
    /// released. Returns the number of entries delivered.
    pub fn report(&self, visibility: &[(NodeId, f64)]) -> usize {
        let observers = self.observers.lock().clone();
        let mut delivered = 0;
        for observer in observers {
            let targets = observer.targets.lock().clone();
            let entries: Vec<IntersectionEntry> = visibility
                .iter()
                .filter(|(node, _)| targets.contains(node))
                .map(|&(target, ratio)| IntersectionEntry {
                    target,
                    is_intersecting: ratio > 0.0 && ratio >= observer.threshold,
                    ratio: ratio.clamp(0.0, 1.0),
                })
                .collect();
            if !entries.is_empty() {
                delivered += entries.len();
                (observer.callback)(&entries);
            }
        }
        delivered
    }
}

impl VisibilityProvider for InMemoryViewport {
    fn name(&self) -> &str {
        "in-memory-viewport"
    }

    fn create_observer(
        &self,
        threshold: f64,
        callback: IntersectionCallback,
    ) -> Arc<dyn VisibilityObserver> {
        let observer = Arc::new(ViewportObserver {
            threshold,
            callback,
            targets: Mutex::new(Vec::new()),
        });
        self.observers.lock().push(Arc::clone(&observer));
        observer
    }
}

// ============================================================================
// Performance probe
// ============================================================================

/// Read-only telemetry source
pub trait PerformanceProbe: Send + Sync {
    /// Milliseconds since the page's time origin, if timing is available
    fn now_ms(&self) -> Option<f64>;

    /// Approximate device memory in gigabytes
    fn device_memory_gb(&self) -> Option<f64> {
        None
    }

    /// Effective connection type (e.g. "4g")
    fn connection_type(&self) -> Option<String> {
        None
    }
}

/// Probe for hosts without a performance API
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPerformance;

impl PerformanceProbe for NoPerformance {
    fn now_ms(&self) -> Option<f64> {
        None
    }
}

/// Probe measuring from process-local time origin
#[derive(Clone, Debug)]
pub struct ProcessPerformance {
    origin: Instant,
    device_memory_gb: Option<f64>,
    connection_type: Option<String>,
}

impl ProcessPerformance {
    /// Start the clock now; memory and connection unknown
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            device_memory_gb: None,
            connection_type: None,
        }
    }

    /// Report a device memory figure
    #[must_use]
    pub fn with_device_memory_gb(mut self, gb: f64) -> Self {
        self.device_memory_gb = Some(gb);
        self
    }

    /// Report a connection type
    #[must_use]
    pub fn with_connection_type(mut self, connection: impl Into<String>) -> Self {
        self.connection_type = Some(connection.into());
        self
    }
}

impl Default for ProcessPerformance {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceProbe for ProcessPerformance {
    fn now_ms(&self) -> Option<f64> {
        Some(self.origin.elapsed().as_secs_f64() * 1000.0)
    }

    fn device_memory_gb(&self) -> Option<f64> {
        self.device_memory_gb
    }

    fn connection_type(&self) -> Option<String> {
        self.connection_type.clone()
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// All optional capabilities of a host
#[derive(Clone)]
pub struct Capabilities {
    /// Viewport-intersection observation
    pub visibility: Arc<dyn VisibilityProvider>,
    /// Performance telemetry
    pub performance: Arc<dyn PerformanceProbe>,
}

impl Capabilities {
    /// Bundle the given providers
    pub fn new(
        visibility: Arc<dyn VisibilityProvider>,
        performance: Arc<dyn PerformanceProbe>,
    ) -> Self {
        Self {
            visibility,
            performance,
        }
    }

    /// A host with no optional capabilities
    #[must_use]
    pub fn none() -> Self {
        Self::new(Arc::new(NoVisibility), Arc::new(NoPerformance))
    }

    /// Replace the visibility provider
    #[must_use]
    pub fn with_visibility(mut self, visibility: Arc<dyn VisibilityProvider>) -> Self {
        self.visibility = visibility;
        self
    }

    /// Replace the performance probe
    #[must_use]
    pub fn with_performance(mut self, performance: Arc<dyn PerformanceProbe>) -> Self {
        self.performance = performance;
        self
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_callback() -> (IntersectionCallback, Arc<Mutex<Vec<IntersectionEntry>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: IntersectionCallback =
            Arc::new(move |entries: &[IntersectionEntry]| sink.lock().extend_from_slice(entries));
        (callback, seen)
    }

    #[test]
    fn test_viewport_reports_only_observed_targets() {
        let viewport = InMemoryViewport::new();
        let (callback, seen) = recording_callback();
        let observer = viewport.create_observer(0.1, callback);
        observer.observe(NodeId(1));
        observer.observe(NodeId(1));
        assert_eq!(observer.observed_count(), 1);

        let delivered = viewport.report(&[(NodeId(1), 0.5), (NodeId(2), 1.0)]);
        assert_eq!(delivered, 1);
        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].target, NodeId(1));
        assert!(seen[0].is_intersecting);
    }

    #[test]
    fn test_viewport_threshold() {
        let viewport = InMemoryViewport::new();
        let (callback, seen) = recording_callback();
        let observer = viewport.create_observer(0.1, callback);
        observer.observe(NodeId(1));
        observer.observe(NodeId(2));
        observer.observe(NodeId(3));

        viewport.report(&[(NodeId(1), 0.05), (NodeId(2), 0.1), (NodeId(3), 0.0)]);
        let flags: Vec<bool> = seen.lock().iter().map(|e| e.is_intersecting).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_no_visibility_never_tracks() {
        let provider = NoVisibility;
        assert!(!provider.is_supported());
        let (callback, _) = recording_callback();
        let observer = provider.create_observer(0.1, callback);
        observer.observe(NodeId(1));
        assert_eq!(observer.observed_count(), 0);
    }

    #[test]
    fn test_performance_probes() {
        assert!(NoPerformance.now_ms().is_none());
        assert!(NoPerformance.device_memory_gb().is_none());

        let probe = ProcessPerformance::new()
            .with_device_memory_gb(8.0)
            .with_connection_type("4g");
        assert!(probe.now_ms().is_some_and(|ms| ms >= 0.0));
        assert_eq!(probe.device_memory_gb(), Some(8.0));
        assert_eq!(probe.connection_type().as_deref(), Some("4g"));
    }
}

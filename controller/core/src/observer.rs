//! Scroll Reveal
//!
//! One visibility observer over every feature tile and tech card. Elements
//! that intersect the viewport get the reveal marker class; the marker is
//! never removed. With a host that cannot observe visibility nothing is
//! tracked and elements simply render without the reveal animation.

use std::sync::Arc;

use crate::capabilities::{IntersectionCallback, IntersectionEntry, VisibilityProvider};
use crate::config::{RevealConfig, SelectorConfig};
use crate::dom::PageHandle;

/// Registers page elements with a visibility observer
#[derive(Clone, Debug)]
pub struct ScrollVisibilityObserver {
    reveal: RevealConfig,
    selectors: SelectorConfig,
}

impl ScrollVisibilityObserver {
    /// Build from configuration
    #[must_use]
    pub fn new(reveal: RevealConfig, selectors: SelectorConfig) -> Self {
        Self { reveal, selectors }
    }

    /// Create the observer and register features, then tech cards
    ///
    /// Returns the number of elements registered.
    pub fn start(&self, page: &PageHandle, provider: &dyn VisibilityProvider) -> usize {
        if !provider.is_supported() {
            tracing::debug!(provider = provider.name(), "Visibility observation unavailable, skipping reveal");
            return 0;
        }

        let marker = self.reveal.marker_class.clone();
        let target_page = page.clone();
        let callback: IntersectionCallback = Arc::new(move |entries: &[IntersectionEntry]| {
            target_page.with(|p| {
                for entry in entries.iter().filter(|e| e.is_intersecting) {
                    p.add_class(entry.target, &marker);
                }
            });
        });
        let observer = provider.create_observer(self.reveal.threshold, callback);

        let targets = page.with(|p| {
            let mut targets = p.query_by_class(&self.selectors.feature_class);
            targets.extend(p.query_by_class(&self.selectors.tech_card_class));
            targets
        });
        for target in &targets {
            observer.observe(*target);
        }

        tracing::debug!(
            provider = provider.name(),
            threshold = self.reveal.threshold,
            observed = targets.len(),
            "Scroll reveal started"
        );
        targets.len()
    }
}

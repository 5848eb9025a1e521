//! UI Enhancer
//!
//! Attaches interactive behavior to elements already in the page:
//!
//! - tech cards get a staggered entrance animation and a click listener that
//!   shows the topic's notification
//! - feature tiles get a hover scale effect
//!
//! Missing elements simply mean nothing is attached. Calling
//! [`UiEnhancer::enhance`] twice on the same page attaches a second set of
//! listeners; the controller only calls it once per page lifetime.

use crate::config::{SelectorConfig, TimingConfig};
use crate::dom::{NodeId, PageHandle};
use crate::events::{listener, EventKind};
use crate::notifications::NotificationPresenter;
use crate::topics;

/// Entrance animation class for tech cards
pub const FADE_IN_CLASS: &str = "fade-in";

const HOVER_SCALE: &str = "scale(1.02)";
const BASE_SCALE: &str = "scale(1)";
const HOVER_TRANSITION: &str = "transform 0.3s ease";

/// What [`UiEnhancer::enhance`] touched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnhanceSummary {
    /// Tech cards animated and made clickable
    pub tech_cards: usize,
    /// Feature tiles given hover effects
    pub features: usize,
}

/// Attaches hover and click behavior
#[derive(Clone, Debug)]
pub struct UiEnhancer {
    selectors: SelectorConfig,
    stagger_step_secs: f64,
    presenter: NotificationPresenter,
}

impl UiEnhancer {
    /// Build from configuration
    #[must_use]
    pub fn new(selectors: SelectorConfig, timing: &TimingConfig) -> Self {
        Self {
            selectors,
            stagger_step_secs: timing.stagger_step_secs,
            presenter: NotificationPresenter::from_timing(timing),
        }
    }

    /// Attach all behaviors
    pub fn enhance(&self, page: &PageHandle) -> EnhanceSummary {
        let summary = EnhanceSummary {
            tech_cards: self.enhance_tech_cards(page),
            features: self.enhance_features(page),
        };
        tracing::debug!(
            tech_cards = summary.tech_cards,
            features = summary.features,
            "UI enhanced"
        );
        summary
    }

    fn enhance_tech_cards(&self, page: &PageHandle) -> usize {
        let cards = page.with(|p| {
            let cards = p.query_by_class(&self.selectors.tech_card_class);
            for (index, card) in cards.iter().enumerate() {
                p.set_style(
                    *card,
                    "animation-delay",
                    stagger_delay(index, self.stagger_step_secs),
                );
                p.add_class(*card, FADE_IN_CLASS);
            }
            cards
        });

        for card in &cards {
            let heading_tag = self.selectors.heading_tag.clone();
            let presenter = self.presenter;
            page.add_event_listener(
                *card,
                EventKind::Click,
                listener(move |page, node| {
                    show_topic_details(page, node, &heading_tag, &presenter);
                }),
            );
        }
        cards.len()
    }

    fn enhance_features(&self, page: &PageHandle) -> usize {
        let features = page.with(|p| p.query_by_class(&self.selectors.feature_class));
        for feature in &features {
            page.add_event_listener(
                *feature,
                EventKind::PointerEnter,
                listener(|page, node| {
                    page.with(|p| {
                        p.set_style(node, "transform", HOVER_SCALE);
                        p.set_style(node, "transition", HOVER_TRANSITION);
                    });
                }),
            );
            page.add_event_listener(
                *feature,
                EventKind::PointerLeave,
                listener(|page, node| page.with(|p| p.set_style(node, "transform", BASE_SCALE))),
            );
        }
        features.len()
    }
}

/// `animation-delay` for the card at `index`
fn stagger_delay(index: usize, step_secs: f64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let secs = index as f64 * step_secs;
    // Round away float noise such as 0.30000000000000004
    let secs = (secs * 1000.0).round() / 1000.0;
    format!("{secs}s")
}

/// Click handler body: heading text → topic lookup → notification
fn show_topic_details(
    page: &PageHandle,
    card: NodeId,
    heading_tag: &str,
    presenter: &NotificationPresenter,
) -> Option<NodeId> {
    let heading = page.with(|p| {
        p.first_descendant_by_tag(card, heading_tag)
            .map(|h| p.text(h).to_string())
    })?;
    let Some(message) = topics::notification_text(&heading) else {
        tracing::trace!(topic = %heading, "No details for topic");
        return None;
    };
    Some(presenter.show(page, &message))
}

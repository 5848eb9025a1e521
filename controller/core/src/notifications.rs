//! Toast Notifications
//!
//! Transient messages appended to the page body. Each `show` creates an
//! independent element with its own removal timer: after the display time
//! the exit animation starts, after the exit time the element is detached.
//! No cap, no queue, no merging of duplicates.

use std::time::Duration;

use crate::config::TimingConfig;
use crate::dom::{Element, NodeId, PageHandle};

/// Class carried by every notification element
pub const NOTIFICATION_CLASS: &str = "notification";

const ENTER_ANIMATION: &str = "slideIn 0.3s ease";
const EXIT_ANIMATION: &str = "slideOut 0.3s ease";

/// Inline style of a freshly shown notification
const TOAST_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "20px"),
    ("right", "20px"),
    (
        "background",
        "linear-gradient(135deg, var(--primary), var(--secondary))",
    ),
    ("color", "white"),
    ("padding", "1rem 2rem"),
    ("border-radius", "0.5rem"),
    ("box-shadow", "0 10px 30px rgba(0, 0, 0, 0.2)"),
    ("z-index", "1000"),
    ("max-width", "400px"),
];

/// Creates and schedules removal of notifications
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotificationPresenter {
    display: Duration,
    exit: Duration,
}

impl Default for NotificationPresenter {
    fn default() -> Self {
        Self::from_timing(&TimingConfig::default())
    }
}

impl NotificationPresenter {
    /// Presenter with explicit durations
    #[must_use]
    pub fn new(display: Duration, exit: Duration) -> Self {
        Self { display, exit }
    }

    /// Presenter using the configured durations
    #[must_use]
    pub fn from_timing(timing: &TimingConfig) -> Self {
        Self::new(timing.notification_display(), timing.notification_exit())
    }

    /// Upper bound on a notification's lifetime
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.display + self.exit
    }

    /// Show a message; returns the new element
    ///
    /// Removal is scheduled on the current tokio runtime. Without a runtime
    /// the element stays on the page.
    pub fn show(&self, page: &PageHandle, message: &str) -> NodeId {
        let node = page.with(|p| {
            let mut element = Element::new("div")
                .with_class(NOTIFICATION_CLASS)
                .with_text(message);
            for (property, value) in TOAST_STYLE {
                element
                    .style
                    .insert((*property).to_string(), (*value).to_string());
            }
            element
                .style
                .insert("animation".to_string(), ENTER_ANIMATION.to_string());
            let body = p.body();
            p.append(body, element)
        });

        tracing::debug!(node = %node, message, "Showing notification");

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let page = page.clone();
                let (display, exit) = (self.display, self.exit);
                runtime.spawn(async move {
                    tokio::time::sleep(display).await;
                    page.with(|p| p.set_style(node, "animation", EXIT_ANIMATION));
                    tokio::time::sleep(exit).await;
                    page.with(|p| p.remove(node));
                    tracing::debug!(node = %node, "Notification removed");
                });
            }
            Err(_) => {
                tracing::warn!(node = %node, "No async runtime, notification will not auto-dismiss");
            }
        }

        node
    }

    /// Attached notifications, oldest first
    #[must_use]
    pub fn visible(page: &PageHandle) -> Vec<NodeId> {
        page.with(|p| p.query_by_class(NOTIFICATION_CLASS))
    }
}

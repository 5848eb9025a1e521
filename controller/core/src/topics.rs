//! Topic Lookup
//!
//! Static mapping from a tech-card heading to the text shown when the card
//! is clicked.

const TOPICS: &[(&str, &str)] = &[
    (
        "Python",
        "Backend processing with Flask. Data handling with pandas and numpy.",
    ),
    (
        "JavaScript",
        "ES6+ features, async/await, Web APIs, DOM manipulation.",
    ),
    ("R", "Statistical analysis with ggplot2, dplyr, corrplot."),
    (
        "HTML5/CSS3",
        "Semantic markup, responsive design, CSS Grid, Flexbox, animations.",
    ),
];

/// Details for a known topic (exact, case-sensitive match)
#[must_use]
pub fn describe(topic: &str) -> Option<&'static str> {
    TOPICS
        .iter()
        .find(|(name, _)| *name == topic)
        .map(|(_, details)| *details)
}

/// Notification text for a topic: `"{topic}: {details}"`
#[must_use]
pub fn notification_text(topic: &str) -> Option<String> {
    describe(topic).map(|details| format!("{topic}: {details}"))
}

/// All known topic names
pub fn known_topics() -> impl Iterator<Item = &'static str> {
    TOPICS.iter().map(|(name, _)| *name)
}

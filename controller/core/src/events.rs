//! Page Events
//!
//! The event channel between the page and the controller's behaviors.
//! Listeners are registered per node and event kind and fire synchronously,
//! in registration order, on whichever task dispatches the event.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dom::{NodeId, PageHandle};

/// Kinds of user interaction the controller reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Primary button click / tap
    Click,
    /// Pointer entered the element
    PointerEnter,
    /// Pointer left the element
    PointerLeave,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Click => write!(f, "click"),
            Self::PointerEnter => write!(f, "mouseenter"),
            Self::PointerLeave => write!(f, "mouseleave"),
        }
    }
}

/// A registered event handler
///
/// Receives the page (unlocked) and the node the event was fired at.
pub type Listener = Arc<dyn Fn(&PageHandle, NodeId) + Send + Sync>;

/// Wrap a closure as a [`Listener`]
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&PageHandle, NodeId) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Listeners in registration order
#[derive(Default)]
pub struct ListenerRegistry {
    entries: Vec<(NodeId, EventKind, Listener)>,
}

impl ListenerRegistry {
    /// Append a listener
    pub fn add(&mut self, node: NodeId, kind: EventKind, listener: Listener) {
        self.entries.push((node, kind, listener));
    }

    /// Listeners for a node and kind, in registration order
    #[must_use]
    pub fn matching(&self, node: NodeId, kind: EventKind) -> Vec<Listener> {
        self.entries
            .iter()
            .filter(|(n, k, _)| *n == node && *k == kind)
            .map(|(_, _, l)| Arc::clone(l))
            .collect()
    }

    /// Drop every listener attached to `nodes`
    pub fn remove_nodes(&mut self, nodes: &[NodeId]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(n, _, _)| !nodes.contains(n));
        before - self.entries.len()
    }

    /// Total registered listeners
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

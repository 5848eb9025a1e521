//! Document-Ready Gate
//!
//! Two states: awaiting the ready signal (continuations queue up) or ready
//! (continuations run on registration). The transition happens once and each
//! continuation fires exactly once.

use crate::dom::{PageHandle, ReadyState};

/// Deferred DOM-dependent setup
pub type Continuation = Box<dyn FnOnce(&PageHandle) + Send>;

/// Wrap a closure as a [`Continuation`]
pub fn continuation<F>(f: F) -> Continuation
where
    F: FnOnce(&PageHandle) + Send + 'static,
{
    Box::new(f)
}

/// The gate itself
pub enum ReadyGate {
    /// Document still loading; continuations wait here in registration order
    AwaitingReady(Vec<Continuation>),
    /// Document ready; nothing is ever queued again
    Ready,
}

impl ReadyGate {
    /// Build the gate matching the document's state
    #[must_use]
    pub fn new(state: ReadyState) -> Self {
        if state.is_loading() {
            Self::AwaitingReady(Vec::new())
        } else {
            Self::Ready
        }
    }

    /// Whether the ready signal has been seen
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Number of continuations waiting
    #[must_use]
    pub fn pending(&self) -> usize {
        match self {
            Self::AwaitingReady(queued) => queued.len(),
            Self::Ready => 0,
        }
    }

    /// Queue a continuation, or hand it back to run now if already ready
    pub fn register(&mut self, continuation: Continuation) -> Option<Continuation> {
        match self {
            Self::AwaitingReady(queued) => {
                queued.push(continuation);
                None
            }
            Self::Ready => Some(continuation),
        }
    }

    /// Transition to ready, returning the queued continuations
    pub fn open(&mut self) -> Vec<Continuation> {
        match std::mem::replace(self, Self::Ready) {
            Self::AwaitingReady(queued) => queued,
            Self::Ready => Vec::new(),
        }
    }
}

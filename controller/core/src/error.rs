//! Controller Errors

use thiserror::Error;

/// Errors surfaced by the boot sequence
///
/// Feature-level failures (a text-processing request, a missing element)
/// never reach this type; they are handled inside the feature.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The resource loader failed; boot stops and `initialized` stays false
    #[error("Resource loading failed: {0}")]
    ResourceLoad(String),

    /// The boot task panicked or was aborted
    #[error("Boot task did not complete: {0}")]
    BootTask(String),

    /// The boot result was already taken by an earlier caller
    #[error("Boot result already consumed")]
    BootAlreadyAwaited,
}

impl From<tokio::task::JoinError> for ControllerError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::BootTask(err.to_string())
    }
}

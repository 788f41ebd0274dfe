//! Queue Error Types

use crate::core::error_handling::ContextualError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// Shutdown has been signalled; the expected termination path for workers
    #[error("Queue operation cancelled by shutdown")]
    Cancelled,

    #[error("Invalid queue capacity {capacity} (must be between 1 and {max})")]
    InvalidCapacity { capacity: usize, max: usize },

    #[error("Queue synchronisation failed: {message}")]
    Synchronisation { message: String },
}

impl QueueError {
    /// Returns `true` if this error is the `Cancelled` variant.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, QueueError::Cancelled)
    }
}

impl ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, QueueError::InvalidCapacity { .. })
    }

    fn user_message(&self) -> Option<String> {
        self.is_user_actionable().then(|| self.to_string())
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Error returned by [`PriorityQueue::insert`](crate::queue::PriorityQueue::insert).
///
/// Carries the item back to the caller so that a failed insert never loses it.
pub struct Rejected<T> {
    item: T,
    reason: QueueError,
}

impl<T> Rejected<T> {
    pub(crate) fn new(item: T, reason: QueueError) -> Self {
        Self { item, reason }
    }

    /// Why the item was not accepted
    pub fn reason(&self) -> &QueueError {
        &self.reason
    }

    /// Returns `true` if the insert failed because of shutdown
    pub fn is_cancelled(&self) -> bool {
        self.reason.is_cancelled()
    }

    /// Returns the item that could not be inserted.
    pub fn into_inner(self) -> T {
        self.item
    }

    /// Splits the error into the returned item and the reason.
    pub fn into_parts(self) -> (T, QueueError) {
        (self.item, self.reason)
    }
}

impl<T> fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item rejected: {}", self.reason)
    }
}

impl<T> std::error::Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}

impl<T> From<Rejected<T>> for QueueError {
    fn from(rejected: Rejected<T>) -> Self {
        rejected.reason
    }
}

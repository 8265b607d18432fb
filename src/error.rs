//! Error types for the player core

use thiserror::Error;

/// Player errors
///
/// Transport commands are deliberately infallible (safe no-ops without an
/// active adapter); errors are reserved for operations with a real failure
/// mode, such as queue navigation and index-based edits.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Queue has no entry to navigate to
    #[error("Queue is empty")]
    QueueEmpty,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;

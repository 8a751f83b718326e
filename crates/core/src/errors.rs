//! Core error types for BlockBar.
//!
//! Upstream failures never surface here: they degrade to missing snapshot
//! fields inside `blockbar-chain-data`, and a failed refresh cycle is
//! reported through the store's error message. What remains are failures of
//! the store handle itself.

use thiserror::Error;

/// Type alias for Result using our error type.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store was shut down; its coordinator no longer accepts commands.
    #[error("Block store is shut down")]
    Closed,

    #[error("Invalid refresh interval: {0}")]
    InvalidInterval(String),
}

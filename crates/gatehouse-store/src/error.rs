//! Store error type.

use thiserror::Error;

/// Failure reported by a store backend.
///
/// The in-memory backend never fails; SQL and networked drivers surface
/// their transport errors here.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

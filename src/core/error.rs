//! Error types for the loctree engine

use thiserror::Error;

/// Main error type for the crate.
///
/// Engine operations are infallible by contract; errors only arise at the
/// transport boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

//! Error taxonomy shared by the core and the gateway.
//!
//! Three classes matter at the HTTP boundary: `Validation` maps to 400
//! (user-correctable, never retried), `Transport` and `RemoteModel` map to
//! 500 with the underlying detail, and `Internal` is the catch-all.

use thiserror::Error;

/// Errors produced by the Recap core. Display text is what the gateway
/// puts in the JSON `error` / `details` fields, so keep it user-facing.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Bad input from the client (empty transcript, oversized file, missing
    /// recipients). Maps to 400.
    #[error("{0}")]
    Validation(String),

    /// The outbound mail transport failed. Carries the transport's own
    /// detail string; no retry. Maps to 500.
    #[error("{0}")]
    Transport(String),

    /// The remote summarization endpoint failed or is not configured.
    /// Maps to 500.
    #[error("{0}")]
    RemoteModel(String),

    /// Anything unclassified. Maps to 500 with a generic message.
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// True when the error is user-correctable (a 400 at the gateway).
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

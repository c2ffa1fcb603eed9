//! Error types for the ingestion layer.
//!
//! Two failure families exist and neither is fatal to the process:
//!
//! - **Transport errors**: connection refused, reset, or unreachable.
//!   Always recovered via the fixed-delay reconnect, never surfaced as
//!   fatal. The only externally visible signal is the connection phase.
//! - **Decode errors**: malformed or incomplete payloads. Recovered by
//!   dropping the single message, leaving published state untouched.
//!
//! The ingestion layer is designed to run unattended indefinitely, trading
//! silent message loss and unbounded retry for availability.

use thiserror::Error;

use crate::decode::DecodeError;

/// Result type alias for ingestion operations.
pub type Result<T, E = IngestError> = std::result::Result<T, E>;

/// Main error type for ingestion operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IngestError {
    #[error("transport failure: {reason}")]
    Transport {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl IngestError {
    /// Returns whether this error is recovered by retrying.
    ///
    /// Transport failures are always retried; decode failures never are,
    /// the offending message is simply dropped.
    pub fn is_retryable(&self) -> bool {
        match self {
            IngestError::Transport { .. } => true,
            IngestError::Decode(_) => false,
        }
    }

    /// Helper constructor for transport errors without an underlying cause.
    pub fn transport(reason: impl Into<String>) -> Self {
        IngestError::Transport { reason: reason.into(), source: None }
    }

    /// Helper constructor for transport errors wrapping an underlying cause.
    pub fn transport_with_source(
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        IngestError::Transport { reason: reason.into(), source: Some(Box::new(source)) }
    }
}

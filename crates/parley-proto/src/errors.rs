//! Protocol errors.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding an [`crate::Envelope`].
///
/// Decode failures are split by how far parsing got, so callers can tell a
/// payload that was never JSON from one that carries a tag we do not speak.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Payload is not valid JSON.
    #[error("malformed payload: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Payload is JSON but its `type` is missing, not a string, or unknown.
    #[error("unrecognized envelope type: {0:?}")]
    UnknownType(Option<String>),

    /// `type` is recognized but the remaining fields do not fit it.
    #[error("invalid {tag} payload: {source}")]
    InvalidPayload {
        /// Envelope tag that was being decoded.
        tag: String,
        /// Underlying field error.
        #[source]
        source: serde_json::Error,
    },

    /// Reaction value outside the supported set.
    #[error("unknown reaction: {0:?}")]
    UnknownReaction(String),

    /// Envelope could not be serialized.
    #[error("failed to encode envelope: {0}")]
    Encode(#[source] serde_json::Error),
}

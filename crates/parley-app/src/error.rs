//! Session errors.

use parley_proto::ProtocolError;
use thiserror::Error;

/// Errors inside the session controller.
///
/// None of these are fatal. The controller logs them and degrades to doing
/// nothing, so they never reach the user.
#[derive(Debug, Error)]
pub enum AppError {
    /// Outbound envelope could not be encoded.
    #[error("failed to encode outbound {tag}: {source}")]
    Encode {
        /// Tag of the envelope being sent.
        tag: &'static str,
        /// Underlying protocol error.
        #[source]
        source: ProtocolError,
    },
}

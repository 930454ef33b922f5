//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the session runtime from a specific
//! transport and view. Each host implements it to provide platform-specific
//! I/O, while the generic [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use crate::{App, AppEvent};

/// Abstracts the transport and view for the session runtime.
///
/// This is the transport adapter surface the controller consumes: a stream of
/// inbound events (status changes and raw payloads, interleaved with user
/// input) and a best-effort send. The connection lifecycle itself, including
/// reconnects and framing, stays behind this trait.
///
/// # Implementations
///
/// - **CLI**: stdin lines for input, in-process server for transport
/// - **Simulation**: scripted events and captured payloads
/// - **Web**: could bridge browser events and a WebSocket
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next event.
    ///
    /// Returns `None` when the host is shutting down.
    fn next_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Hand an encoded payload to the transport.
    ///
    /// Best-effort. Implementations may drop the payload when the channel is
    /// not ready; the runtime never retries.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload could not be handed off.
    fn send(&mut self, payload: String) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Render the session state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Bring the newest message into view.
    ///
    /// # Errors
    ///
    /// Returns an error if the view cannot be updated.
    fn scroll_to_latest(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Release transport listeners and other held resources.
    fn stop(&mut self);
}

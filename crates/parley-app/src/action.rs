//! Session side-effects.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Redraw from current state.
    Render,

    /// Log grew; bring the newest message into view.
    ScrollToLatest,

    /// Hand an encoded payload to the transport. Best-effort.
    Send {
        /// Encoded envelope.
        payload: String,
    },

    /// End the session.
    Quit,
}

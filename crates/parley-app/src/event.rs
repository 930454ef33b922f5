//! Session input events.
//!
//! This module defines [`AppEvent`], the complete set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - The transport: status changes and inbound payloads.
//! - The user: name and draft edits, submits, and quick actions.
//!
//! The host loop delivers them one at a time, in whatever interleaving they
//! occurred.

use parley_proto::Reaction;

use crate::ConnectionStatus;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Transport reported a new connection status.
    StatusChanged(ConnectionStatus),

    /// Transport delivered a raw payload.
    PayloadReceived(String),

    /// Name field edited.
    NameChanged(String),

    /// Join form submitted.
    JoinSubmitted,

    /// Draft field edited.
    DraftChanged(String),

    /// Draft submitted.
    DraftSubmitted,

    /// Emoji from the palette picked.
    EmojiPicked(String),

    /// Reaction button pressed.
    ReactionPicked(Reaction),

    /// User asked to leave the session.
    Quit,
}

//! The `{type, ...fields}` envelope.
//!
//! # Invariants
//!
//! The tag set is closed. Adding a variant forces every exhaustive `match` on
//! [`Envelope`] to handle it, including the decode fallback in the session
//! controller, so a new tag can never be silently dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ProtocolError, Reaction, Result};

/// A single event on the chat channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// Announce a participant. Sent once, on join.
    Join {
        /// Display name being joined under.
        name: String,
    },

    /// Free-text chat line. The server echoes it to every participant,
    /// including the sender.
    Message {
        /// Display name of the author.
        name: String,
        /// Message body.
        text: String,
    },

    /// Quick-action reaction.
    Reaction {
        /// Display name of the reacting participant.
        name: String,
        /// Which reaction was sent.
        reaction: Reaction,
    },

    /// Server-originated notice.
    System {
        /// Notice body.
        text: String,
    },
}

impl Envelope {
    /// Wire tags understood by [`Envelope::decode`].
    pub const TAGS: [&'static str; 4] = ["join", "message", "reaction", "system"];

    /// Build a `join` envelope.
    pub fn join(name: impl Into<String>) -> Self {
        Self::Join { name: name.into() }
    }

    /// Build a `message` envelope.
    pub fn message(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Message { name: name.into(), text: text.into() }
    }

    /// Build a `reaction` envelope.
    pub fn reaction(name: impl Into<String>, reaction: Reaction) -> Self {
        Self::Reaction { name: name.into(), reaction }
    }

    /// Build a `system` envelope.
    pub fn system(text: impl Into<String>) -> Self {
        Self::System { text: text.into() }
    }

    /// Wire tag of this envelope.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Message { .. } => "message",
            Self::Reaction { .. } => "reaction",
            Self::System { .. } => "system",
        }
    }

    /// Display name of the participant that produced this envelope.
    ///
    /// `None` for server notices.
    pub fn sender(&self) -> Option<&str> {
        match self {
            Self::Join { name } | Self::Message { name, .. } | Self::Reaction { name, .. } => {
                Some(name)
            },
            Self::System { .. } => None,
        }
    }

    /// Serialize to compact JSON with `type` as the first key.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// Parse a raw payload.
    ///
    /// Unknown extra fields are ignored so newer peers can add fields without
    /// breaking older clients.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::Malformed`] if `raw` is not JSON.
    /// - [`ProtocolError::UnknownType`] if the `type` field is missing, not a
    ///   string, or not one of [`Envelope::TAGS`].
    /// - [`ProtocolError::InvalidPayload`] if the tag is known but a field is
    ///   missing, mistyped, or (for reactions) outside the supported set.
    pub fn decode(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).map_err(ProtocolError::Malformed)?;

        let tag = match value.get("type") {
            Some(Value::String(tag)) => tag.clone(),
            Some(other) => return Err(ProtocolError::UnknownType(Some(other.to_string()))),
            None => return Err(ProtocolError::UnknownType(None)),
        };

        if !Self::TAGS.contains(&tag.as_str()) {
            return Err(ProtocolError::UnknownType(Some(tag)));
        }

        serde_json::from_value(value)
            .map_err(|source| ProtocolError::InvalidPayload { tag, source })
    }
}

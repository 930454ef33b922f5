//! Inbound payload decoding.
//!
//! Turns one raw payload into exactly one [`NewMessage`]. Nothing here fails:
//! a payload we cannot use degrades to a system message that shows it
//! verbatim, so the user still sees that something arrived.

use parley_proto::Envelope;

use crate::NewMessage;

/// Outcome of decoding one inbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A recognized inbound envelope.
    Envelope(NewMessage),
    /// Unusable payload, shown verbatim as a system message.
    Fallback {
        /// System message carrying the raw payload.
        message: NewMessage,
        /// Why the payload could not be used.
        reason: String,
    },
}

impl Decoded {
    /// Message to append.
    pub fn message(&self) -> &NewMessage {
        match self {
            Self::Envelope(message) | Self::Fallback { message, .. } => message,
        }
    }

    /// Consume into the message to append.
    pub fn into_message(self) -> NewMessage {
        match self {
            Self::Envelope(message) | Self::Fallback { message, .. } => message,
        }
    }

    /// Whether the payload fell back to a raw system message.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Decode a raw inbound payload.
///
/// `chosen_name` is the local participant's name at append time (see
/// [`crate::App::chosen_name`]), or `None` while there is none. A message is
/// attributed to self only when its sender equals `chosen_name` exactly.
///
/// Pure: the result depends only on the two arguments.
pub fn decode_inbound(raw: &str, chosen_name: Option<&str>) -> Decoded {
    let envelope = match Envelope::decode(raw) {
        Ok(envelope) => envelope,
        Err(err) => return fallback(raw, err.to_string()),
    };

    let is_self = |name: &str| chosen_name == Some(name);

    match envelope {
        Envelope::System { text } => Decoded::Envelope(NewMessage::system(text)),
        Envelope::Message { name, text } => {
            let own = is_self(&name);
            Decoded::Envelope(NewMessage::message(name, text, own))
        },
        Envelope::Reaction { name, reaction } => {
            let own = is_self(&name);
            Decoded::Envelope(NewMessage::reaction(name, reaction, own))
        },
        // Recognized tag travelling the wrong way.
        Envelope::Join { .. } => fallback(raw, "join is outbound only".to_owned()),
    }
}

fn fallback(raw: &str, reason: String) -> Decoded {
    Decoded::Fallback { message: NewMessage::system(raw), reason }
}

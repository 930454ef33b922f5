//! Observable session state.
//!
//! This module defines the data the [`crate::App`] exposes for rendering: the
//! transport's [`ConnectionStatus`] and the append-only [`MessageLog`] of
//! [`ChatMessage`]s.
//!
//! # Invariants
//!
//! - A message carries a reaction if and only if its kind is a reaction. This
//!   holds by construction because the reaction lives inside
//!   [`MessageKind::Reaction`].
//! - A message has no sender if and only if it is a system message. Enforced
//!   by [`NewMessage`]'s constructors, which are the only way in.
//! - Once appended, a message is never mutated or removed. [`MessageLog`]
//!   hands out shared references only.

use parley_proto::Reaction;

/// Transport connection status, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStatus {
    /// Connection attempt in progress.
    Connecting,
    /// Channel is open and accepting sends.
    Open,
    /// Channel is closed.
    Closed,
    /// Status not reported or not recognized.
    #[default]
    Unknown,
}

impl ConnectionStatus {
    /// Map a transport-specific status label onto a status.
    ///
    /// Total: anything unrecognized becomes [`ConnectionStatus::Unknown`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "connecting" => Self::Connecting,
            "open" => Self::Open,
            "closed" => Self::Closed,
            _ => Self::Unknown,
        }
    }

    /// Human-readable status label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Connected",
            Self::Connecting => "Connecting...",
            Self::Closed => "Disconnected",
            Self::Unknown => "Unavailable",
        }
    }

    /// Whether the channel currently accepts sends.
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

/// Session-unique message identifier. Strictly increasing in append order.
pub type MessageId = u64;

/// What a log entry is, which drives how it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Server notice or a payload we could not interpret.
    System,
    /// Free-text chat line.
    Message,
    /// Quick-action reaction.
    Reaction(Reaction),
}

/// A message that has been decoded or produced locally but not yet appended.
///
/// The id is assigned by [`MessageLog::append`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    kind: MessageKind,
    text: String,
    from: Option<String>,
    is_self: bool,
}

impl NewMessage {
    /// Server notice. Never attributed to anyone, never self.
    pub fn system(text: impl Into<String>) -> Self {
        Self { kind: MessageKind::System, text: text.into(), from: None, is_self: false }
    }

    /// Chat line from `from`.
    pub fn message(from: impl Into<String>, text: impl Into<String>, is_self: bool) -> Self {
        Self { kind: MessageKind::Message, text: text.into(), from: Some(from.into()), is_self }
    }

    /// Reaction from `from`, with the plain-text fallback for renderers that do
    /// not understand reactions.
    pub fn reaction(from: impl Into<String>, reaction: Reaction, is_self: bool) -> Self {
        let from = from.into();
        let text = format!("{from} reacted with {reaction}");
        Self { kind: MessageKind::Reaction(reaction), text, from: Some(from), is_self }
    }

    /// Kind of the pending message.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Text of the pending message.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sender of the pending message.
    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    /// Whether the pending message is attributed to the local participant.
    pub fn is_self(&self) -> bool {
        self.is_self
    }
}

/// An entry in the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    id: MessageId,
    kind: MessageKind,
    text: String,
    from: Option<String>,
    is_self: bool,
}

impl ChatMessage {
    /// Session-unique id.
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Message kind.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Payload text for system and chat messages, descriptive fallback for
    /// reactions.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sender display name. `None` for system messages.
    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    /// Whether the sender was the local participant at append time.
    pub fn is_self(&self) -> bool {
        self.is_self
    }

    /// Reaction carried by this message. `None` unless the kind is a reaction.
    pub fn reaction(&self) -> Option<Reaction> {
        match self.kind {
            MessageKind::Reaction(reaction) => Some(reaction),
            MessageKind::System | MessageKind::Message => None,
        }
    }

    /// Text for a reaction-aware renderer.
    ///
    /// Own reactions read "You reacted with ...", everyone else's name the
    /// sender. Other kinds render their text unchanged.
    pub fn display_text(&self) -> String {
        match (self.kind, self.from.as_deref()) {
            (MessageKind::Reaction(reaction), _) if self.is_self => {
                format!("You reacted with {reaction}")
            },
            (MessageKind::Reaction(reaction), Some(from)) => format!("{from} reacted with {reaction}"),
            _ => self.text.clone(),
        }
    }
}

/// Append-only, ordered session log.
///
/// Single owner, single writer. Ids come from a counter so they stay unique
/// even when many messages land within the same clock tick.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
    next_id: MessageId,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its assigned id.
    pub fn append(&mut self, message: NewMessage) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;

        let NewMessage { kind, text, from, is_self } = message;
        self.messages.push(ChatMessage { id, kind, text, from, is_self });
        id
    }

    /// Messages in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }

    /// Messages as a slice, in append order.
    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recently appended message.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Look up a message by id.
    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        // Ids are dense and start at zero, so the id is the index.
        usize::try_from(id).ok().and_then(|idx| self.messages.get(idx))
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_labels_map_to_unknown() {
        assert_eq!(ConnectionStatus::from_label("open"), ConnectionStatus::Open);
        assert_eq!(ConnectionStatus::from_label(" CLOSED "), ConnectionStatus::Closed);
        assert_eq!(ConnectionStatus::from_label("reconnecting"), ConnectionStatus::Unknown);
        assert_eq!(ConnectionStatus::from_label(""), ConnectionStatus::Unknown);
        assert_eq!(ConnectionStatus::from_label("weird").label(), "Unavailable");
    }

    #[test]
    fn append_assigns_increasing_ids() {
        let mut log = MessageLog::new();
        let a = log.append(NewMessage::system("one"));
        let b = log.append(NewMessage::system("one"));

        assert!(b > a);
        assert_eq!(log.len(), 2);
        assert_eq!(log.get(b).map(ChatMessage::text), Some("one"));
        assert_eq!(log.last().map(ChatMessage::id), Some(b));
    }

    #[test]
    fn reaction_carries_fallback_text() {
        let mut log = MessageLog::new();
        log.append(NewMessage::reaction("Ana", Reaction::Up, false));

        let msg = log.last().unwrap();
        assert_eq!(msg.text(), "Ana reacted with 👍");
        assert_eq!(msg.reaction(), Some(Reaction::Up));
        assert_eq!(msg.display_text(), "Ana reacted with 👍");
    }

    #[test]
    fn own_reaction_displays_second_person() {
        let mut log = MessageLog::new();
        log.append(NewMessage::reaction("Ana", Reaction::Down, true));

        assert_eq!(log.last().unwrap().display_text(), "You reacted with 👎");
    }

    #[test]
    fn system_has_no_sender_or_reaction() {
        let mut log = MessageLog::new();
        log.append(NewMessage::system("welcome"));

        let msg = log.last().unwrap();
        assert_eq!(msg.from(), None);
        assert_eq!(msg.reaction(), None);
        assert!(!msg.is_self());
        assert_eq!(msg.display_text(), "welcome");
    }
}

//! Chat session state machine.
//!
//! This module defines the [`App`] state machine, which owns the local view of
//! a single conversation completely decoupled from the transport.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Tracks identity: the name being typed, and the name committed on join.
//! - Decodes inbound payloads and appends them to the [`MessageLog`].
//! - Encodes user intents (join, text, emoji, reactions) as outbound payloads.
//! - Derives the flags a view needs to enable or disable its controls.
//!
//! # Echo asymmetry
//!
//! Text messages are NOT appended on send. They appear once the server echoes
//! them back to every participant. Reactions ARE appended immediately
//! (optimistic echo) and the server may echo them back as well, in which case
//! the log shows both. No correlation id exists to suppress the echo, so
//! nothing is deduplicated.

use parley_proto::{Envelope, Reaction};

use crate::{
    AppAction, AppConfig, AppError, AppEvent, ConnectionStatus, MessageLog, NewMessage,
    decode::{Decoded, decode_inbound},
};

/// Chat session state machine.
///
/// One instance per session. Dropping it discards the log; nothing persists.
#[derive(Debug, Clone)]
pub struct App {
    /// Static configuration.
    config: AppConfig,
    /// Last status reported by the transport.
    status: ConnectionStatus,
    /// Name field contents. Editable until join.
    name_input: String,
    /// Committed display name. `Some` exactly when joined, never changes after.
    identity: Option<String>,
    /// Draft field contents.
    draft: String,
    /// Append-only conversation log.
    log: MessageLog,
}

impl App {
    /// Create a fresh, not-joined session with an empty log.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            status: ConnectionStatus::Unknown,
            name_input: String::new(),
            identity: None,
            draft: String::new(),
            log: MessageLog::new(),
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::StatusChanged(status) => self.set_status(status),
            AppEvent::PayloadReceived(raw) => self.receive(&raw),
            AppEvent::NameChanged(name) => self.set_name(name),
            AppEvent::JoinSubmitted => self.join(),
            AppEvent::DraftChanged(draft) => {
                self.draft = draft;
                vec![AppAction::Render]
            },
            AppEvent::DraftSubmitted => self.submit_draft(),
            AppEvent::EmojiPicked(emoji) => self.send_emoji(&emoji),
            AppEvent::ReactionPicked(reaction) => self.send_reaction(reaction),
            AppEvent::Quit => vec![AppAction::Quit],
        }
    }

    /// Record a status reported by the transport.
    pub fn set_status(&mut self, status: ConnectionStatus) -> Vec<AppAction> {
        if self.status == status {
            return vec![];
        }
        tracing::debug!(from = ?self.status, to = ?status, "connection status changed");
        self.status = status;
        vec![AppAction::Render]
    }

    /// Edit the name field. Ignored once joined, since identity is fixed.
    pub fn set_name(&mut self, name: impl Into<String>) -> Vec<AppAction> {
        if self.is_joined() {
            return vec![];
        }
        self.name_input = name.into();
        vec![AppAction::Render]
    }

    /// Join under the trimmed contents of the name field.
    ///
    /// No-op if the trimmed name is empty or the session already joined. The
    /// transition completes locally whatever the connection status is; the
    /// `join` envelope is best-effort.
    pub fn join(&mut self) -> Vec<AppAction> {
        if !self.can_join() {
            return vec![];
        }

        let name = self.name_input.trim().to_owned();
        tracing::info!(%name, "joined chat");

        let mut actions: Vec<_> = encode(&Envelope::join(name.as_str())).into_iter().collect();
        self.identity = Some(name);
        actions.push(AppAction::Render);
        actions
    }

    /// Send free text as a chat message.
    ///
    /// The text is trimmed; blank text, or a session that cannot send (see
    /// [`App::accepts_outbound`]), makes this a no-op. The message is not
    /// added to the log here. It shows up when the server echoes it.
    pub fn send_text(&mut self, text: &str) -> Vec<AppAction> {
        let text = text.trim();
        if text.is_empty() {
            return vec![];
        }
        let Some(name) = self.outbound_identity() else {
            return vec![];
        };

        encode(&Envelope::message(name, text)).into_iter().collect()
    }

    /// Send the draft and clear it if anything went out.
    pub fn submit_draft(&mut self) -> Vec<AppAction> {
        let draft = std::mem::take(&mut self.draft);
        let mut actions = self.send_text(&draft);

        if actions.is_empty() {
            self.draft = draft;
        } else {
            actions.push(AppAction::Render);
        }
        actions
    }

    /// Send an emoji. Same path as [`App::send_text`]; the draft is left alone.
    pub fn send_emoji(&mut self, emoji: &str) -> Vec<AppAction> {
        self.send_text(emoji)
    }

    /// Send a reaction and append it locally right away.
    ///
    /// No-op unless joined with the channel open. The local copy is appended
    /// before any echo can arrive, whether or not the transport delivers.
    pub fn send_reaction(&mut self, reaction: Reaction) -> Vec<AppAction> {
        let Some(name) = self.outbound_identity().map(str::to_owned) else {
            return vec![];
        };

        let mut actions: Vec<_> =
            encode(&Envelope::reaction(name.as_str(), reaction)).into_iter().collect();
        self.log.append(NewMessage::reaction(name, reaction, true));
        actions.extend([AppAction::ScrollToLatest, AppAction::Render]);
        actions
    }

    /// Decode an inbound payload and append the result.
    ///
    /// Every payload appends exactly one message. Delivering the same payload
    /// twice appends twice.
    pub fn receive(&mut self, raw: &str) -> Vec<AppAction> {
        let decoded = decode_inbound(raw, self.chosen_name());
        match &decoded {
            Decoded::Envelope(message) => {
                tracing::debug!(kind = ?message.kind(), from = ?message.from(), "payload received");
            },
            Decoded::Fallback { reason, .. } => {
                tracing::warn!(%reason, "unusable payload, showing raw");
            },
        }

        self.log.append(decoded.into_message());
        vec![AppAction::ScrollToLatest, AppAction::Render]
    }

    /// Whether outbound chat traffic is allowed: joined and the channel open.
    ///
    /// Single authority for both the view's enabled state and the send guards.
    pub fn accepts_outbound(&self) -> bool {
        self.is_joined() && self.status.is_open()
    }

    /// Whether reaction and emoji buttons should be enabled.
    pub fn can_send_quick_action(&self) -> bool {
        self.accepts_outbound()
    }

    /// Whether the text submit button should be enabled.
    pub fn can_send_typed(&self) -> bool {
        self.accepts_outbound() && !self.draft.trim().is_empty()
    }

    /// Whether the join form would succeed if submitted now.
    pub fn can_join(&self) -> bool {
        !self.is_joined() && !self.name_input.trim().is_empty()
    }

    /// Whether the session has joined.
    pub fn is_joined(&self) -> bool {
        self.identity.is_some()
    }

    /// Committed display name. `None` before join.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Name inbound messages are compared against for self-attribution.
    ///
    /// The committed identity once joined. Before that, the trimmed name
    /// field, so a participant typing their name already sees their own
    /// messages as self. `None` while the field is blank.
    pub fn chosen_name(&self) -> Option<&str> {
        match self.identity() {
            Some(identity) => Some(identity),
            None => Some(self.name_input.trim()).filter(|name| !name.is_empty()),
        }
    }

    /// Current contents of the name field.
    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    /// Current contents of the draft field.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Last connection status reported by the transport.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Display label for the connection status.
    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }

    /// Conversation log.
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Session configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Emoji offered as quick sends.
    pub fn emoji_palette(&self) -> &[String] {
        &self.config.emoji_palette
    }

    fn outbound_identity(&self) -> Option<&str> {
        if self.accepts_outbound() { self.identity() } else { None }
    }
}

/// Encode an outbound envelope into a send action, logging on failure.
fn encode(envelope: &Envelope) -> Option<AppAction> {
    match envelope.encode() {
        Ok(payload) => Some(AppAction::Send { payload }),
        Err(source) => {
            let err = AppError::Encode { tag: envelope.tag(), source };
            tracing::warn!(%err, "dropping outbound envelope");
            None
        },
    }
}

//! Input line parsing.
//!
//! Lines starting with `/` are commands; anything else is chat text. Parsing
//! is pure so it can be tested without a terminal.

use parley_app::{AppEvent, Reaction};
use thiserror::Error;

/// Help text printed for unusable input.
pub const USAGE: &str = "commands: /name <NAME>, /join, /react up|down, /emoji <N>, /quit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the typed display name.
    Name(String),
    /// Commit the typed name and join.
    Join,
    /// Send a reaction.
    React(Reaction),
    /// Send the palette emoji at this 1-based position.
    Emoji(usize),
    /// End the session.
    Quit,
    /// Type and submit a chat message.
    Say(String),
}

/// Input the client cannot act on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Unknown slash command.
    #[error("unknown command: /{0}")]
    Unknown(String),

    /// Known command with missing or unusable arguments.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Palette position outside the configured palette.
    #[error("no emoji at position {index}, palette has {len}")]
    EmojiOutOfRange {
        /// Requested 1-based position.
        index: usize,
        /// Palette size.
        len: usize,
    },
}

impl Command {
    /// Parse one input line.
    ///
    /// Blank lines parse as an empty [`Command::Say`], which the session
    /// ignores.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let Some(cmd) = line.trim_start().strip_prefix('/') else {
            return Ok(Self::Say(line.to_owned()));
        };

        let (command, rest) = cmd.split_once(char::is_whitespace).unwrap_or((cmd, ""));
        let rest = rest.trim();

        match command {
            "name" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("/name <NAME>"));
                }
                Ok(Self::Name(rest.to_owned()))
            },
            "join" => Ok(Self::Join),
            "react" => rest.parse().map(Self::React).map_err(|_| CommandError::Usage("/react up|down")),
            "emoji" => rest.parse().map(Self::Emoji).map_err(|_| CommandError::Usage("/emoji <N>")),
            "quit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_owned())),
        }
    }

    /// Translate into session events.
    ///
    /// `palette` resolves [`Command::Emoji`] positions.
    pub fn into_events(self, palette: &[String]) -> Result<Vec<AppEvent>, CommandError> {
        let events = match self {
            Self::Name(name) => vec![AppEvent::NameChanged(name)],
            Self::Join => vec![AppEvent::JoinSubmitted],
            Self::React(reaction) => vec![AppEvent::ReactionPicked(reaction)],
            Self::Emoji(index) => {
                let emoji = index
                    .checked_sub(1)
                    .and_then(|i| palette.get(i))
                    .ok_or(CommandError::EmojiOutOfRange { index, len: palette.len() })?;
                vec![AppEvent::EmojiPicked(emoji.clone())]
            },
            Self::Quit => vec![AppEvent::Quit],
            Self::Say(text) => vec![AppEvent::DraftChanged(text), AppEvent::DraftSubmitted],
        };
        Ok(events)
    }
}

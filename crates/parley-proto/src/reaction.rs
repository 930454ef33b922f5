//! Quick-action reactions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// One of the two fixed reaction signals.
///
/// Serialized as the emoji itself, which is what travels in the `reaction`
/// field of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reaction {
    /// Thumbs up.
    #[serde(rename = "👍")]
    Up,
    /// Thumbs down.
    #[serde(rename = "👎")]
    Down,
}

impl Reaction {
    /// Every supported reaction, in display order.
    pub const ALL: [Reaction; 2] = [Reaction::Up, Reaction::Down];

    /// Wire and display form.
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Up => "👍",
            Self::Down => "👎",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

/// Accepts the emoji as well as the `up` / `down` aliases typed by humans.
impl FromStr for Reaction {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "👍" | "up" => Ok(Self::Up),
            "👎" | "down" => Ok(Self::Down),
            other => Err(ProtocolError::UnknownReaction(other.to_owned())),
        }
    }
}

//! Session configuration.

use serde::Deserialize;

/// Default chat endpoint, shown in the status line.
pub const DEFAULT_SERVER_ADDR: &str = "ws://localhost:8081";

/// Default emoji palette offered as quick sends.
pub const DEFAULT_EMOJI_PALETTE: [&str; 8] = ["🔥", "👍", "👎", "❤️", "🗿", "💣", "✅", "👀"];

/// Configuration for an [`crate::App`].
///
/// Deserializable so hosts can load it from whatever config source they use;
/// every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Chat endpoint the transport connects to.
    pub server_addr: String,
    /// Emoji offered as one-tap sends. Any text works; these are shortcuts.
    pub emoji_palette: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_owned(),
            emoji_palette: DEFAULT_EMOJI_PALETTE.iter().map(|&e| e.to_owned()).collect(),
        }
    }
}

impl AppConfig {
    /// Default configuration pointed at `server_addr`.
    pub fn with_server(server_addr: impl Into<String>) -> Self {
        Self { server_addr: server_addr.into(), ..Self::default() }
    }
}

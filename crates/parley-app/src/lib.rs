//! Session layer for Parley
//!
//! Pure chat session state machine and a generic runtime around it, so the
//! same code runs in a real host and in deterministic simulation.
//!
//! # Components
//!
//! - [`App`]: session state machine (identity, message log, send guards)
//! - [`decode_inbound`]: pure inbound payload decoder
//! - [`MessageLog`]: append-only conversation log
//! - [`Driver`]: trait for platform-specific transport and view
//! - [`Runtime`]: generic event loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod config;
mod decode;
mod driver;
mod error;
mod event;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use config::{AppConfig, DEFAULT_EMOJI_PALETTE, DEFAULT_SERVER_ADDR};
pub use decode::{Decoded, decode_inbound};
pub use driver::Driver;
pub use error::AppError;
pub use event::AppEvent;
pub use parley_proto::Reaction;
pub use runtime::Runtime;
pub use state::{ChatMessage, ConnectionStatus, MessageId, MessageKind, MessageLog, NewMessage};

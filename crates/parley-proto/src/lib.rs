//! Parley wire protocol.
//!
//! Every event on the chat channel is a single JSON object carrying a `type`
//! discriminator next to its fields. Inbound and outbound traffic share one
//! envelope shape:
//!
//! | type       | direction | fields            |
//! |------------|-----------|-------------------|
//! | `join`     | out       | `name`            |
//! | `message`  | out / in  | `name`, `text`    |
//! | `reaction` | out / in  | `name`, `reaction`|
//! | `system`   | in        | `text`            |
//!
//! This crate only knows the syntax. Which direction a tag may travel, and how
//! an unusable payload degrades, is decided by the session controller.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod envelope;
pub mod errors;
mod reaction;

pub use envelope::Envelope;
pub use errors::{ProtocolError, Result};
pub use reaction::Reaction;

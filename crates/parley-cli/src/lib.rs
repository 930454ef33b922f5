//! Line-oriented client for Parley
//!
//! A thin shell over [`parley_app::Driver`] that reads commands and chat text
//! from a line stream and writes the conversation as plain lines. All
//! orchestration lives in the generic [`parley_app::Runtime`].
//!
//! The transport is an in-process [`parley_harness::SimServer`] behind a
//! channel pair, so a session can be driven end to end without a network.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod command;
pub mod driver;
pub mod server;

pub use command::{Command, CommandError, USAGE};
pub use driver::{LineDriver, LineError};
pub use parley_app::{App, AppConfig, AppEvent, Driver, Runtime};
pub use server::{ServerHandle, spawn_server};

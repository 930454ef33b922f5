//! Deterministic simulation harness for Parley session testing.
//!
//! In-process implementations of the server and the [`parley_app::Driver`]
//! trait, for reproducible testing of any interleaving of user actions and
//! inbound traffic.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the message
//! log invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cluster;
pub mod invariants;
pub mod sim_driver;
pub mod sim_server;

pub use cluster::SimCluster;
pub use invariants::{
    AppendOnly, ClientSnapshot, IdsStrictlyIncreasing, Invariant, InvariantKind, InvariantRegistry,
    InvariantResult, SelfMatchesChosenName, SenderMatchesKind, SystemSnapshot, Violation,
};
pub use sim_driver::{SimDriver, SimDriverError};
pub use sim_server::{ConnId, Delivery, INVALID_MESSAGE, SimServer};

//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the system at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use parley_app::{App, ChatMessage};

/// Snapshot of the entire system state.
///
/// Contains observable state from one or more sessions for invariant checking.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Per-session state snapshots.
    pub clients: Vec<ClientSnapshot>,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no sessions).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a snapshot with a single session.
    pub fn single(client: ClientSnapshot) -> Self {
        Self { clients: vec![client] }
    }

    /// Create a snapshot from multiple sessions.
    pub fn from_clients(clients: Vec<ClientSnapshot>) -> Self {
        Self { clients }
    }

    /// Add a session snapshot.
    pub fn add_client(&mut self, client: ClientSnapshot) {
        self.clients.push(client);
    }
}

/// Snapshot of a single session's observable state.
#[derive(Debug, Clone, Default)]
pub struct ClientSnapshot {
    /// Session identifier, chosen by the test.
    pub id: u64,
    /// Name self-attribution compares against. `None` while there is none.
    pub chosen_name: Option<String>,
    /// Log contents now.
    pub messages: Vec<ChatMessage>,
    /// Log contents at the previous snapshot, for append-only checks.
    pub previous: Vec<ChatMessage>,
}

impl ClientSnapshot {
    /// Create an empty session snapshot.
    pub fn new(id: u64) -> Self {
        Self { id, ..Default::default() }
    }

    /// Capture the observable state of `app`.
    pub fn from_app(id: u64, app: &App) -> Self {
        Self {
            id,
            chosen_name: app.chosen_name().map(str::to_owned),
            messages: app.log().as_slice().to_vec(),
            previous: Vec::new(),
        }
    }

    /// Set the log contents seen at the previous snapshot.
    #[must_use]
    pub fn with_previous(mut self, previous: Vec<ChatMessage>) -> Self {
        self.previous = previous;
        self
    }

    /// Set the chosen name.
    #[must_use]
    pub fn with_chosen_name(mut self, name: Option<&str>) -> Self {
        self.chosen_name = name.map(str::to_owned);
        self
    }
}

//! Multi-session simulation over one [`SimServer`].
//!
//! Sessions act synchronously; their outbound payloads reach the server at
//! once, but deliveries back to sessions sit in per-session queues until the
//! test releases them. That makes any interleaving of local actions and
//! inbound echoes reproducible.

use std::collections::VecDeque;

use parley_app::{App, AppAction, AppConfig, AppEvent, ConnectionStatus};

use crate::{
    invariants::{ClientSnapshot, SystemSnapshot},
    sim_server::{ConnId, SimServer},
};

/// One session in the cluster.
struct Member {
    conn: ConnId,
    app: App,
    inbox: VecDeque<String>,
}

/// Simulated chat room with several sessions on one server.
pub struct SimCluster {
    server: SimServer,
    members: Vec<Member>,
}

impl SimCluster {
    /// Create a cluster of `size` sessions, all connected with an open channel.
    pub fn new(size: usize) -> Self {
        Self::with_server(SimServer::new(), size)
    }

    /// Create a cluster around a preconfigured server.
    pub fn with_server(mut server: SimServer, size: usize) -> Self {
        let members = (0..size)
            .map(|_| {
                let conn = server.connect();
                let mut app = App::new(AppConfig::default());
                let _ = app.set_status(ConnectionStatus::Open);
                Member { conn, app, inbox: VecDeque::new() }
            })
            .collect();

        Self { server, members }
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the cluster has no sessions.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Session state of member `idx`.
    pub fn app(&self, idx: usize) -> &App {
        &self.members[idx].app
    }

    /// Feed a user event to member `idx`, routing any sends through the
    /// server. Returns the actions the session produced.
    pub fn act(&mut self, idx: usize, event: AppEvent) -> Vec<AppAction> {
        let actions = self.members[idx].app.handle(event);
        let conn = self.members[idx].conn;

        for action in &actions {
            if let AppAction::Send { payload } = action {
                for delivery in self.server.handle(conn, payload) {
                    if let Some(member) = self.members.iter_mut().find(|m| m.conn == delivery.to) {
                        member.inbox.push_back(delivery.payload);
                    }
                }
            }
        }
        actions
    }

    /// Set the name of member `idx` and join.
    pub fn join(&mut self, idx: usize, name: &str) {
        let _ = self.act(idx, AppEvent::NameChanged(name.to_owned()));
        let _ = self.act(idx, AppEvent::JoinSubmitted);
    }

    /// Payloads waiting for member `idx`.
    pub fn pending(&self, idx: usize) -> usize {
        self.members[idx].inbox.len()
    }

    /// Deliver the oldest queued payload to member `idx`.
    ///
    /// Returns `false` if nothing was queued.
    pub fn deliver_next(&mut self, idx: usize) -> bool {
        let member = &mut self.members[idx];
        match member.inbox.pop_front() {
            Some(payload) => {
                let _ = member.app.receive(&payload);
                true
            },
            None => false,
        }
    }

    /// Deliver everything queued for every member.
    pub fn flush(&mut self) {
        for idx in 0..self.members.len() {
            while self.deliver_next(idx) {}
        }
    }

    /// Snapshot every session for invariant checking.
    pub fn snapshot(&self) -> SystemSnapshot {
        let clients = self
            .members
            .iter()
            .map(|m| ClientSnapshot::from_app(m.conn, &m.app))
            .collect();
        SystemSnapshot::from_clients(clients)
    }
}

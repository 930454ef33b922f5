//! In-process reference chat server.
//!
//! `SimServer` reproduces the behaviour of the broadcast backend the client
//! talks to, without any I/O. Tests and the CLI feed it raw payloads per
//! connection and route the returned [`Delivery`] list themselves.
//!
//! # Behaviour
//!
//! - `join`: records the connection's name and tells everyone "<name> joined
//!   the chat".
//! - `message`: broadcast to every connection, sender included.
//! - `reaction`: broadcast to every connection. Whether the sender gets its
//!   own reaction back is configurable, since real deployments differ.
//! - anything else: the sender alone gets an "Invalid message" notice.
//! - disconnect of a joined connection tells the rest "<name> left the chat".

use std::collections::BTreeMap;

use parley_proto::Envelope;

/// Connection identifier assigned by [`SimServer::connect`].
pub type ConnId = u64;

/// Notice sent back for payloads the server cannot route.
pub const INVALID_MESSAGE: &str = "Invalid message";

/// A payload addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Recipient.
    pub to: ConnId,
    /// Encoded envelope.
    pub payload: String,
}

/// Broadcast chat server for simulation.
#[derive(Debug, Clone)]
pub struct SimServer {
    /// Open connections and the name each joined under, if any.
    connections: BTreeMap<ConnId, Option<String>>,
    /// Next connection ID.
    next_conn_id: ConnId,
    /// Whether a reaction is reflected back to its sender.
    echo_reactions: bool,
}

impl Default for SimServer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimServer {
    /// Create a server that reflects reactions back to their sender.
    pub fn new() -> Self {
        Self { connections: BTreeMap::new(), next_conn_id: 1, echo_reactions: true }
    }

    /// Configure whether reactions are reflected back to their sender.
    #[must_use]
    pub fn with_reaction_echo(mut self, echo: bool) -> Self {
        self.echo_reactions = echo;
        self
    }

    /// Open a connection.
    pub fn connect(&mut self) -> ConnId {
        let conn = self.next_conn_id;
        self.next_conn_id += 1;
        self.connections.insert(conn, None);
        tracing::debug!(conn, "connection opened");
        conn
    }

    /// Close a connection, announcing the departure if it had joined.
    pub fn disconnect(&mut self, conn: ConnId) -> Vec<Delivery> {
        match self.connections.remove(&conn) {
            Some(Some(name)) => {
                tracing::debug!(conn, %name, "participant left");
                self.broadcast(&Envelope::system(format!("{name} left the chat")), None)
            },
            Some(None) | None => vec![],
        }
    }

    /// Name a connection joined under.
    pub fn name_of(&self, conn: ConnId) -> Option<&str> {
        self.connections.get(&conn).and_then(Option::as_deref)
    }

    /// Number of open connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Process one raw payload from `conn`.
    pub fn handle(&mut self, conn: ConnId, raw: &str) -> Vec<Delivery> {
        if !self.connections.contains_key(&conn) {
            tracing::warn!(conn, "payload from unknown connection");
            return vec![];
        }

        match Envelope::decode(raw) {
            Ok(Envelope::Join { name }) => {
                let notice = Envelope::system(format!("{name} joined the chat"));
                self.connections.insert(conn, Some(name));
                self.broadcast(&notice, None)
            },
            Ok(envelope @ Envelope::Message { .. }) => self.broadcast(&envelope, None),
            Ok(envelope @ Envelope::Reaction { .. }) => {
                let skip = if self.echo_reactions { None } else { Some(conn) };
                self.broadcast(&envelope, skip)
            },
            Ok(Envelope::System { .. }) => self.reject(conn, "clients may not send system notices"),
            Err(err) => self.reject(conn, &err.to_string()),
        }
    }

    fn reject(&self, conn: ConnId, reason: &str) -> Vec<Delivery> {
        tracing::debug!(conn, %reason, "rejected payload");
        self.deliver(conn, &Envelope::system(INVALID_MESSAGE)).into_iter().collect()
    }

    fn broadcast(&self, envelope: &Envelope, skip: Option<ConnId>) -> Vec<Delivery> {
        self.connections
            .keys()
            .filter(|&&to| Some(to) != skip)
            .filter_map(|&to| self.deliver(to, envelope))
            .collect()
    }

    fn deliver(&self, to: ConnId, envelope: &Envelope) -> Option<Delivery> {
        match envelope.encode() {
            Ok(payload) => Some(Delivery { to, payload }),
            Err(err) => {
                tracing::warn!(%err, "failed to encode delivery");
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads_for(deliveries: &[Delivery], conn: ConnId) -> Vec<&str> {
        deliveries.iter().filter(|d| d.to == conn).map(|d| d.payload.as_str()).collect()
    }

    #[test]
    fn join_is_announced_to_everyone() {
        let mut server = SimServer::new();
        let ana = server.connect();
        let bruno = server.connect();

        let out = server.handle(ana, r#"{"type":"join","name":"Ana"}"#);

        assert_eq!(out.len(), 2);
        assert_eq!(payloads_for(&out, bruno), vec![
            r#"{"type":"system","text":"Ana joined the chat"}"#
        ]);
        assert_eq!(server.name_of(ana), Some("Ana"));
    }

    #[test]
    fn message_is_echoed_to_sender() {
        let mut server = SimServer::new();
        let ana = server.connect();
        let raw = r#"{"type":"message","name":"Ana","text":"oi"}"#;

        let out = server.handle(ana, raw);

        assert_eq!(payloads_for(&out, ana), vec![raw]);
    }

    #[test]
    fn reaction_echo_can_be_disabled() {
        let mut server = SimServer::new().with_reaction_echo(false);
        let ana = server.connect();
        let bruno = server.connect();

        let out = server.handle(ana, r#"{"type":"reaction","name":"Ana","reaction":"👎"}"#);

        assert!(payloads_for(&out, ana).is_empty());
        assert_eq!(payloads_for(&out, bruno).len(), 1);
    }

    #[test]
    fn garbage_is_rejected_to_sender_only() {
        let mut server = SimServer::new();
        let ana = server.connect();
        let bruno = server.connect();

        let out = server.handle(ana, "not-json");

        assert_eq!(out, vec![Delivery {
            to: ana,
            payload: r#"{"type":"system","text":"Invalid message"}"#.to_owned()
        }]);
        assert!(payloads_for(&out, bruno).is_empty());
    }

    #[test]
    fn disconnect_announces_joined_only() {
        let mut server = SimServer::new();
        let ana = server.connect();
        let lurker = server.connect();
        let _ = server.handle(ana, r#"{"type":"join","name":"Ana"}"#);

        assert!(server.disconnect(lurker).is_empty());

        let out = server.disconnect(ana);
        assert!(out.is_empty(), "nobody left to tell");
        assert_eq!(server.connection_count(), 0);
    }
}

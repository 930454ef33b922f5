//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use parley_app::MessageKind;

use super::{Invariant, InvariantKind, InvariantResult, SystemSnapshot, Violation};

/// Message ids strictly increase in log order.
///
/// Ids are the rendering key; a repeat or reversal would make two entries
/// indistinguishable.
pub struct IdsStrictlyIncreasing;

impl Invariant for IdsStrictlyIncreasing {
    fn kind(&self) -> InvariantKind {
        InvariantKind::IdsStrictlyIncreasing
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            for window in client.messages.windows(2) {
                if window[1].id() <= window[0].id() {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!(
                            "client {}: id {} follows id {}",
                            client.id,
                            window[1].id(),
                            window[0].id()
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A message has a sender if and only if it is not a system message.
pub struct SenderMatchesKind;

impl Invariant for SenderMatchesKind {
    fn kind(&self) -> InvariantKind {
        InvariantKind::SenderMatchesKind
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            for msg in &client.messages {
                let is_system = msg.kind() == MessageKind::System;
                if is_system == msg.from().is_some() {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!(
                            "client {}: message {} is {:?} with sender {:?}",
                            client.id,
                            msg.id(),
                            msg.kind(),
                            msg.from()
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The log only grows: the previous contents are an unchanged prefix.
pub struct AppendOnly;

impl Invariant for AppendOnly {
    fn kind(&self) -> InvariantKind {
        InvariantKind::AppendOnly
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let prefix_len = client.previous.len();
            if client.messages.len() < prefix_len {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "client {}: log shrank from {} to {}",
                        client.id,
                        prefix_len,
                        client.messages.len()
                    ),
                });
            }

            let changed = client.previous.iter().zip(&client.messages).find(|(old, new)| old != new);
            if let Some((old, new)) = changed {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("client {}: message {old:?} became {new:?}", client.id),
                });
            }
        }
        Ok(())
    }
}

/// Newly appended messages are self exactly when they come from the chosen
/// name.
///
/// Only entries past `previous` are checked: self-attribution is fixed at
/// append time, and the name field may change before join. Snapshots must be
/// taken after every event for the check to be exact.
pub struct SelfMatchesChosenName;

impl Invariant for SelfMatchesChosenName {
    fn kind(&self) -> InvariantKind {
        InvariantKind::SelfMatchesChosenName
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let appended = client.messages.iter().skip(client.previous.len());
            for msg in appended.filter(|m| m.kind() != MessageKind::System) {
                let from_chosen = msg.from() == client.chosen_name.as_deref();
                if msg.is_self() != from_chosen {
                    return Err(Violation {
                        invariant: self.kind(),
                        message: format!(
                            "client {}: message {} from {:?} has self={} but chosen name is {:?}",
                            client.id,
                            msg.id(),
                            msg.from(),
                            msg.is_self(),
                            client.chosen_name
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use parley_app::{App, AppConfig, Reaction};

    use super::*;
    use crate::ClientSnapshot;

    fn joined_app() -> App {
        let mut app = App::new(AppConfig::default());
        let _ = app.set_status(parley_app::ConnectionStatus::Open);
        let _ = app.set_name("Ana");
        let _ = app.join();
        app
    }

    #[test]
    fn healthy_log_passes_all() {
        let mut app = joined_app();
        let _ = app.receive(r#"{"type":"system","text":"hi"}"#);
        let _ = app.send_reaction(Reaction::Up);

        let snapshot = SystemSnapshot::single(ClientSnapshot::from_app(1, &app));

        assert!(IdsStrictlyIncreasing.check(&snapshot).is_ok());
        assert!(SenderMatchesKind.check(&snapshot).is_ok());
        assert!(AppendOnly.check(&snapshot).is_ok());
        assert!(SelfMatchesChosenName.check(&snapshot).is_ok());
    }

    #[test]
    fn reordered_log_is_detected() {
        let mut app = joined_app();
        let _ = app.receive("a");
        let _ = app.receive("b");

        let mut client = ClientSnapshot::from_app(1, &app);
        client.messages.reverse();
        let snapshot = SystemSnapshot::single(client);

        let violation = IdsStrictlyIncreasing.check(&snapshot).unwrap_err();
        assert_eq!(violation.invariant, InvariantKind::IdsStrictlyIncreasing);
    }

    #[test]
    fn shrinking_log_is_detected() {
        let mut app = joined_app();
        let _ = app.receive("a");
        let previous = app.log().as_slice().to_vec();

        let snapshot = SystemSnapshot::single(ClientSnapshot::new(1).with_previous(previous));

        assert!(AppendOnly.check(&snapshot).is_err());
    }

    #[test]
    fn self_from_other_name_is_detected() {
        let mut app = joined_app();
        let _ = app.send_reaction(Reaction::Down);

        let snapshot = SystemSnapshot::single(
            ClientSnapshot::from_app(1, &app).with_chosen_name(Some("Bruno")),
        );

        let violation = SelfMatchesChosenName.check(&snapshot).unwrap_err();
        assert_eq!(violation.invariant, InvariantKind::SelfMatchesChosenName);
    }

    #[test]
    fn rename_before_join_keeps_earlier_entries() {
        let mut app = App::new(AppConfig::default());
        let _ = app.set_name("Ana");
        let _ = app.receive(r#"{"type":"message","name":"Ana","text":"oi"}"#);
        let previous = app.log().as_slice().to_vec();
        let _ = app.set_name("Bruno");

        let snapshot =
            SystemSnapshot::single(ClientSnapshot::from_app(1, &app).with_previous(previous));

        assert!(app.log().last().unwrap().is_self());
        assert!(SelfMatchesChosenName.check(&snapshot).is_ok());
    }
}

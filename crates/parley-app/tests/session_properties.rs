//! Property-based tests for the session state machine.
//!
//! Tests verify that invariants hold under arbitrary event sequences, in any
//! interleaving of user input and inbound traffic.

use parley_app::{
    App, AppAction, AppConfig, AppEvent, ConnectionStatus, MessageKind, Reaction, decode_inbound,
};
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = ConnectionStatus> {
    prop_oneof![
        Just(ConnectionStatus::Connecting),
        Just(ConnectionStatus::Open),
        Just(ConnectionStatus::Closed),
        Just(ConnectionStatus::Unknown),
    ]
}

fn reaction_strategy() -> impl Strategy<Value = Reaction> {
    prop::sample::select(Reaction::ALL.to_vec())
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("Ana".to_owned()), Just("Bruno".to_owned()), Just(" ".to_owned()), "[a-z ]{0,6}"]
}

/// Raw inbound payloads, well-formed or not.
fn payload_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (name_strategy(), "[a-z]{0,8}").prop_map(|(n, t)| {
            serde_json::json!({ "type": "message", "name": n, "text": t }).to_string()
        }),
        (name_strategy(), reaction_strategy()).prop_map(|(n, r)| {
            serde_json::json!({ "type": "reaction", "name": n, "reaction": r.emoji() }).to_string()
        }),
        "[a-z]{0,8}".prop_map(|t| serde_json::json!({ "type": "system", "text": t }).to_string()),
        "\\PC{0,24}",
    ]
}

/// Generate random session events.
fn event_strategy() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        2 => status_strategy().prop_map(AppEvent::StatusChanged),
        4 => payload_strategy().prop_map(AppEvent::PayloadReceived),
        1 => name_strategy().prop_map(AppEvent::NameChanged),
        1 => Just(AppEvent::JoinSubmitted),
        1 => "[a-z ]{0,8}".prop_map(AppEvent::DraftChanged),
        1 => Just(AppEvent::DraftSubmitted),
        1 => prop::sample::select(vec!["🔥", "👀", " "]).prop_map(|e| AppEvent::EmojiPicked(e.into())),
        2 => reaction_strategy().prop_map(AppEvent::ReactionPicked),
    ]
}

fn sends(actions: &[AppAction]) -> usize {
    actions.iter().filter(|a| matches!(a, AppAction::Send { .. })).count()
}

proptest! {
    #[test]
    fn prop_log_invariants_hold(events in prop::collection::vec(event_strategy(), 0..60)) {
        let mut app = App::new(AppConfig::default());
        let mut previous = Vec::new();

        for event in events {
            let _ = app.handle(event);
            let log = app.log().as_slice();

            // Append-only: the old log is a prefix of the new one
            prop_assert!(log.len() >= previous.len());
            prop_assert_eq!(&log[..previous.len()], previous.as_slice());

            // Ids strictly increase
            prop_assert!(log.windows(2).all(|w| w[0].id() < w[1].id()));

            for msg in log {
                // Sender absent iff system; reaction present iff reaction kind
                prop_assert_eq!(msg.from().is_none(), msg.kind() == MessageKind::System);
                prop_assert_eq!(msg.reaction().is_some(), matches!(msg.kind(), MessageKind::Reaction(_)));
            }

            // Self iff the sender is the chosen name when the entry was appended.
            // One event never both renames and appends, so the name now is the
            // name at append time.
            for msg in &log[previous.len()..] {
                if msg.kind() != MessageKind::System {
                    prop_assert_eq!(msg.is_self(), msg.from() == app.chosen_name());
                }
            }

            previous = log.to_vec();
        }
    }

    #[test]
    fn prop_joined_is_monotonic(events in prop::collection::vec(event_strategy(), 0..60)) {
        let mut app = App::new(AppConfig::default());
        let mut identity: Option<String> = None;

        for event in events {
            let _ = app.handle(event);
            let now = app.identity().map(str::to_owned);

            if let Some(before) = &identity {
                prop_assert_eq!(Some(before), now.as_ref());
            } else if let Some(now) = now {
                prop_assert!(!now.is_empty());
                prop_assert_eq!(now.as_str(), now.trim());
                identity = Some(now);
            }
        }
    }

    #[test]
    fn prop_each_payload_appends_exactly_one(
        events in prop::collection::vec(event_strategy(), 0..20),
        raw in payload_strategy(),
    ) {
        let mut app = App::new(AppConfig::default());
        for event in events {
            let _ = app.handle(event);
        }

        let before = app.log().len();
        let actions = app.handle(AppEvent::PayloadReceived(raw));

        prop_assert_eq!(app.log().len(), before + 1);
        prop_assert_eq!(sends(&actions), 0);
        prop_assert!(actions.contains(&AppAction::ScrollToLatest));
    }

    #[test]
    fn prop_malformed_payload_is_shown_verbatim(raw in "[g-mo-su-z][^\\{\\[]{0,24}") {
        let msg = decode_inbound(&raw, Some("Ana")).into_message();

        prop_assert_eq!(msg.kind(), MessageKind::System);
        prop_assert_eq!(msg.text(), raw.as_str());
    }

    #[test]
    fn prop_message_self_iff_name_matches(sender in name_strategy(), me in "[A-Za-z]{1,6}") {
        let raw = serde_json::json!({ "type": "message", "name": sender, "text": "x" }).to_string();
        let msg = decode_inbound(&raw, Some(&me)).into_message();

        prop_assert_eq!(msg.is_self(), sender == me);
    }

    #[test]
    fn prop_reaction_gate(
        join in any::<bool>(),
        status in status_strategy(),
        reaction in reaction_strategy(),
    ) {
        let mut app = App::new(AppConfig::default());
        let _ = app.handle(AppEvent::NameChanged("Ana".into()));
        if join {
            let _ = app.handle(AppEvent::JoinSubmitted);
        }
        let _ = app.handle(AppEvent::StatusChanged(status));

        let before = app.log().len();
        let actions = app.handle(AppEvent::ReactionPicked(reaction));

        if join && status == ConnectionStatus::Open {
            // Appended synchronously, before any echo
            prop_assert_eq!(app.log().len(), before + 1);
            prop_assert_eq!(sends(&actions), 1);
            let last = app.log().last().expect("reaction appended");
            prop_assert!(last.is_self());
            prop_assert_eq!(last.reaction(), Some(reaction));
        } else {
            prop_assert_eq!(app.log().len(), before);
            prop_assert!(actions.is_empty());
        }
    }
}

//! Direct messages and the conversation view.

mod common;

use arbor_social::{SocialError, messages, notifications};
use arbor_types::models::NotificationKind;
use common::{register, test_db};
use uuid::Uuid;

#[test]
fn conversation_interleaves_both_directions_oldest_first() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    messages::send_message(&db, &alice, bob.id, "hi bob").unwrap();
    messages::send_message(&db, &bob, alice.id, "hi alice").unwrap();
    messages::send_message(&db, &alice, bob.id, "lunch?").unwrap();

    let thread = messages::conversation(&db, &alice, bob.id).unwrap();
    let contents: Vec<_> = thread.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["hi bob", "hi alice", "lunch?"]);

    // Same thread from bob's side.
    let mirror = messages::conversation(&db, &bob, alice.id).unwrap();
    assert_eq!(mirror.len(), 3);
    assert_eq!(mirror[0].sender_username, "alice");
    assert_eq!(mirror[0].receiver_username, "bob");
}

#[test]
fn receiver_is_notified_of_new_messages() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    messages::send_message(&db, &alice, bob.id, "ping").unwrap();

    let inbox = notifications::list_notifications(&db, bob.id).unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].notification_type, NotificationKind::Message);
    assert_eq!(inbox[0].message, "You have a new message from alice");
}

#[test]
fn unknown_receiver_is_not_found() {
    let db = test_db();
    let alice = register(&db, "alice");

    let err = messages::send_message(&db, &alice, Uuid::new_v4(), "void").unwrap_err();
    assert!(matches!(err, SocialError::NotFound("user")));

    let err = messages::conversation(&db, &alice, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, SocialError::NotFound("user")));
}

#[test]
fn blank_message_is_rejected() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    let err = messages::send_message(&db, &alice, bob.id, " \t").unwrap_err();
    assert!(matches!(err, SocialError::Validation(_)));
    assert!(messages::conversation(&db, &alice, bob.id).unwrap().is_empty());
}

#[test]
fn messaging_yourself_works_and_still_notifies() {
    let db = test_db();
    let alice = register(&db, "alice");

    messages::send_message(&db, &alice, alice.id, "reminder").unwrap();

    let thread = messages::conversation(&db, &alice, alice.id).unwrap();
    assert_eq!(thread.len(), 1);

    let inbox = notifications::list_notifications(&db, alice.id).unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].message, "You have a new message from alice");
}

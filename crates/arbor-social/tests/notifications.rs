//! The notification stream: ordering, read flags, ownership scoping.

mod common;

use arbor_social::{SocialError, engagement, notifications, posts};
use common::{register, test_db};
use uuid::Uuid;

#[test]
fn stream_is_newest_first_with_sender_attached() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");
    let carol = register(&db, "carol");

    let post = posts::create_post(&db, &alice, "busy day", None).unwrap();
    engagement::like_post(&db, &bob, post.id).unwrap();
    engagement::comment_on_post(&db, &carol, post.id, "neat").unwrap();

    let inbox = notifications::list_notifications(&db, alice.id).unwrap();
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0].message, "carol commented on your post.");
    assert_eq!(inbox[1].message, "bob liked your post.");
    assert_eq!(inbox[0].from_username.as_deref(), Some("carol"));
    assert_eq!(inbox[1].from_username.as_deref(), Some("bob"));
    assert!(inbox.iter().all(|n| !n.is_read));
}

#[test]
fn mark_read_flips_only_the_addressed_row() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    let post = posts::create_post(&db, &alice, "two pings", None).unwrap();
    engagement::like_post(&db, &bob, post.id).unwrap();
    engagement::comment_on_post(&db, &bob, post.id, "hello").unwrap();

    let inbox = notifications::list_notifications(&db, alice.id).unwrap();
    notifications::mark_read(&db, &alice, inbox[1].id).unwrap();

    let inbox = notifications::list_notifications(&db, alice.id).unwrap();
    assert!(!inbox[0].is_read);
    assert!(inbox[1].is_read);
}

#[test]
fn marking_someone_elses_notification_is_not_found() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    let post = posts::create_post(&db, &alice, "mine", None).unwrap();
    engagement::like_post(&db, &bob, post.id).unwrap();

    let inbox = notifications::list_notifications(&db, alice.id).unwrap();
    let err = notifications::mark_read(&db, &bob, inbox[0].id).unwrap_err();
    assert!(matches!(err, SocialError::NotFound("notification")));

    // Untouched for the real owner.
    let inbox = notifications::list_notifications(&db, alice.id).unwrap();
    assert!(!inbox[0].is_read);
}

#[test]
fn marking_an_unknown_notification_is_not_found() {
    let db = test_db();
    let alice = register(&db, "alice");

    let err = notifications::mark_read(&db, &alice, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, SocialError::NotFound("notification")));
}

#[test]
fn self_mention_is_delivered_even_though_self_like_is_not() {
    let db = test_db();
    let alice = register(&db, "alice");

    let post = posts::create_post(&db, &alice, "note to @alice", None).unwrap();
    engagement::like_post(&db, &alice, post.id).unwrap();

    let inbox = notifications::list_notifications(&db, alice.id).unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].message, "alice mentioned you in a post.");
}

//! Post lifecycle: creation, partial edits, deletion, pinning, and the
//! hashtag/mention side effects that ride along.

mod common;

use arbor_social::{SocialError, notifications, posts};
use common::{register, test_db};
use uuid::Uuid;

#[test]
fn create_post_returns_fresh_post() {
    let db = test_db();
    let alice = register(&db, "alice");

    let post = posts::create_post(&db, &alice, "first!", None).unwrap();

    assert_eq!(post.username, "alice");
    assert_eq!(post.user_id, alice.id);
    assert_eq!(post.like_count, 0);
    assert_eq!(post.comment_count, 0);
    assert!(!post.pinned);

    let feed = posts::list_posts(&db).unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, post.id);
}

#[test]
fn blank_content_is_rejected() {
    let db = test_db();
    let alice = register(&db, "alice");

    let err = posts::create_post(&db, &alice, "   \n", None).unwrap_err();
    assert!(matches!(err, SocialError::Validation(_)));
    assert!(posts::list_posts(&db).unwrap().is_empty());
}

#[test]
fn hashtags_are_derived_case_insensitively() {
    let db = test_db();
    let alice = register(&db, "alice");

    posts::create_post(&db, &alice, "shipping #Rust today", None).unwrap();
    posts::create_post(&db, &alice, "more #rust and #async", None).unwrap();

    let rust_posts = posts::posts_by_hashtag(&db, "RUST").unwrap();
    assert_eq!(rust_posts.len(), 2);

    let async_posts = posts::posts_by_hashtag(&db, "async").unwrap();
    assert_eq!(async_posts.len(), 1);

    assert!(posts::posts_by_hashtag(&db, "nosuchtag").unwrap().is_empty());
}

#[test]
fn repeated_tag_links_once() {
    let db = test_db();
    let alice = register(&db, "alice");

    posts::create_post(&db, &alice, "hello #foo #FOO", None).unwrap();

    // A single link row, so the post shows up exactly once.
    let tagged = posts::posts_by_hashtag(&db, "foo").unwrap();
    assert_eq!(tagged.len(), 1);
}

#[test]
fn delete_unlinks_hashtags() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    let post = posts::create_post(&db, &alice, "going away #soon", None).unwrap();
    arbor_social::engagement::like_post(&db, &bob, post.id).unwrap();
    arbor_social::engagement::comment_on_post(&db, &bob, post.id, "bye").unwrap();

    posts::delete_post(&db, &alice, post.id).unwrap();

    assert!(posts::posts_by_hashtag(&db, "soon").unwrap().is_empty());
    let err = arbor_social::engagement::post_comments(&db, post.id).unwrap_err();
    assert!(matches!(err, SocialError::NotFound("post")));
}

#[test]
fn mentions_notify_resolved_users_only() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    posts::create_post(&db, &alice, "hey @bob and @ghost", None).unwrap();

    let inbox = notifications::list_notifications(&db, bob.id).unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].message, "alice mentioned you in a post.");
    assert_eq!(inbox[0].from_username.as_deref(), Some("alice"));
}

#[test]
fn edit_rederives_hashtags_and_renotifies_mentions() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    let post = posts::create_post(&db, &alice, "draft #old cc @bob", None).unwrap();
    let updated =
        posts::edit_post(&db, &alice, post.id, Some("final #new cc @bob"), None).unwrap();

    assert_eq!(updated.content, "final #new cc @bob");
    assert!(posts::posts_by_hashtag(&db, "old").unwrap().is_empty());
    assert_eq!(posts::posts_by_hashtag(&db, "new").unwrap().len(), 1);

    // Still mentioned after the edit, so bob is notified a second time.
    let inbox = notifications::list_notifications(&db, bob.id).unwrap();
    assert_eq!(inbox.len(), 2);
}

#[test]
fn edit_folds_duplicate_tags_and_notifies_each_mention_once() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    let post = posts::create_post(&db, &alice, "plain start", None).unwrap();
    posts::edit_post(&db, &alice, post.id, Some("hello #foo #FOO @bob"), None).unwrap();

    // One link row despite the duplicate casing.
    assert_eq!(posts::posts_by_hashtag(&db, "foo").unwrap().len(), 1);

    let inbox = notifications::list_notifications(&db, bob.id).unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].message, "alice mentioned you in a post.");
}

#[test]
fn edit_keeps_fields_not_supplied() {
    let db = test_db();
    let alice = register(&db, "alice");

    let post = posts::create_post(&db, &alice, "original", Some("img-1")).unwrap();
    let updated = posts::edit_post(&db, &alice, post.id, None, Some("img-2")).unwrap();

    assert_eq!(updated.content, "original");
    assert_eq!(updated.image.as_deref(), Some("img-2"));
}

#[test]
fn only_the_author_can_edit_or_delete() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    let post = posts::create_post(&db, &alice, "mine", None).unwrap();

    let err = posts::edit_post(&db, &bob, post.id, Some("taken"), None).unwrap_err();
    assert!(matches!(err, SocialError::Forbidden(_)));

    let err = posts::delete_post(&db, &bob, post.id).unwrap_err();
    assert!(matches!(err, SocialError::Forbidden(_)));

    posts::delete_post(&db, &alice, post.id).unwrap();
    assert!(posts::list_posts(&db).unwrap().is_empty());
}

#[test]
fn editing_a_missing_post_is_not_found() {
    let db = test_db();
    let alice = register(&db, "alice");

    let err = posts::edit_post(&db, &alice, Uuid::new_v4(), Some("x"), None).unwrap_err();
    assert!(matches!(err, SocialError::NotFound("post")));
}

#[test]
fn toggle_pin_flips_and_reports_state() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    let post = posts::create_post(&db, &alice, "pin me", None).unwrap();

    assert!(posts::toggle_pin(&db, &alice, post.id).unwrap());
    assert!(!posts::toggle_pin(&db, &alice, post.id).unwrap());

    let err = posts::toggle_pin(&db, &bob, post.id).unwrap_err();
    assert!(matches!(err, SocialError::Forbidden(_)));
}

#[test]
fn feed_is_newest_first() {
    let db = test_db();
    let alice = register(&db, "alice");

    posts::create_post(&db, &alice, "one", None).unwrap();
    posts::create_post(&db, &alice, "two", None).unwrap();
    posts::create_post(&db, &alice, "three", None).unwrap();

    let feed = posts::list_posts(&db).unwrap();
    let contents: Vec<_> = feed.iter().map(|p| p.content.as_str()).collect();
    assert_eq!(contents, vec!["three", "two", "one"]);
}

#[test]
fn user_posts_requires_a_known_username() {
    let db = test_db();
    let alice = register(&db, "alice");
    let bob = register(&db, "bob");

    posts::create_post(&db, &alice, "a1", None).unwrap();
    posts::create_post(&db, &bob, "b1", None).unwrap();
    posts::create_post(&db, &alice, "a2", None).unwrap();

    let mine = posts::user_posts(&db, "alice").unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|p| p.username == "alice"));

    let err = posts::user_posts(&db, "ghost").unwrap_err();
    assert!(matches!(err, SocialError::NotFound("user")));
}

#[test]
fn search_is_substring_and_empty_query_matches_all() {
    let db = test_db();
    let alice = register(&db, "alice");

    posts::create_post(&db, &alice, "coffee break", None).unwrap();
    posts::create_post(&db, &alice, "Coffee grinder review", None).unwrap();
    posts::create_post(&db, &alice, "tea time", None).unwrap();

    let hits = posts::search_posts(&db, "coffee").unwrap();
    assert_eq!(hits.len(), 2);

    assert_eq!(posts::search_posts(&db, "").unwrap().len(), 3);
}

#[test]
fn search_treats_like_wildcards_literally() {
    let db = test_db();
    let alice = register(&db, "alice");

    posts::create_post(&db, &alice, "sale: 50% off", None).unwrap();
    posts::create_post(&db, &alice, "sale: 50 percent off", None).unwrap();

    let hits = posts::search_posts(&db, "50%").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "sale: 50% off");
}

//! Profiles: one per user, partial updates, paged listing.

mod common;

use arbor_social::{SocialError, profiles};
use common::{register, test_db};

#[test]
fn create_then_fetch_by_username() {
    let db = test_db();
    let alice = register(&db, "alice");

    let created = profiles::create_profile(&db, &alice, "rustacean", Some("avatar-1")).unwrap();
    assert_eq!(created.username, "alice");
    assert_eq!(created.bio, "rustacean");
    assert_eq!(created.avatar.as_deref(), Some("avatar-1"));

    let fetched = profiles::profile_of(&db, "alice").unwrap();
    assert_eq!(fetched.id, created.id);
}

#[test]
fn one_profile_per_user() {
    let db = test_db();
    let alice = register(&db, "alice");

    profiles::create_profile(&db, &alice, "first", None).unwrap();
    let err = profiles::create_profile(&db, &alice, "second", None).unwrap_err();
    assert!(matches!(err, SocialError::Conflict(_)));
}

#[test]
fn update_is_partial() {
    let db = test_db();
    let alice = register(&db, "alice");

    profiles::create_profile(&db, &alice, "old bio", Some("avatar-1")).unwrap();
    let updated = profiles::update_profile(&db, &alice, Some("new bio"), None).unwrap();

    assert_eq!(updated.bio, "new bio");
    assert_eq!(updated.avatar.as_deref(), Some("avatar-1"));
}

#[test]
fn update_without_a_profile_is_not_found() {
    let db = test_db();
    let alice = register(&db, "alice");

    let err = profiles::update_profile(&db, &alice, Some("bio"), None).unwrap_err();
    assert!(matches!(err, SocialError::NotFound("profile")));
}

#[test]
fn unknown_username_is_not_found() {
    let db = test_db();
    register(&db, "alice");

    let err = profiles::profile_of(&db, "ghost").unwrap_err();
    assert!(matches!(err, SocialError::NotFound("profile")));
}

#[test]
fn listing_pages_in_creation_order() {
    let db = test_db();

    for name in ["alice", "bob", "carol"] {
        let actor = register(&db, name);
        profiles::create_profile(&db, &actor, name, None).unwrap();
    }

    let page = profiles::list_profiles(&db, 2, 0).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].username, "alice");
    assert_eq!(page[1].username, "bob");

    let rest = profiles::list_profiles(&db, 2, 2).unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].username, "carol");
}

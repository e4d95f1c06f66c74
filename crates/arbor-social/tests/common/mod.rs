use chrono::Utc;
use uuid::Uuid;

use arbor_db::{Database, models};
use arbor_types::models::Actor;

pub fn test_db() -> Database {
    Database::open_in_memory().unwrap()
}

/// Creates a user row and returns the actor the core operations expect.
pub fn register(db: &Database, username: &str) -> Actor {
    let id = Uuid::new_v4();
    db.create_user(
        &id.to_string(),
        username,
        "argon2-hash-placeholder",
        &models::timestamp(Utc::now()),
    )
    .unwrap();
    Actor {
        id,
        username: username.to_string(),
    }
}

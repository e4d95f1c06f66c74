//! User profiles: one per user, created explicitly after registration.

use chrono::Utc;
use uuid::Uuid;

use arbor_db::{Database, models, queries};
use arbor_types::models::{Actor, Profile};

use crate::error::SocialError;

pub fn create_profile(
    db: &Database,
    actor: &Actor,
    bio: &str,
    avatar: Option<&str>,
) -> Result<Profile, SocialError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    db.with_tx(|tx| -> Result<Profile, SocialError> {
        if let Err(e) = queries::insert_profile(
            tx,
            &id.to_string(),
            &actor.id.to_string(),
            bio,
            avatar,
            &models::timestamp(now),
        ) {
            if queries::is_unique_violation(&e) {
                return Err(SocialError::Conflict("profile already exists"));
            }
            return Err(e.into());
        }

        queries::profile_by_user(tx, &actor.id.to_string())?
            .ok_or_else(|| SocialError::Storage(anyhow::anyhow!("profile missing after insert")))
    })
}

/// Partial update: a None field keeps the stored value.
pub fn update_profile(
    db: &Database,
    actor: &Actor,
    bio: Option<&str>,
    avatar: Option<&str>,
) -> Result<Profile, SocialError> {
    db.with_tx(|tx| -> Result<Profile, SocialError> {
        let updated = queries::update_profile(tx, &actor.id.to_string(), bio, avatar)?;
        if updated == 0 {
            return Err(SocialError::NotFound("profile"));
        }
        queries::profile_by_user(tx, &actor.id.to_string())?
            .ok_or(SocialError::NotFound("profile"))
    })
}

pub fn profile_of(db: &Database, username: &str) -> Result<Profile, SocialError> {
    db.with_conn(|conn| -> Result<Profile, SocialError> {
        queries::profile_by_username(conn, username)?.ok_or(SocialError::NotFound("profile"))
    })
}

pub fn list_profiles(db: &Database, limit: u32, offset: u32) -> Result<Vec<Profile>, SocialError> {
    db.with_conn(|conn| -> Result<Vec<Profile>, SocialError> {
        Ok(queries::profiles_page(conn, limit, offset)?)
    })
}

//! The notification stream: reading and acknowledging.

use uuid::Uuid;

use arbor_db::{Database, queries};
use arbor_types::models::{Actor, Notification};

use crate::error::SocialError;

/// All notifications addressed to `user_id`, newest first.
pub fn list_notifications(db: &Database, user_id: Uuid) -> Result<Vec<Notification>, SocialError> {
    db.with_conn(|conn| -> Result<Vec<Notification>, SocialError> {
        Ok(queries::notifications_for(conn, &user_id.to_string())?)
    })
}

/// Marks one of the actor's notifications read. A notification belonging to
/// someone else is reported as absent, not forbidden.
pub fn mark_read(db: &Database, actor: &Actor, notification_id: Uuid) -> Result<(), SocialError> {
    db.with_conn(|conn| -> Result<(), SocialError> {
        let updated = queries::mark_notification_read(
            conn,
            &notification_id.to_string(),
            &actor.id.to_string(),
        )?;
        if updated == 0 {
            return Err(SocialError::NotFound("notification"));
        }
        Ok(())
    })
}

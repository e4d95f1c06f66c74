//! Direct messages between two users.

use chrono::Utc;
use uuid::Uuid;

use arbor_db::{Database, models, queries};
use arbor_types::models::{Actor, Message, NotificationKind};

use crate::error::SocialError;
use crate::notify;

/// Stores the message and notifies the receiver. Messaging yourself is
/// allowed and still produces the notification.
pub fn send_message(
    db: &Database,
    actor: &Actor,
    receiver_id: Uuid,
    content: &str,
) -> Result<Message, SocialError> {
    if content.trim().is_empty() {
        return Err(SocialError::Validation("content must not be empty"));
    }

    let id = Uuid::new_v4();
    let now = Utc::now();

    db.with_tx(|tx| -> Result<Message, SocialError> {
        let receiver = queries::user_by_id(tx, &receiver_id.to_string())?
            .ok_or(SocialError::NotFound("user"))?;

        queries::insert_message(
            tx,
            &id.to_string(),
            &actor.id.to_string(),
            &receiver_id.to_string(),
            content,
            &models::timestamp(now),
        )?;

        notify::emit(
            tx,
            NotificationKind::Message,
            receiver_id,
            actor,
            &format!("You have a new message from {}", actor.username),
        )?;

        Ok(Message {
            id,
            sender_id: actor.id,
            sender_username: actor.username.clone(),
            receiver_id,
            receiver_username: receiver.username,
            content: content.to_string(),
            created_at: now,
        })
    })
}

/// The full exchange between the actor and `other_id`, both directions,
/// oldest first.
pub fn conversation(
    db: &Database,
    actor: &Actor,
    other_id: Uuid,
) -> Result<Vec<Message>, SocialError> {
    db.with_conn(|conn| -> Result<Vec<Message>, SocialError> {
        queries::user_by_id(conn, &other_id.to_string())?.ok_or(SocialError::NotFound("user"))?;
        Ok(queries::messages_between(
            conn,
            &actor.id.to_string(),
            &other_id.to_string(),
        )?)
    })
}

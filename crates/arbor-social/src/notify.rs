//! Notification emission. Always runs on the caller's transaction, so a
//! notification persists exactly when the action that triggered it does.

use chrono::Utc;
use rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

use arbor_db::models::UserRow;
use arbor_db::{models, queries};
use arbor_types::models::{Actor, NotificationKind};

use crate::annotate;
use crate::error::SocialError;

/// Where the mentioning text lives; picks the notification wording.
#[derive(Clone, Copy)]
pub(crate) enum MentionScope {
    Post,
    Comment,
}

pub(crate) fn emit(
    conn: &Connection,
    kind: NotificationKind,
    to_user_id: Uuid,
    from: &Actor,
    message: &str,
) -> Result<(), SocialError> {
    let from_id = from.id.to_string();
    queries::insert_notification(
        conn,
        &Uuid::new_v4().to_string(),
        kind,
        &to_user_id.to_string(),
        Some(&from_id),
        message,
        &models::timestamp(Utc::now()),
    )?;
    debug!("Notification '{}' emitted to {}", kind.as_str(), to_user_id);
    Ok(())
}

/// Exact-username lookup for mention handles. Unknown handles are dropped
/// silently, the one swallow-and-continue path in the core.
fn resolve_mention_targets(
    conn: &Connection,
    handles: impl IntoIterator<Item = String>,
) -> Result<Vec<UserRow>, SocialError> {
    let mut targets = Vec::new();
    for handle in handles {
        if let Some(user) = queries::user_by_username(conn, &handle)? {
            targets.push(user);
        }
    }
    Ok(targets)
}

/// One mention notification per distinct resolvable handle in `text`.
/// Self-mentions are delivered.
pub(crate) fn notify_mentions(
    conn: &Connection,
    actor: &Actor,
    text: &str,
    scope: MentionScope,
) -> Result<(), SocialError> {
    for user in resolve_mention_targets(conn, annotate::extract_mentions(text))? {
        let message = match scope {
            MentionScope::Post => format!("{} mentioned you in a post.", actor.username),
            MentionScope::Comment => format!("{} mentioned you in a comment.", actor.username),
        };
        emit(
            conn,
            NotificationKind::Mention,
            models::parse_id(&user.id),
            actor,
            &message,
        )?;
    }
    Ok(())
}

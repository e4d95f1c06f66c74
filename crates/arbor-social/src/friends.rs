//! Friendship lifecycle: a directional pending request the receiver accepts
//! or declines. Accepted and declined are terminal states.
//!
//! Duplicate detection is existence-only on the ordered (sender, receiver)
//! pair: a declined request still blocks re-sending in the same direction,
//! while the reverse direction stays open.

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use arbor_db::{Database, models, queries};
use arbor_types::models::{
    Actor, FriendDecision, FriendRef, Friendship, FriendshipStatus, NotificationKind,
};

use crate::error::SocialError;
use crate::notify;

pub fn send_friend_request(
    db: &Database,
    actor: &Actor,
    receiver_id: Uuid,
) -> Result<Friendship, SocialError> {
    if receiver_id == actor.id {
        return Err(SocialError::Validation(
            "cannot send a friend request to yourself",
        ));
    }

    let id = Uuid::new_v4();
    let now = Utc::now();

    db.with_tx(|tx| -> Result<Friendship, SocialError> {
        let receiver = queries::user_by_id(tx, &receiver_id.to_string())?
            .ok_or(SocialError::NotFound("user"))?;

        if let Err(e) = queries::insert_friendship(
            tx,
            &id.to_string(),
            &actor.id.to_string(),
            &receiver_id.to_string(),
            FriendshipStatus::Pending,
            &models::timestamp(now),
        ) {
            if queries::is_unique_violation(&e) {
                return Err(SocialError::Conflict("friend request already sent"));
            }
            return Err(e.into());
        }

        notify::emit(
            tx,
            NotificationKind::FriendRequest,
            receiver_id,
            actor,
            &format!("{} sent you a friend request.", actor.username),
        )?;

        Ok(Friendship {
            id,
            sender_id: actor.id,
            sender_username: actor.username.clone(),
            receiver_id,
            receiver_username: receiver.username,
            status: FriendshipStatus::Pending,
            created_at: now,
        })
    })
}

/// Only the addressed receiver can answer, and only while the request is
/// pending. The original sender is notified of the outcome.
pub fn respond_friend_request(
    db: &Database,
    actor: &Actor,
    request_id: Uuid,
    decision: FriendDecision,
) -> Result<Friendship, SocialError> {
    db.with_tx(|tx| -> Result<Friendship, SocialError> {
        let mut friendship =
            queries::friendship_for_receiver(tx, &request_id.to_string(), &actor.id.to_string())?
                .ok_or(SocialError::NotFound("friend request"))?;

        if friendship.status != FriendshipStatus::Pending {
            return Err(SocialError::InvalidState("friend request already answered"));
        }

        let (status, message) = match decision {
            FriendDecision::Accept => (
                FriendshipStatus::Accepted,
                format!("{} accepted your friend request.", actor.username),
            ),
            FriendDecision::Decline => (
                FriendshipStatus::Declined,
                format!("{} declined your friend request.", actor.username),
            ),
        };

        queries::set_friendship_status(tx, &request_id.to_string(), status)?;
        notify::emit(
            tx,
            NotificationKind::FriendRequest,
            friendship.sender_id,
            actor,
            &message,
        )?;

        friendship.status = status;
        Ok(friendship)
    })
}

/// Everyone connected to `user_id` through an accepted friendship, either
/// direction. Deduplicated (both directions may be accepted) before the
/// page window applies.
pub fn list_friends(
    db: &Database,
    user_id: Uuid,
    limit: u32,
    offset: u32,
) -> Result<Vec<FriendRef>, SocialError> {
    db.with_conn(|conn| -> Result<Vec<FriendRef>, SocialError> {
        let all = queries::accepted_friends_of(conn, &user_id.to_string())?;
        let mut seen = HashSet::new();
        Ok(all
            .into_iter()
            .filter(|f| seen.insert(f.id))
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    })
}

/// Pending requests addressed to `user_id`, oldest first.
pub fn pending_requests(db: &Database, user_id: Uuid) -> Result<Vec<Friendship>, SocialError> {
    db.with_conn(|conn| -> Result<Vec<Friendship>, SocialError> {
        Ok(queries::pending_for_receiver(conn, &user_id.to_string())?)
    })
}

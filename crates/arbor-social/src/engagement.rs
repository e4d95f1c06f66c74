//! Likes, reactions and comments, plus the engagement score that feeds the
//! trending ranking.
//!
//! Uniqueness of likes and reactions per (post, user) is enforced by the
//! storage constraints, not by a read-then-write check, so two identical
//! concurrent requests cannot both succeed.

use chrono::Utc;
use uuid::Uuid;

use arbor_db::{Database, models, queries};
use arbor_types::models::{Actor, Comment, Like, NotificationKind, Post, Reaction};

use crate::error::SocialError;
use crate::notify::{self, MentionScope};

pub fn like_post(db: &Database, actor: &Actor, post_id: Uuid) -> Result<Like, SocialError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    db.with_tx(|tx| -> Result<(), SocialError> {
        let key = post_id.to_string();
        let post = queries::post_by_id(tx, &key)?.ok_or(SocialError::NotFound("post"))?;

        if let Err(e) = queries::insert_like(
            tx,
            &id.to_string(),
            &key,
            &actor.id.to_string(),
            &models::timestamp(now),
        ) {
            if queries::is_unique_violation(&e) {
                return Err(SocialError::Conflict("post already liked"));
            }
            return Err(e.into());
        }

        if post.user_id != actor.id {
            notify::emit(
                tx,
                NotificationKind::Like,
                post.user_id,
                actor,
                &format!("{} liked your post.", actor.username),
            )?;
        }
        Ok(())
    })?;

    Ok(Like {
        id,
        post_id,
        user_id: actor.id,
        created_at: now,
    })
}

/// Removes the actor's like. No notification on unlike.
pub fn unlike_post(db: &Database, actor: &Actor, post_id: Uuid) -> Result<(), SocialError> {
    db.with_tx(|tx| -> Result<(), SocialError> {
        let key = post_id.to_string();
        queries::post_by_id(tx, &key)?.ok_or(SocialError::NotFound("post"))?;

        let deleted = queries::delete_like(tx, &key, &actor.id.to_string())?;
        if deleted == 0 {
            return Err(SocialError::NotFound("like"));
        }
        Ok(())
    })
}

/// Upsert: reacting again replaces the stored type in place. The post owner
/// is notified on every call, create or change, unless they reacted to their
/// own post.
pub fn react_to_post(
    db: &Database,
    actor: &Actor,
    post_id: Uuid,
    reaction_type: &str,
) -> Result<Reaction, SocialError> {
    db.with_tx(|tx| -> Result<Reaction, SocialError> {
        let key = post_id.to_string();
        let post = queries::post_by_id(tx, &key)?.ok_or(SocialError::NotFound("post"))?;

        queries::upsert_reaction(
            tx,
            &Uuid::new_v4().to_string(),
            &key,
            &actor.id.to_string(),
            reaction_type,
            &models::timestamp(Utc::now()),
        )?;
        let reaction = queries::reaction_for(tx, &key, &actor.id.to_string())?
            .ok_or_else(|| SocialError::Storage(anyhow::anyhow!("reaction missing after upsert")))?;

        if post.user_id != actor.id {
            notify::emit(
                tx,
                NotificationKind::Reaction,
                post.user_id,
                actor,
                &format!("{} reacted {} to your post.", actor.username, reaction_type),
            )?;
        }
        Ok(reaction)
    })
}

pub fn comment_on_post(
    db: &Database,
    actor: &Actor,
    post_id: Uuid,
    content: &str,
) -> Result<Comment, SocialError> {
    if content.trim().is_empty() {
        return Err(SocialError::Validation("content must not be empty"));
    }

    let id = Uuid::new_v4();
    let now = Utc::now();

    db.with_tx(|tx| -> Result<(), SocialError> {
        let key = post_id.to_string();
        let post = queries::post_by_id(tx, &key)?.ok_or(SocialError::NotFound("post"))?;

        queries::insert_comment(
            tx,
            &id.to_string(),
            &key,
            &actor.id.to_string(),
            content,
            &models::timestamp(now),
        )?;

        if post.user_id != actor.id {
            notify::emit(
                tx,
                NotificationKind::Comment,
                post.user_id,
                actor,
                &format!("{} commented on your post.", actor.username),
            )?;
        }
        // A mentioned post owner gets the mention notification as well.
        notify::notify_mentions(tx, actor, content, MentionScope::Comment)?;
        Ok(())
    })?;

    Ok(Comment {
        id,
        post_id,
        user_id: actor.id,
        username: actor.username.clone(),
        content: content.to_string(),
        created_at: now,
    })
}

/// Comments on a post, oldest first.
pub fn post_comments(db: &Database, post_id: Uuid) -> Result<Vec<Comment>, SocialError> {
    db.with_conn(|conn| -> Result<Vec<Comment>, SocialError> {
        let key = post_id.to_string();
        queries::post_by_id(conn, &key)?.ok_or(SocialError::NotFound("post"))?;
        Ok(queries::comments_for_post(conn, &key)?)
    })
}

pub fn post_reactions(db: &Database, post_id: Uuid) -> Result<Vec<Reaction>, SocialError> {
    db.with_conn(|conn| -> Result<Vec<Reaction>, SocialError> {
        let key = post_id.to_string();
        queries::post_by_id(conn, &key)?.ok_or(SocialError::NotFound("post"))?;
        Ok(queries::reactions_for_post(conn, &key)?)
    })
}

/// Likes plus comments. Reactions do not count toward the score.
pub fn engagement_score(post: &Post) -> i64 {
    post.like_count + post.comment_count
}

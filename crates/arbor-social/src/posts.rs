//! Post lifecycle: create, edit, delete, pin, and the feed listings.
//! Creating or editing a post re-derives its hashtag links from the current
//! content and notifies every user mentioned in it.

use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use arbor_db::{Database, models, queries};
use arbor_types::models::{Actor, Post};

use crate::annotate;
use crate::error::SocialError;
use crate::notify::{self, MentionScope};

pub fn create_post(
    db: &Database,
    actor: &Actor,
    content: &str,
    image: Option<&str>,
) -> Result<Post, SocialError> {
    if content.trim().is_empty() {
        return Err(SocialError::Validation("content must not be empty"));
    }

    let id = Uuid::new_v4();
    let now = Utc::now();

    db.with_tx(|tx| -> Result<(), SocialError> {
        queries::insert_post(
            tx,
            &id.to_string(),
            &actor.id.to_string(),
            content,
            image,
            &models::timestamp(now),
        )?;
        attach_hashtags(tx, id, content)?;
        notify::notify_mentions(tx, actor, content, MentionScope::Post)?;
        Ok(())
    })?;

    Ok(Post {
        id,
        user_id: actor.id,
        username: actor.username.clone(),
        content: content.to_string(),
        image: image.map(str::to_string),
        pinned: false,
        like_count: 0,
        comment_count: 0,
        created_at: now,
    })
}

/// Partial edit by the author. Hashtag links are dropped and re-derived from
/// the resulting content, and every user mentioned in it is notified again,
/// including users already mentioned before the edit.
pub fn edit_post(
    db: &Database,
    actor: &Actor,
    post_id: Uuid,
    content: Option<&str>,
    image: Option<&str>,
) -> Result<Post, SocialError> {
    if let Some(c) = content {
        if c.trim().is_empty() {
            return Err(SocialError::Validation("content must not be empty"));
        }
    }

    db.with_tx(|tx| -> Result<Post, SocialError> {
        let key = post_id.to_string();
        let post = queries::post_by_id(tx, &key)?.ok_or(SocialError::NotFound("post"))?;
        if post.user_id != actor.id {
            return Err(SocialError::Forbidden("only the author can edit a post"));
        }

        queries::update_post(tx, &key, content, image)?;
        let updated = queries::post_by_id(tx, &key)?.ok_or(SocialError::NotFound("post"))?;

        queries::clear_post_hashtags(tx, &key)?;
        attach_hashtags(tx, post_id, &updated.content)?;
        notify::notify_mentions(tx, actor, &updated.content, MentionScope::Post)?;

        Ok(updated)
    })
}

/// Author-only delete. Likes, reactions, comments and hashtag links cascade
/// with the post row.
pub fn delete_post(db: &Database, actor: &Actor, post_id: Uuid) -> Result<(), SocialError> {
    db.with_tx(|tx| -> Result<(), SocialError> {
        let key = post_id.to_string();
        let post = queries::post_by_id(tx, &key)?.ok_or(SocialError::NotFound("post"))?;
        if post.user_id != actor.id {
            return Err(SocialError::Forbidden("only the author can delete a post"));
        }
        queries::delete_post(tx, &key)?;
        Ok(())
    })
}

/// Flips the pinned flag and returns the new state. No notification.
pub fn toggle_pin(db: &Database, actor: &Actor, post_id: Uuid) -> Result<bool, SocialError> {
    db.with_tx(|tx| -> Result<bool, SocialError> {
        let key = post_id.to_string();
        let post = queries::post_by_id(tx, &key)?.ok_or(SocialError::NotFound("post"))?;
        if post.user_id != actor.id {
            return Err(SocialError::Forbidden("only the author can pin a post"));
        }
        let pinned = !post.pinned;
        queries::set_post_pinned(tx, &key, pinned)?;
        Ok(pinned)
    })
}

pub fn list_posts(db: &Database) -> Result<Vec<Post>, SocialError> {
    db.with_conn(|conn| -> Result<Vec<Post>, SocialError> { Ok(queries::posts_all(conn)?) })
}

pub fn user_posts(db: &Database, username: &str) -> Result<Vec<Post>, SocialError> {
    db.with_conn(|conn| -> Result<Vec<Post>, SocialError> {
        let user =
            queries::user_by_username(conn, username)?.ok_or(SocialError::NotFound("user"))?;
        Ok(queries::posts_by_user(conn, &user.id)?)
    })
}

/// Lookup is case-insensitive: tags are stored lowercase, so the query tag
/// is lowercased before matching. An unknown tag yields an empty list.
pub fn posts_by_hashtag(db: &Database, tag: &str) -> Result<Vec<Post>, SocialError> {
    let tag = tag.to_lowercase();
    db.with_conn(|conn| -> Result<Vec<Post>, SocialError> {
        Ok(queries::posts_with_tag(conn, &tag)?)
    })
}

/// Substring search over post content. An empty query matches every post.
pub fn search_posts(db: &Database, query: &str) -> Result<Vec<Post>, SocialError> {
    let pattern = format!("%{}%", escape_like(query));
    db.with_conn(|conn| -> Result<Vec<Post>, SocialError> {
        Ok(queries::posts_search(conn, &pattern)?)
    })
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn attach_hashtags(conn: &Connection, post_id: Uuid, content: &str) -> Result<(), SocialError> {
    let key = post_id.to_string();
    for tag in annotate::extract_hashtags(content) {
        let hashtag_id = queries::upsert_hashtag(
            conn,
            &Uuid::new_v4().to_string(),
            &tag,
            &models::timestamp(Utc::now()),
        )?;
        queries::link_post_hashtag(conn, &key, &hashtag_id)?;
    }
    Ok(())
}

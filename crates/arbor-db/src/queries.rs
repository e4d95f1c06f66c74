use rusqlite::{Connection, OptionalExtension, params};

use arbor_types::models::{
    Comment, FriendRef, Friendship, FriendshipStatus, Message, Notification, NotificationKind,
    Post, Profile, Reaction,
};

use crate::Database;
use crate::models::{UserRow, parse_id, parse_ts};

impl Database {
    // -- Users (the auth collaborator's surface) --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
        created_at: &str,
    ) -> anyhow::Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![id, username, password_hash, created_at],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> anyhow::Result<Option<UserRow>> {
        self.with_conn(|conn| Ok(user_by_username(conn, username)?))
    }
}

/// True when an INSERT lost to a UNIQUE or PRIMARY KEY constraint, the
/// storage-level arbiter behind every check-then-create operation.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Same check for errors that crossed an anyhow boundary.
pub fn is_unique_violation_anyhow(e: &anyhow::Error) -> bool {
    e.downcast_ref::<rusqlite::Error>()
        .is_some_and(is_unique_violation)
}

fn decode_status(idx: usize, raw: String) -> rusqlite::Result<FriendshipStatus> {
    FriendshipStatus::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown friendship status '{raw}'").into(),
        )
    })
}

fn decode_kind(idx: usize, raw: String) -> rusqlite::Result<NotificationKind> {
    NotificationKind::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown notification type '{raw}'").into(),
        )
    })
}

// -- Users --

pub fn user_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<UserRow>> {
    conn.prepare("SELECT id, username, password, email, created_at FROM users WHERE username = ?1")?
        .query_row([username], map_user)
        .optional()
}

pub fn user_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<UserRow>> {
    conn.prepare("SELECT id, username, password, email, created_at FROM users WHERE id = ?1")?
        .query_row([id], map_user)
        .optional()
}

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        email: row.get(3)?,
        created_at: row.get(4)?,
    })
}

// -- Profiles --

const PROFILE_SELECT: &str = "
    SELECT p.id, p.user_id, u.username, u.email, p.bio, p.avatar, p.created_at
    FROM profiles p
    JOIN users u ON u.id = p.user_id";

fn map_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: parse_id(&row.get::<_, String>(0)?),
        user_id: parse_id(&row.get::<_, String>(1)?),
        username: row.get(2)?,
        email: row.get(3)?,
        bio: row.get(4)?,
        avatar: row.get(5)?,
        created_at: parse_ts(&row.get::<_, String>(6)?),
    })
}

pub fn insert_profile(
    conn: &Connection,
    id: &str,
    user_id: &str,
    bio: &str,
    avatar: Option<&str>,
    created_at: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO profiles (id, user_id, bio, avatar, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, user_id, bio, avatar, created_at],
    )?;
    Ok(())
}

pub fn update_profile(
    conn: &Connection,
    user_id: &str,
    bio: Option<&str>,
    avatar: Option<&str>,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE profiles SET bio = COALESCE(?2, bio), avatar = COALESCE(?3, avatar)
         WHERE user_id = ?1",
        params![user_id, bio, avatar],
    )
}

pub fn profile_by_user(conn: &Connection, user_id: &str) -> rusqlite::Result<Option<Profile>> {
    conn.prepare(&format!("{PROFILE_SELECT} WHERE p.user_id = ?1"))?
        .query_row([user_id], map_profile)
        .optional()
}

pub fn profile_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<Profile>> {
    conn.prepare(&format!("{PROFILE_SELECT} WHERE u.username = ?1"))?
        .query_row([username], map_profile)
        .optional()
}

pub fn profiles_page(conn: &Connection, limit: u32, offset: u32) -> rusqlite::Result<Vec<Profile>> {
    conn.prepare(&format!(
        "{PROFILE_SELECT} ORDER BY p.rowid ASC LIMIT ?1 OFFSET ?2"
    ))?
    .query_map(params![limit, offset], map_profile)?
    .collect()
}

// -- Posts --

// Posts always come back with their author's username and the derived
// engagement counts, one query per listing (no N+1).
const POST_SELECT: &str = "
    SELECT p.id, p.user_id, u.username, p.content, p.image, p.pinned,
           (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
           p.created_at
    FROM posts p
    JOIN users u ON u.id = p.user_id";

fn map_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: parse_id(&row.get::<_, String>(0)?),
        user_id: parse_id(&row.get::<_, String>(1)?),
        username: row.get(2)?,
        content: row.get(3)?,
        image: row.get(4)?,
        pinned: row.get(5)?,
        like_count: row.get(6)?,
        comment_count: row.get(7)?,
        created_at: parse_ts(&row.get::<_, String>(8)?),
    })
}

pub fn insert_post(
    conn: &Connection,
    id: &str,
    user_id: &str,
    content: &str,
    image: Option<&str>,
    created_at: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO posts (id, user_id, content, image, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, user_id, content, image, created_at],
    )?;
    Ok(())
}

pub fn post_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<Post>> {
    conn.prepare(&format!("{POST_SELECT} WHERE p.id = ?1"))?
        .query_row([id], map_post)
        .optional()
}

/// Partial update: a None field keeps the stored value.
pub fn update_post(
    conn: &Connection,
    id: &str,
    content: Option<&str>,
    image: Option<&str>,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE posts SET content = COALESCE(?2, content), image = COALESCE(?3, image)
         WHERE id = ?1",
        params![id, content, image],
    )
}

pub fn set_post_pinned(conn: &Connection, id: &str, pinned: bool) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE posts SET pinned = ?2 WHERE id = ?1",
        params![id, pinned],
    )
}

pub fn delete_post(conn: &Connection, id: &str) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM posts WHERE id = ?1", [id])
}

pub fn posts_all(conn: &Connection) -> rusqlite::Result<Vec<Post>> {
    conn.prepare(&format!(
        "{POST_SELECT} ORDER BY p.created_at DESC, p.rowid DESC"
    ))?
    .query_map([], map_post)?
    .collect()
}

pub fn posts_by_user(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<Post>> {
    conn.prepare(&format!(
        "{POST_SELECT} WHERE p.user_id = ?1 ORDER BY p.created_at DESC, p.rowid DESC"
    ))?
    .query_map([user_id], map_post)?
    .collect()
}

/// Substring search over content; the caller builds the LIKE pattern with
/// `%`, `_` and `\` escaped.
pub fn posts_search(conn: &Connection, pattern: &str) -> rusqlite::Result<Vec<Post>> {
    conn.prepare(&format!(
        "{POST_SELECT} WHERE p.content LIKE ?1 ESCAPE '\\'
         ORDER BY p.created_at DESC, p.rowid DESC"
    ))?
    .query_map([pattern], map_post)?
    .collect()
}

pub fn posts_with_tag(conn: &Connection, tag: &str) -> rusqlite::Result<Vec<Post>> {
    conn.prepare(&format!(
        "{POST_SELECT}
         JOIN post_hashtags ph ON ph.post_id = p.id
         JOIN hashtags h ON h.id = ph.hashtag_id
         WHERE h.tag = ?1
         ORDER BY p.created_at DESC, p.rowid DESC"
    ))?
    .query_map([tag], map_post)?
    .collect()
}

/// Recent posts in insertion order, the trending ranker's input set.
pub fn posts_since(conn: &Connection, cutoff: &str) -> rusqlite::Result<Vec<Post>> {
    conn.prepare(&format!(
        "{POST_SELECT} WHERE p.created_at >= ?1 ORDER BY p.rowid ASC"
    ))?
    .query_map([cutoff], map_post)?
    .collect()
}

// -- Hashtags --

/// Get-or-create by normalized tag; returns the id of the surviving row.
pub fn upsert_hashtag(
    conn: &Connection,
    id: &str,
    tag: &str,
    created_at: &str,
) -> rusqlite::Result<String> {
    conn.execute(
        "INSERT OR IGNORE INTO hashtags (id, tag, created_at) VALUES (?1, ?2, ?3)",
        params![id, tag, created_at],
    )?;
    conn.query_row("SELECT id FROM hashtags WHERE tag = ?1", [tag], |row| {
        row.get(0)
    })
}

pub fn link_post_hashtag(
    conn: &Connection,
    post_id: &str,
    hashtag_id: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO post_hashtags (post_id, hashtag_id) VALUES (?1, ?2)",
        params![post_id, hashtag_id],
    )?;
    Ok(())
}

pub fn clear_post_hashtags(conn: &Connection, post_id: &str) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM post_hashtags WHERE post_id = ?1", [post_id])
}

// -- Friendships --

const FRIENDSHIP_SELECT: &str = "
    SELECT f.id, f.sender_id, su.username, f.receiver_id, ru.username, f.status, f.created_at
    FROM friendships f
    JOIN users su ON su.id = f.sender_id
    JOIN users ru ON ru.id = f.receiver_id";

fn map_friendship(row: &rusqlite::Row<'_>) -> rusqlite::Result<Friendship> {
    Ok(Friendship {
        id: parse_id(&row.get::<_, String>(0)?),
        sender_id: parse_id(&row.get::<_, String>(1)?),
        sender_username: row.get(2)?,
        receiver_id: parse_id(&row.get::<_, String>(3)?),
        receiver_username: row.get(4)?,
        status: decode_status(5, row.get(5)?)?,
        created_at: parse_ts(&row.get::<_, String>(6)?),
    })
}

pub fn insert_friendship(
    conn: &Connection,
    id: &str,
    sender_id: &str,
    receiver_id: &str,
    status: FriendshipStatus,
    created_at: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO friendships (id, sender_id, receiver_id, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, sender_id, receiver_id, status.as_str(), created_at],
    )?;
    Ok(())
}

/// The row only the addressed receiver may answer.
pub fn friendship_for_receiver(
    conn: &Connection,
    id: &str,
    receiver_id: &str,
) -> rusqlite::Result<Option<Friendship>> {
    conn.prepare(&format!(
        "{FRIENDSHIP_SELECT} WHERE f.id = ?1 AND f.receiver_id = ?2"
    ))?
    .query_row(params![id, receiver_id], map_friendship)
    .optional()
}

pub fn set_friendship_status(
    conn: &Connection,
    id: &str,
    status: FriendshipStatus,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE friendships SET status = ?2 WHERE id = ?1",
        params![id, status.as_str()],
    )
}

pub fn pending_for_receiver(
    conn: &Connection,
    receiver_id: &str,
) -> rusqlite::Result<Vec<Friendship>> {
    conn.prepare(&format!(
        "{FRIENDSHIP_SELECT} WHERE f.receiver_id = ?1 AND f.status = 'pending'
         ORDER BY f.created_at ASC, f.rowid ASC"
    ))?
    .query_map([receiver_id], map_friendship)?
    .collect()
}

/// Everyone connected to `user_id` through an accepted friendship, either
/// direction, in insertion order. May repeat a user when both directions
/// were accepted; the caller deduplicates.
pub fn accepted_friends_of(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<FriendRef>> {
    conn.prepare(
        "SELECT CASE WHEN f.sender_id = ?1 THEN f.receiver_id ELSE f.sender_id END AS friend_id,
                u.username
         FROM friendships f
         JOIN users u
           ON u.id = CASE WHEN f.sender_id = ?1 THEN f.receiver_id ELSE f.sender_id END
         WHERE f.status = 'accepted' AND (f.sender_id = ?1 OR f.receiver_id = ?1)
         ORDER BY f.rowid ASC",
    )?
    .query_map([user_id], |row| {
        Ok(FriendRef {
            id: parse_id(&row.get::<_, String>(0)?),
            username: row.get(1)?,
        })
    })?
    .collect()
}

// -- Likes --

pub fn insert_like(
    conn: &Connection,
    id: &str,
    post_id: &str,
    user_id: &str,
    created_at: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO likes (id, post_id, user_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, post_id, user_id, created_at],
    )?;
    Ok(())
}

pub fn delete_like(conn: &Connection, post_id: &str, user_id: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM likes WHERE post_id = ?1 AND user_id = ?2",
        params![post_id, user_id],
    )
}

// -- Reactions --

/// Atomic upsert on (post_id, user_id): a second reaction replaces the type
/// in place, keeping the first row's id and created_at.
pub fn upsert_reaction(
    conn: &Connection,
    id: &str,
    post_id: &str,
    user_id: &str,
    reaction_type: &str,
    created_at: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO reactions (id, post_id, user_id, reaction_type, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(post_id, user_id) DO UPDATE SET reaction_type = excluded.reaction_type",
        params![id, post_id, user_id, reaction_type, created_at],
    )?;
    Ok(())
}

fn map_reaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reaction> {
    Ok(Reaction {
        id: parse_id(&row.get::<_, String>(0)?),
        post_id: parse_id(&row.get::<_, String>(1)?),
        user_id: parse_id(&row.get::<_, String>(2)?),
        reaction_type: row.get(3)?,
        created_at: parse_ts(&row.get::<_, String>(4)?),
    })
}

pub fn reaction_for(
    conn: &Connection,
    post_id: &str,
    user_id: &str,
) -> rusqlite::Result<Option<Reaction>> {
    conn.prepare(
        "SELECT id, post_id, user_id, reaction_type, created_at FROM reactions
         WHERE post_id = ?1 AND user_id = ?2",
    )?
    .query_row(params![post_id, user_id], map_reaction)
    .optional()
}

pub fn reactions_for_post(conn: &Connection, post_id: &str) -> rusqlite::Result<Vec<Reaction>> {
    conn.prepare(
        "SELECT id, post_id, user_id, reaction_type, created_at FROM reactions
         WHERE post_id = ?1 ORDER BY rowid ASC",
    )?
    .query_map([post_id], map_reaction)?
    .collect()
}

// -- Comments --

pub fn insert_comment(
    conn: &Connection,
    id: &str,
    post_id: &str,
    user_id: &str,
    content: &str,
    created_at: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO comments (id, post_id, user_id, content, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, post_id, user_id, content, created_at],
    )?;
    Ok(())
}

pub fn comments_for_post(conn: &Connection, post_id: &str) -> rusqlite::Result<Vec<Comment>> {
    conn.prepare(
        "SELECT c.id, c.post_id, c.user_id, u.username, c.content, c.created_at
         FROM comments c
         JOIN users u ON u.id = c.user_id
         WHERE c.post_id = ?1
         ORDER BY c.created_at ASC, c.rowid ASC",
    )?
    .query_map([post_id], |row| {
        Ok(Comment {
            id: parse_id(&row.get::<_, String>(0)?),
            post_id: parse_id(&row.get::<_, String>(1)?),
            user_id: parse_id(&row.get::<_, String>(2)?),
            username: row.get(3)?,
            content: row.get(4)?,
            created_at: parse_ts(&row.get::<_, String>(5)?),
        })
    })?
    .collect()
}

// -- Notifications --

pub fn insert_notification(
    conn: &Connection,
    id: &str,
    kind: NotificationKind,
    to_user_id: &str,
    from_user_id: Option<&str>,
    message: &str,
    created_at: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO notifications (id, notification_type, to_user_id, from_user_id, message, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, kind.as_str(), to_user_id, from_user_id, message, created_at],
    )?;
    Ok(())
}

pub fn notifications_for(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<Notification>> {
    conn.prepare(
        "SELECT n.id, n.notification_type, n.to_user_id, n.from_user_id, u.username,
                n.message, n.is_read, n.created_at
         FROM notifications n
         LEFT JOIN users u ON u.id = n.from_user_id
         WHERE n.to_user_id = ?1
         ORDER BY n.created_at DESC, n.rowid DESC",
    )?
    .query_map([user_id], |row| {
        Ok(Notification {
            id: parse_id(&row.get::<_, String>(0)?),
            notification_type: decode_kind(1, row.get(1)?)?,
            to_user_id: parse_id(&row.get::<_, String>(2)?),
            from_user_id: row.get::<_, Option<String>>(3)?.as_deref().map(parse_id),
            from_username: row.get(4)?,
            message: row.get(5)?,
            is_read: row.get(6)?,
            created_at: parse_ts(&row.get::<_, String>(7)?),
        })
    })?
    .collect()
}

/// Scoped to the owner: marking someone else's notification matches nothing.
pub fn mark_notification_read(
    conn: &Connection,
    id: &str,
    to_user_id: &str,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND to_user_id = ?2",
        params![id, to_user_id],
    )
}

// -- Messages --

pub fn insert_message(
    conn: &Connection,
    id: &str,
    sender_id: &str,
    receiver_id: &str,
    content: &str,
    created_at: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO messages (id, sender_id, receiver_id, content, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, sender_id, receiver_id, content, created_at],
    )?;
    Ok(())
}

pub fn messages_between(
    conn: &Connection,
    user_id: &str,
    other_id: &str,
) -> rusqlite::Result<Vec<Message>> {
    conn.prepare(
        "SELECT m.id, m.sender_id, su.username, m.receiver_id, ru.username, m.content, m.created_at
         FROM messages m
         JOIN users su ON su.id = m.sender_id
         JOIN users ru ON ru.id = m.receiver_id
         WHERE (m.sender_id = ?1 AND m.receiver_id = ?2)
            OR (m.sender_id = ?2 AND m.receiver_id = ?1)
         ORDER BY m.created_at ASC, m.rowid ASC",
    )?
    .query_map(params![user_id, other_id], |row| {
        Ok(Message {
            id: parse_id(&row.get::<_, String>(0)?),
            sender_id: parse_id(&row.get::<_, String>(1)?),
            sender_username: row.get(2)?,
            receiver_id: parse_id(&row.get::<_, String>(3)?),
            receiver_username: row.get(4)?,
            content: row.get(5)?,
            created_at: parse_ts(&row.get::<_, String>(6)?),
        })
    })?
    .collect()
}

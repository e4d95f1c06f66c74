use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            email       TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS profiles (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL UNIQUE REFERENCES users(id),
            bio         TEXT NOT NULL DEFAULT '',
            avatar      TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS posts (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id),
            content     TEXT NOT NULL,
            image       TEXT,
            pinned      INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_posts_created
            ON posts(created_at);
        CREATE INDEX IF NOT EXISTS idx_posts_user
            ON posts(user_id, created_at);

        CREATE TABLE IF NOT EXISTS hashtags (
            id          TEXT PRIMARY KEY,
            tag         TEXT NOT NULL UNIQUE,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS post_hashtags (
            post_id     TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            hashtag_id  TEXT NOT NULL REFERENCES hashtags(id),
            PRIMARY KEY (post_id, hashtag_id)
        );

        CREATE INDEX IF NOT EXISTS idx_post_hashtags_tag
            ON post_hashtags(hashtag_id);

        -- UNIQUE(sender_id, receiver_id) is the arbiter for duplicate
        -- requests: one row per ordered pair, whatever its status.
        CREATE TABLE IF NOT EXISTS friendships (
            id          TEXT PRIMARY KEY,
            sender_id   TEXT NOT NULL REFERENCES users(id),
            receiver_id TEXT NOT NULL REFERENCES users(id),
            status      TEXT NOT NULL DEFAULT 'pending',
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(sender_id, receiver_id)
        );

        CREATE INDEX IF NOT EXISTS idx_friendships_receiver
            ON friendships(receiver_id, status);

        CREATE TABLE IF NOT EXISTS likes (
            id          TEXT PRIMARY KEY,
            post_id     TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            user_id     TEXT NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(post_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS reactions (
            id            TEXT PRIMARY KEY,
            post_id       TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            user_id       TEXT NOT NULL REFERENCES users(id),
            reaction_type TEXT NOT NULL,
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(post_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS comments (
            id          TEXT PRIMARY KEY,
            post_id     TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            user_id     TEXT NOT NULL REFERENCES users(id),
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_comments_post
            ON comments(post_id, created_at);

        CREATE TABLE IF NOT EXISTS notifications (
            id                TEXT PRIMARY KEY,
            notification_type TEXT NOT NULL,
            to_user_id        TEXT NOT NULL REFERENCES users(id),
            from_user_id      TEXT REFERENCES users(id),
            message           TEXT NOT NULL,
            is_read           INTEGER NOT NULL DEFAULT 0,
            created_at        TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_notifications_to
            ON notifications(to_user_id, created_at);

        CREATE TABLE IF NOT EXISTS messages (
            id          TEXT PRIMARY KEY,
            sender_id   TEXT NOT NULL REFERENCES users(id),
            receiver_id TEXT NOT NULL REFERENCES users(id),
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_messages_pair
            ON messages(sender_id, receiver_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated caller of a core operation. Built from verified JWT
/// claims by the HTTP layer and passed explicitly to every operation; there
/// is no ambient current-user state.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: String,
    /// Opaque media reference resolved by the storage collaborator.
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Posts always carry their author's username and the derived engagement
/// counts so list endpoints stay single-query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    /// Opaque media reference resolved by the storage collaborator.
    pub image: Option<String>,
    pub pinned: bool,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Declined,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }
}

/// A directional friend request: created by the sender, answered by the
/// receiver, symmetric for listing purposes once accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_username: String,
    pub receiver_id: Uuid,
    pub receiver_username: String,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
}

/// The receiver's answer to a pending friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendDecision {
    Accept,
    Decline,
}

/// One entry of a friend list: the party on the other side of an accepted
/// friendship, whichever direction the original request went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRef {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub reaction_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Mention,
    FriendRequest,
    Like,
    Comment,
    Reaction,
    Message,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mention => "mention",
            Self::FriendRequest => "friend_request",
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Reaction => "reaction",
            Self::Message => "message",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mention" => Some(Self::Mention),
            "friend_request" => Some(Self::FriendRequest),
            "like" => Some(Self::Like),
            "comment" => Some(Self::Comment),
            "reaction" => Some(Self::Reaction),
            "message" => Some(Self::Message),
            _ => None,
        }
    }
}

/// Created only by the emitter, unread by default; the only mutation is the
/// owner flipping `is_read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub notification_type: NotificationKind,
    pub to_user_id: Uuid,
    pub from_user_id: Option<Uuid>,
    pub from_username: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_username: String,
    pub receiver_id: Uuid,
    pub receiver_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::FriendDecision;

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Posts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePostRequest {
    pub content: String,
    pub image: Option<String>,
}

/// Partial update: an absent field leaves the stored value unchanged.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditPostRequest {
    pub content: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

// -- Engagement --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReactRequest {
    #[serde(default = "default_reaction_type")]
    pub reaction_type: String,
}

fn default_reaction_type() -> String {
    "like".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentRequest {
    pub content: String,
}

// -- Friendships --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendFriendRequest {
    pub receiver_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RespondFriendRequest {
    pub decision: FriendDecision,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    pub content: String,
}

// -- Profiles --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub bio: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

// -- Pagination --

/// Page window for the listings that paginate (profiles, friends).
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_page_limit() -> u32 {
    10
}

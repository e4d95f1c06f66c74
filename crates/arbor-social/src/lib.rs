//! Social graph and engagement core: friendships, posts, likes, reactions,
//! comments, hashtags, mentions, the notification stream, trending ranking
//! and direct messages.
//!
//! Every operation takes the authenticated [`Actor`] explicitly; there is no
//! ambient current-user state. HTTP and auth plumbing live in `arbor-api`,
//! storage in `arbor-db`.
//!
//! [`Actor`]: arbor_types::models::Actor

pub mod annotate;
pub mod engagement;
pub mod error;
pub mod friends;
pub mod messages;
pub mod notifications;
mod notify;
pub mod posts;
pub mod profiles;
pub mod trending;

pub use error::SocialError;

//! HTTP handlers for the arbor server: auth endpoints that issue JWTs, and
//! thin wrappers that turn verified claims into an `Actor` and call into
//! `arbor-social` on a blocking task.

pub mod auth;
pub mod engagement;
pub mod error;
pub mod friends;
pub mod messages;
pub mod middleware;
pub mod notifications;
pub mod posts;
pub mod profiles;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;

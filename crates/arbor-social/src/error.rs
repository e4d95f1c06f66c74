use thiserror::Error;

/// Failure modes of the social operations. Every variant is reported to the
/// caller synchronously; nothing here is retried or fatal to the process.
#[derive(Debug, Error)]
pub enum SocialError {
    /// A referenced entity does not exist (post, user, like, friend request).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The actor is not the owner of the entity they tried to mutate.
    #[error("{0}")]
    Forbidden(&'static str),

    /// A uniqueness invariant was violated (duplicate like, reaction row,
    /// friend request, profile).
    #[error("{0}")]
    Conflict(&'static str),

    /// A state-machine transition was attempted from the wrong source state.
    #[error("{0}")]
    InvalidState(&'static str),

    /// A request field failed validation.
    #[error("{0}")]
    Validation(&'static str),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for SocialError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.into())
    }
}

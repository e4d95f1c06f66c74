//! Trending: recent posts ranked by engagement.

use chrono::{DateTime, Duration, Utc};

use arbor_db::{Database, models, queries};
use arbor_types::models::Post;

use crate::engagement::engagement_score;
use crate::error::SocialError;

/// Posts created within the 24 hours before `now`, highest engagement score
/// first. The sort is stable, so equally scored posts keep their insertion
/// order. Not paginated.
pub fn trending_posts(db: &Database, now: DateTime<Utc>) -> Result<Vec<Post>, SocialError> {
    let cutoff = models::timestamp(now - Duration::hours(24));

    let mut posts = db.with_conn(|conn| -> Result<Vec<Post>, SocialError> {
        Ok(queries::posts_since(conn, &cutoff)?)
    })?;

    posts.sort_by(|a, b| engagement_score(b).cmp(&engagement_score(a)));
    Ok(posts)
}

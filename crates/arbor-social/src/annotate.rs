//! Hashtag and mention detection in post and comment text.
//!
//! Hashtags are `#word` tokens normalized to lowercase so "#Rust" and
//! "#rust" name the same tag. Mentions are `@word` tokens kept verbatim;
//! resolution against real usernames is exact and happens at the caller.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

// Compile regexes once.
static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\w+)").unwrap());
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@(\w+)").unwrap());

/// Distinct lowercase hashtags in `text`, in deterministic order.
pub fn extract_hashtags(text: &str) -> BTreeSet<String> {
    HASHTAG_RE
        .captures_iter(text)
        .map(|cap| cap[1].to_lowercase())
        .collect()
}

/// Distinct mention handles in `text`, case preserved.
pub fn extract_mentions(text: &str) -> BTreeSet<String> {
    MENTION_RE
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

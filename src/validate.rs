// Boundary-layer input sanitization.
//
// Everything here runs before records reach the classification core, so
// the core never needs defensive lookups. Strict mode rejects a batch on
// the first offending record; lenient mode drops offenders with a logged,
// index-qualified message and keeps the rest.

use std::sync::OnceLock;

use regex_lite::Regex;
use thiserror::Error;
use tracing::warn;

use crate::model::RawAccountRecord;

/// Instagram username shape: 1-30 chars, letters, digits, periods,
/// underscores (checked after normalization, so already lowercase).
fn username_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9._]{1,30}$").expect("hardcoded pattern"))
}

pub const MAX_QUERY_LENGTH: usize = 500;
pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_BIO_LENGTH: usize = 500;
pub const MAX_BATCH_ACCOUNTS: usize = 100;

/// Path slugs that show up in scraped exports but aren't usernames.
const RESERVED_SLUGS: &[&str] = &[
    "accounts", "about", "explore", "developer", "developers", "legal", "directory",
    "subscriptions", "privacy", "terms", "blog", "press", "api", "p", "stories",
    "reels", "reel", "tv", "igtv", "challenge", "session", "ads", "help", "meta",
    "web", "oauth", "graphql", "notifications", "accountscenter", "download",
    "locations", "emails", "n", "policies",
];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("record at index {index}: {message}")]
    InvalidRecord { index: usize, message: String },
    #[error("query string is required")]
    EmptyQuery,
    #[error("at least one account is required")]
    EmptyBatch,
    #[error("too many accounts: {count} (maximum {MAX_BATCH_ACCOUNTS})")]
    BatchTooLarge { count: usize },
}

/// Check a normalized username against the shape pattern and the reserved
/// slug list.
pub fn valid_username(normalized: &str) -> bool {
    !RESERVED_SLUGS.contains(&normalized) && username_pattern().is_match(normalized)
}

/// Strip control characters (keeping newlines and tabs), cap the length,
/// and trim. Returns None when nothing survives.
pub fn sanitize_string(value: &str, max_length: usize) -> Option<String> {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .take(max_length)
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Validate a batch of raw records.
///
/// Strict mode: the first malformed record aborts the batch with an
/// index-qualified error. Lenient mode: malformed records are dropped with
/// a warning and the survivors are returned.
pub fn validate_records(
    records: &[RawAccountRecord],
    strict: bool,
) -> Result<Vec<RawAccountRecord>, ValidationError> {
    let mut validated = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        match validate_record(record) {
            Ok(clean) => validated.push(clean),
            Err(message) => {
                if strict {
                    return Err(ValidationError::InvalidRecord { index, message });
                }
                warn!(index, message = %message, "Dropping invalid record");
            }
        }
    }

    Ok(validated)
}

/// Validate a batch submitted to the classification API surface: size
/// limits apply on top of per-record validation, and the whole batch is
/// strict.
pub fn validate_batch(
    records: &[RawAccountRecord],
) -> Result<Vec<RawAccountRecord>, ValidationError> {
    if records.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    if records.len() > MAX_BATCH_ACCOUNTS {
        return Err(ValidationError::BatchTooLarge {
            count: records.len(),
        });
    }
    validate_records(records, true)
}

fn validate_record(record: &RawAccountRecord) -> Result<RawAccountRecord, String> {
    let normalized = crate::classify::normalize::normalize(&record.username);
    if normalized.is_empty() {
        return Err("missing username".to_string());
    }
    if !valid_username(&normalized) {
        return Err(format!("invalid username: {}", record.username));
    }

    Ok(RawAccountRecord {
        username: normalized,
        full_name: record
            .full_name
            .as_deref()
            .and_then(|name| sanitize_string(name, MAX_NAME_LENGTH)),
        bio: record
            .bio
            .as_deref()
            .and_then(|bio| sanitize_string(bio, MAX_BIO_LENGTH)),
        followers_count: record.followers_count,
        following_count: record.following_count,
        relationship_timestamp: record.relationship_timestamp,
    })
}

/// Validate and sanitize a natural-language query string.
pub fn validate_query(query: &str) -> Result<String, ValidationError> {
    sanitize_string(query, MAX_QUERY_LENGTH).ok_or(ValidationError::EmptyQuery)
}

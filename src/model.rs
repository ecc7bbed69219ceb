// Core data model — the types that flow through the classification pipeline.
//
// Three separate taxonomies live here and must not be conflated:
// Bucket is the relationship category (mutually exclusive, set-derived),
// Tag is the heuristic descriptive label (non-exclusive), and Segment is
// the classifier output that drives unfollow-suggestion scoring.

use serde::{Deserialize, Serialize};

/// Relationship category derived from set membership. Exactly one per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// You follow them, they don't follow back
    Unfollower,
    /// They follow you, you don't follow back
    Fan,
    /// Both directions hold
    Mutual,
    /// Neither direction holds — defensive arm, unreachable when the
    /// account map is built from the union of both lists
    Unknown,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::Unfollower,
        Bucket::Fan,
        Bucket::Mutual,
        Bucket::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Unfollower => "unfollowers",
            Bucket::Fan => "fans",
            Bucket::Mutual => "mutuals",
            Bucket::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Heuristic descriptive label. An account may carry several; `Other` is the
/// guaranteed default when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Brand,
    Sports,
    Celebrity,
    Creator,
    Other,
}

impl Tag {
    pub const ALL: [Tag; 5] = [
        Tag::Brand,
        Tag::Sports,
        Tag::Celebrity,
        Tag::Creator,
        Tag::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Brand => "brand",
            Tag::Sports => "sports",
            Tag::Celebrity => "celebrity",
            Tag::Creator => "creator",
            Tag::Other => "other",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifier segment used for unfollow-suggestion ranking. Mutually
/// exclusive — one per enriched account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Celebrity,
    Creator,
    Brand,
    Friend,
    Spam,
    Unknown,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Celebrity => "celebrity",
            Segment::Creator => "creator",
            Segment::Brand => "brand",
            Segment::Friend => "friend",
            Segment::Spam => "spam",
            Segment::Unknown => "unknown",
        }
    }

    /// Parse the string form used by the classification service. Returns
    /// None for unrecognized values so the caller can treat the entry as
    /// malformed rather than silently inventing a segment.
    pub fn parse(s: &str) -> Option<Segment> {
        match s.trim().to_lowercase().as_str() {
            "celebrity" => Some(Segment::Celebrity),
            "creator" => Some(Segment::Creator),
            "brand" => Some(Segment::Brand),
            "friend" => Some(Segment::Friend),
            "spam" => Some(Segment::Spam),
            "unknown" => Some(Segment::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw account record handed in by the file-parsing layer. Immutable once
/// it crosses into the core; validated at the boundary (see `validate`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAccountRecord {
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub followers_count: Option<u64>,
    #[serde(default)]
    pub following_count: Option<u64>,
    /// Unix seconds from the following export ("when you followed them")
    #[serde(default)]
    pub relationship_timestamp: Option<i64>,
}

impl RawAccountRecord {
    /// Convenience constructor for a record that only carries a handle.
    pub fn from_handle(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }
}

/// The canonical unit produced by the pipeline. Created at bucketing time,
/// one per unique normalized identity; enriched in place by the tagger,
/// resolver, and scorer; discarded at the end of the request.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Normalized handle — the join key across both lists
    pub identity: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub relationship_timestamp: Option<i64>,
    pub bucket: Bucket,
    /// Discovery-ordered; contains at least `Other` after tagging
    pub tags: Vec<Tag>,
    /// Set only by the enrichment path; `suggestion_score` is Some iff this is
    pub segment: Option<Segment>,
    pub suggestion_score: Option<f64>,
    /// Human-readable explanations, in the order they were produced
    pub reasons: Vec<String>,
}

impl Account {
    pub fn is_unfollower(&self) -> bool {
        self.bucket == Bucket::Unfollower
    }
}

/// Serialized per-account view for rendering and the batch-classification
/// API surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub username: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub non_follower: bool,
    pub segment: Option<String>,
    pub suggestion_score: Option<f64>,
    pub explanations: Vec<String>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            username: account.identity.clone(),
            full_name: account.display_name.clone(),
            bio: account.bio.clone(),
            followers_count: account.followers_count,
            following_count: account.following_count,
            non_follower: account.is_unfollower(),
            segment: account.segment.map(|s| s.as_str().to_string()),
            suggestion_score: account.suggestion_score,
            explanations: account.reasons.clone(),
        }
    }
}

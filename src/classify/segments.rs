// Phase-1 segment heuristics — a deterministic rule cascade.
//
// Rules are evaluated in fixed priority order and the first one that fires
// wins; rules never combine. Accounts no rule can decide return None and
// are deferred to the external classifier (Phase 2, see resolver).

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::model::{Account, Segment};

/// Follower count above which an account is presumed famous.
const HIGH_FOLLOWER_THRESHOLD: u64 = 100_000;

/// Conservative ceilings for the "real person" rule.
const FRIEND_MAX_FOLLOWERS: u64 = 5_000;
const FRIEND_MAX_FOLLOWING: u64 = 2_000;

const CELEBRITY_KEYWORDS: &[&str] = &[
    "verified", "official", "actor", "actress", "singer", "musician", "artist",
    "celebrity", "star", "famous", "award", "grammy", "oscar", "emmy",
];

const BRAND_KEYWORDS: &[&str] = &[
    "shop", "store", "brand", "company", "business", "official", "inc",
    "llc", "corp", "limited", "fashion", "clothing", "beauty", "tech",
    "startup", "agency", "marketing", "sales", "buy", "order", "discount",
];

const CREATOR_KEYWORDS: &[&str] = &[
    "influencer", "blogger", "youtuber", "content", "creator", "fitness",
    "coach", "trainer", "photographer", "artist", "designer", "travel",
    "food", "lifestyle", "fashion", "beauty", "tech", "gaming",
];

const SPAM_KEYWORDS: &[&str] = &[
    "follow for follow", "f4f", "followback", "follow4follow", "dm for",
    "crypto", "bitcoin", "forex", "trading", "investment", "money",
    "rich", "millionaire", "entrepreneur", "business opportunity",
    "make money", "earn money", "giveaway", "free money", "cash app",
];

/// Two whitespace-separated word tokens, e.g. "Jane Smith".
fn real_person_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\w+\s+\w+$").expect("hardcoded pattern"))
}

/// A segment decision with its confidence and explanations.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDecision {
    pub segment: Segment,
    pub confidence: f64,
    pub reasons: Vec<String>,
}

impl SegmentDecision {
    pub fn new(segment: Segment, confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            segment,
            confidence,
            reasons: vec![reason.into()],
        }
    }
}

/// Classify an account with local heuristics alone. Returns None when no
/// rule fires — the account is ambiguous and defers to Phase 2. Pure and
/// total; never calls out, never fails.
pub fn classify_heuristic(account: &Account) -> Option<SegmentDecision> {
    let display_name = account.display_name.as_deref().unwrap_or("");
    let bio = account.bio.as_deref().unwrap_or("");
    let text = format!(
        "{} {} {}",
        account.identity,
        display_name.to_lowercase(),
        bio.to_lowercase()
    );
    let followers = account.followers_count.unwrap_or(0);
    let following = account.following_count.unwrap_or(0);

    // Rule 1: high follower count suggests celebrity or brand
    if followers > HIGH_FOLLOWER_THRESHOLD {
        if contains_any(&text, CELEBRITY_KEYWORDS) {
            return Some(SegmentDecision::new(
                Segment::Celebrity,
                0.9,
                format!("High follower count ({followers}) with celebrity keywords"),
            ));
        }
        if contains_any(&text, BRAND_KEYWORDS) {
            return Some(SegmentDecision::new(
                Segment::Brand,
                0.9,
                format!("High follower count ({followers}) with brand keywords"),
            ));
        }
        return Some(SegmentDecision::new(
            Segment::Celebrity,
            0.7,
            format!("High follower count ({followers})"),
        ));
    }

    // Rule 2: spam — two or more spam keywords
    let spam_score = count_matches(&text, SPAM_KEYWORDS);
    if spam_score >= 2 {
        return Some(SegmentDecision::new(
            Segment::Spam,
            0.8,
            format!("Multiple spam keywords ({spam_score} found)"),
        ));
    }

    // Rule 3: brand
    let brand_score = count_matches(&text, BRAND_KEYWORDS);
    if brand_score >= 2 {
        return Some(SegmentDecision::new(
            Segment::Brand,
            0.7,
            format!("Multiple brand keywords ({brand_score} found)"),
        ));
    }

    // Rule 4: creator
    let creator_score = count_matches(&text, CREATOR_KEYWORDS);
    if creator_score >= 2 {
        return Some(SegmentDecision::new(
            Segment::Creator,
            0.7,
            format!("Multiple creator keywords ({creator_score} found)"),
        ));
    }

    // Rule 5: real person — small account with a two-token display name
    if followers < FRIEND_MAX_FOLLOWERS
        && following < FRIEND_MAX_FOLLOWING
        && real_person_pattern().is_match(display_name)
    {
        return Some(SegmentDecision::new(
            Segment::Friend,
            0.8,
            "Appears to be real person (low followers, real name pattern)",
        ));
    }

    None
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

fn count_matches(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(*kw)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bucket;

    fn account(
        identity: &str,
        display_name: Option<&str>,
        bio: Option<&str>,
        followers: Option<u64>,
        following: Option<u64>,
    ) -> Account {
        Account {
            identity: identity.to_string(),
            display_name: display_name.map(String::from),
            bio: bio.map(String::from),
            followers_count: followers,
            following_count: following,
            relationship_timestamp: None,
            bucket: Bucket::Unfollower,
            tags: Vec::new(),
            segment: None,
            suggestion_score: None,
            reasons: Vec::new(),
        }
    }

    #[test]
    fn high_followers_with_celebrity_keywords() {
        let acc = account("bigstar", None, Some("Singer and performer"), Some(500_000), None);
        let decision = classify_heuristic(&acc).unwrap();
        assert_eq!(decision.segment, Segment::Celebrity);
        assert!((decision.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn high_followers_with_brand_keywords() {
        let acc = account("megacorp", None, Some("Flagship store, shop the sale"), Some(250_000), None);
        let decision = classify_heuristic(&acc).unwrap();
        assert_eq!(decision.segment, Segment::Brand);
        assert!((decision.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn high_followers_alone_is_low_confidence_celebrity() {
        let acc = account("mystery", None, None, Some(150_000), None);
        let decision = classify_heuristic(&acc).unwrap();
        assert_eq!(decision.segment, Segment::Celebrity);
        assert!((decision.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn spam_requires_two_keyword_matches() {
        let one = account("user1", None, Some("crypto fan"), Some(100), Some(100));
        assert!(classify_heuristic(&one).is_none());

        let two = account("user2", None, Some("crypto and forex signals"), Some(100), Some(100));
        let decision = classify_heuristic(&two).unwrap();
        assert_eq!(decision.segment, Segment::Spam);
        assert!((decision.confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn spam_outranks_brand_when_both_fire() {
        // "trading" + "investment" are spam keywords; "company" + "business"
        // are brand keywords. The cascade checks spam first.
        let acc = account(
            "trader",
            None,
            Some("trading investment company business"),
            Some(100),
            Some(100),
        );
        let decision = classify_heuristic(&acc).unwrap();
        assert_eq!(decision.segment, Segment::Spam);
    }

    #[test]
    fn friend_rule_needs_small_counts_and_real_name() {
        let acc = account("jane.s", Some("Jane Smith"), None, Some(200), Some(50));
        let decision = classify_heuristic(&acc).unwrap();
        assert_eq!(decision.segment, Segment::Friend);
        assert!((decision.confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn friend_rule_rejects_large_accounts() {
        let acc = account("jane.s", Some("Jane Smith"), None, Some(50_000), Some(50));
        assert!(classify_heuristic(&acc).is_none());
    }

    #[test]
    fn friend_rule_rejects_one_token_names() {
        let acc = account("brandless", Some("Mononym"), None, Some(200), Some(50));
        assert!(classify_heuristic(&acc).is_none());
    }

    #[test]
    fn ambiguous_account_defers_to_phase_two() {
        let acc = account("qwxyz", None, None, None, None);
        assert!(classify_heuristic(&acc).is_none());
    }
}

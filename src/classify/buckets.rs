// Relationship bucketing — the guaranteed, deterministic layer.
//
// Every identity in the union of both lists gets exactly one bucket,
// derived purely from set membership. Metadata conflicts between the two
// lists resolve by preferring the following-side record.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::classify::normalize::normalize;
use crate::model::{Account, Bucket, RawAccountRecord};

/// Build one Account per unique normalized identity across both lists.
///
/// Output order is deterministic and is the "original insertion order" that
/// later stable sorts preserve: follower records in input order first, then
/// following-only records in input order. Records whose handle normalizes
/// to the empty string are discarded.
pub fn bucket_relationships(
    followers: &[RawAccountRecord],
    following: &[RawAccountRecord],
) -> Vec<Account> {
    let follower_map = index_by_identity(followers);
    let following_map = index_by_identity(following);

    let follower_set: HashSet<&str> = follower_map.keys().map(String::as_str).collect();
    let following_set: HashSet<&str> = following_map.keys().map(String::as_str).collect();

    debug!(
        followers = follower_set.len(),
        following = following_set.len(),
        "Normalized input lists"
    );

    let mut accounts = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    let ordered_identities = followers
        .iter()
        .chain(following.iter())
        .map(|record| normalize(&record.username))
        .filter(|identity| !identity.is_empty())
        .filter(|identity| seen.insert(identity.clone()));

    for identity in ordered_identities {
        let they_follow_you = follower_set.contains(identity.as_str());
        let you_follow_them = following_set.contains(identity.as_str());

        let (bucket, reason) = match (you_follow_them, they_follow_you) {
            (true, false) => (Bucket::Unfollower, "You follow them, they don't follow back"),
            (false, true) => (Bucket::Fan, "They follow you, you don't follow back"),
            (true, true) => (Bucket::Mutual, "Mutual following relationship"),
            // Unreachable when iterating the union of both lists; kept as a
            // defensive assertion rather than a panic.
            (false, false) => (Bucket::Unknown, "No following relationship detected"),
        };

        // Following-side metadata wins on conflict, follower-side fills gaps
        let primary = following_map.get(identity.as_str());
        let secondary = follower_map.get(identity.as_str());

        accounts.push(Account {
            identity: identity.clone(),
            display_name: pick(primary, secondary, |r| r.full_name.clone()),
            bio: pick(primary, secondary, |r| r.bio.clone()),
            followers_count: pick(primary, secondary, |r| r.followers_count),
            following_count: pick(primary, secondary, |r| r.following_count),
            relationship_timestamp: pick(primary, secondary, |r| r.relationship_timestamp),
            bucket,
            tags: Vec::new(),
            segment: None,
            suggestion_score: None,
            reasons: vec![reason.to_string()],
        });
    }

    info!(
        total = accounts.len(),
        unfollowers = accounts.iter().filter(|a| a.bucket == Bucket::Unfollower).count(),
        fans = accounts.iter().filter(|a| a.bucket == Bucket::Fan).count(),
        mutuals = accounts.iter().filter(|a| a.bucket == Bucket::Mutual).count(),
        "Bucketed accounts"
    );

    accounts
}

/// First record per normalized identity wins; empty identities are dropped.
fn index_by_identity(records: &[RawAccountRecord]) -> HashMap<String, &RawAccountRecord> {
    let mut map: HashMap<String, &RawAccountRecord> = HashMap::new();
    for record in records {
        let identity = normalize(&record.username);
        if !identity.is_empty() {
            map.entry(identity).or_insert(record);
        }
    }
    map
}

fn pick<T>(
    primary: Option<&&RawAccountRecord>,
    secondary: Option<&&RawAccountRecord>,
    field: impl Fn(&RawAccountRecord) -> Option<T>,
) -> Option<T> {
    primary
        .and_then(|r| field(r))
        .or_else(|| secondary.and_then(|r| field(r)))
}

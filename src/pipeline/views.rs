// Presentation views over a classified account set.
//
// Pure functions — each takes the pipeline's output slice and derives a
// view without mutating anything.

use std::collections::BTreeMap;

use crate::model::{Account, Bucket, Tag};

/// Identities that lead with a non-letter collapse into this group, ordered
/// after every letter group.
pub const NON_LETTER_GROUP: &str = "#";

/// The "suggested unfollows" view: accounts whose suggestion score exceeds
/// 0.5, sorted descending by score. The sort is stable, so ties keep the
/// pipeline's insertion order.
pub fn suggested_unfollows(accounts: &[Account]) -> Vec<&Account> {
    let mut suggestions: Vec<&Account> = accounts
        .iter()
        .filter(|account| account.suggestion_score.is_some_and(|score| score > 0.5))
        .collect();

    suggestions.sort_by(|a, b| {
        let score_a = a.suggestion_score.unwrap_or(0.0);
        let score_b = b.suggestion_score.unwrap_or(0.0);
        score_b
            .partial_cmp(&score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    suggestions
}

/// The alphabetical grouped view of unfollower identities: sorted
/// case-insensitively, grouped by first character — letters A–Z each get
/// their own group, everything else merges into one `#` group at the end.
pub fn group_unfollowers(accounts: &[Account]) -> Vec<(String, Vec<String>)> {
    let mut identities: Vec<&str> = accounts
        .iter()
        .filter(|account| account.is_unfollower())
        .map(|account| account.identity.as_str())
        .collect();

    // Identities are already normalized to lowercase; sort directly, with
    // non-letter-leading handles pushed past the letter range.
    identities.sort_by_key(|identity| sort_key(identity));

    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for identity in identities {
        let label = group_label(identity);
        match groups.last_mut() {
            Some((last_label, members)) if *last_label == label => {
                members.push(identity.to_string());
            }
            _ => groups.push((label, vec![identity.to_string()])),
        }
    }

    groups
}

fn group_label(identity: &str) -> String {
    match identity.chars().next() {
        Some(first) if first.is_ascii_alphabetic() => first.to_ascii_uppercase().to_string(),
        _ => NON_LETTER_GROUP.to_string(),
    }
}

fn sort_key(identity: &str) -> (u8, String) {
    let leads_with_letter = identity
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic());
    (u8::from(!leads_with_letter), identity.to_string())
}

/// Counts for every bucket and tag name across a classified set. Every name
/// is present in the map, zero-initialized, so summary displays never have
/// to special-case missing keys.
pub fn category_counts(accounts: &[Account]) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for bucket in Bucket::ALL {
        counts.insert(bucket.as_str(), 0);
    }
    for tag in Tag::ALL {
        counts.insert(tag.as_str(), 0);
    }

    for account in accounts {
        *counts.entry(account.bucket.as_str()).or_insert(0) += 1;
        for tag in &account.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    counts
}

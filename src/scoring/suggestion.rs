// Unfollow-suggestion score formula.
//
// Combines the relationship signal (are they an unfollower), the resolved
// segment, and the follow-ratio signal into a single scalar in [0, 1] used
// to rank candidates. The negative friend weight is intentional: it biases
// the ranking away from suggesting accounts that heuristically look like
// genuine personal connections, even when they don't follow back.

use crate::model::Segment;

/// Configurable weights for the suggestion formula.
pub struct SuggestionWeights {
    /// Base contribution for accounts that don't follow back (default 0.6)
    pub non_follower_base: f64,
    /// Bonus when the account's following/followers ratio exceeds the
    /// threshold (default 0.1)
    pub ratio_bonus: f64,
    /// Following-to-followers ratio above which the bonus applies
    /// (default 2.0) — a weak signal the account follows indiscriminately
    pub ratio_threshold: f64,
}

impl Default for SuggestionWeights {
    fn default() -> Self {
        Self {
            non_follower_base: 0.6,
            ratio_bonus: 0.1,
            ratio_threshold: 2.0,
        }
    }
}

/// Fixed per-segment contribution to the suggestion score.
pub fn segment_weight(segment: Segment) -> f64 {
    match segment {
        Segment::Celebrity => 0.3,
        Segment::Brand => 0.3,
        Segment::Creator => 0.2,
        Segment::Spam => 0.5,
        // Protect real people
        Segment::Friend => -0.7,
        Segment::Unknown => 0.1,
    }
}

/// Compute the suggestion score. Pure function of the four inputs; the
/// result is clamped to [0, 1].
pub fn compute_suggestion_score(
    is_unfollower: bool,
    segment: Segment,
    followers_count: Option<u64>,
    following_count: Option<u64>,
    weights: &SuggestionWeights,
) -> f64 {
    let mut score = if is_unfollower {
        weights.non_follower_base
    } else {
        0.0
    };

    score += segment_weight(segment);

    let followers = followers_count.unwrap_or(0);
    let following = following_count.unwrap_or(0);
    if followers > 0 && following > 0 {
        let ratio = following as f64 / followers as f64;
        if ratio > weights.ratio_threshold {
            score += weights.ratio_bonus;
        }
    }

    score.clamp(0.0, 1.0)
}

// Two-phase segment resolution.
//
// Phase 1 runs the local heuristic cascade over every account. Phase 2
// batches the undecided remainder into a single call to the external
// classifier. The two partitions are kept keyed by original index and
// merged back in original order at the end — no placeholder slots.
//
// No error leaves this module: both failure kinds from the capability
// degrade every pending account to the same deterministic fallback.

use tracing::{info, warn};

use crate::ai::traits::{AccountSummary, ClassifyError, TextClassifier};
use crate::classify::segments::{classify_heuristic, SegmentDecision};
use crate::model::{Account, Segment};

/// The deterministic fallback applied when the external service cannot
/// answer for an account.
fn fallback(reason: &str) -> SegmentDecision {
    SegmentDecision::new(Segment::Unknown, 0.3, reason)
}

/// Resolve a segment for every account, heuristics first, one external
/// batch call for the remainder. Returns one decision per input account,
/// in input order. Infallible by contract: service failures become
/// fallback decisions, never errors.
pub async fn resolve_segments(
    accounts: &[Account],
    classifier: &dyn TextClassifier,
) -> Vec<SegmentDecision> {
    let mut resolved: Vec<(usize, SegmentDecision)> = Vec::new();
    let mut pending: Vec<(usize, AccountSummary)> = Vec::new();

    for (index, account) in accounts.iter().enumerate() {
        match classify_heuristic(account) {
            Some(decision) => resolved.push((index, decision)),
            None => pending.push((index, AccountSummary::from_account(index, account))),
        }
    }

    if !pending.is_empty() {
        info!(
            count = pending.len(),
            "Classifying ambiguous accounts with AI"
        );

        let summaries: Vec<AccountSummary> =
            pending.iter().map(|(_, summary)| summary.clone()).collect();

        match classifier.classify_batch(&summaries).await {
            Ok(classifications) => {
                for (slot, (index, _)) in pending.iter().enumerate() {
                    // The impl guarantees one entry per account; a short
                    // vector here is its bug, degrade rather than panic.
                    let decision = match classifications.get(slot) {
                        Some(c) => SegmentDecision {
                            segment: c.segment,
                            confidence: c.confidence,
                            reasons: c.reasons.clone(),
                        },
                        None => fallback("AI classification failed"),
                    };
                    resolved.push((*index, decision));
                }
            }
            Err(ClassifyError::ServiceUnavailable) => {
                warn!("AI API unavailable, using fallback classification");
                for (index, _) in &pending {
                    resolved.push((*index, fallback("AI unavailable")));
                }
            }
            Err(ClassifyError::ClassificationFailure(message)) => {
                warn!(error = %message, "AI classification failed");
                for (index, _) in &pending {
                    resolved.push((*index, fallback("AI unavailable")));
                }
            }
        }
    }

    resolved.sort_by_key(|(index, _)| *index);
    resolved.into_iter().map(|(_, decision)| decision).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::traits::{FilterSpec, SegmentClassification, UnconfiguredClassifier};
    use crate::model::Bucket;
    use async_trait::async_trait;

    fn account(identity: &str, bio: Option<&str>, followers: Option<u64>) -> Account {
        Account {
            identity: identity.to_string(),
            display_name: None,
            bio: bio.map(String::from),
            followers_count: followers,
            following_count: Some(10),
            relationship_timestamp: None,
            bucket: Bucket::Unfollower,
            tags: Vec::new(),
            segment: None,
            suggestion_score: None,
            reasons: Vec::new(),
        }
    }

    /// Returns a fixed segment for every submitted account.
    struct FixedClassifier(Segment);

    #[async_trait]
    impl TextClassifier for FixedClassifier {
        async fn classify_batch(
            &self,
            accounts: &[AccountSummary],
        ) -> Result<Vec<SegmentClassification>, ClassifyError> {
            Ok(accounts
                .iter()
                .map(|_| SegmentClassification {
                    segment: self.0,
                    confidence: 0.6,
                    reasons: vec!["stub".to_string()],
                })
                .collect())
        }

        async fn translate_query(&self, _query: &str) -> Result<FilterSpec, ClassifyError> {
            Ok(FilterSpec::default())
        }
    }

    /// Records how many batch calls were made, then fails them all.
    struct FailingClassifier;

    #[async_trait]
    impl TextClassifier for FailingClassifier {
        async fn classify_batch(
            &self,
            _accounts: &[AccountSummary],
        ) -> Result<Vec<SegmentClassification>, ClassifyError> {
            Err(ClassifyError::ClassificationFailure("boom".to_string()))
        }

        async fn translate_query(&self, _query: &str) -> Result<FilterSpec, ClassifyError> {
            Err(ClassifyError::ClassificationFailure("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn decided_and_pending_merge_in_original_order() {
        let accounts = vec![
            account("ambiguous1", None, None),
            account("famous", None, Some(500_000)),
            account("ambiguous2", None, None),
        ];
        let decisions = resolve_segments(&accounts, &FixedClassifier(Segment::Friend)).await;

        assert_eq!(decisions.len(), 3);
        assert_eq!(decisions[0].segment, Segment::Friend); // from the stub
        assert_eq!(decisions[1].segment, Segment::Celebrity); // heuristic rule 1
        assert_eq!(decisions[2].segment, Segment::Friend);
    }

    #[tokio::test]
    async fn unconfigured_service_gives_uniform_fallback() {
        let accounts = vec![account("a", None, None), account("b", None, None)];
        let decisions = resolve_segments(&accounts, &UnconfiguredClassifier).await;

        for decision in &decisions {
            assert_eq!(decision.segment, Segment::Unknown);
            assert!((decision.confidence - 0.3).abs() < f64::EPSILON);
            assert_eq!(decision.reasons, vec!["AI unavailable"]);
        }
    }

    #[tokio::test]
    async fn service_failure_gives_uniform_fallback() {
        let accounts = vec![account("a", None, None), account("b", None, None)];
        let decisions = resolve_segments(&accounts, &FailingClassifier).await;

        assert!(decisions
            .iter()
            .all(|d| d.segment == Segment::Unknown && d.reasons == vec!["AI unavailable"]));
    }

    #[tokio::test]
    async fn fully_decided_batch_never_calls_the_service() {
        // FailingClassifier would poison the results if it were called
        let accounts = vec![
            account("famous", None, Some(500_000)),
            account("spammy", Some("crypto forex giveaway"), Some(10)),
        ];
        let decisions = resolve_segments(&accounts, &FailingClassifier).await;

        assert_eq!(decisions[0].segment, Segment::Celebrity);
        assert_eq!(decisions[1].segment, Segment::Spam);
    }
}

// End-to-end pipeline composition tests.
//
// Runs the real orchestrator with stub classifiers: a deterministic stub
// standing in for the external service, a counting stub to pin down the
// one-batch-call-per-run contract, and the unconfigured stand-in to verify
// fallback determinism.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use sift::ai::traits::{
    AccountSummary, ClassifyError, FilterSpec, SegmentClassification, TextClassifier,
    UnconfiguredClassifier,
};
use sift::classify::allowlist::AllowlistStore;
use sift::model::{Bucket, RawAccountRecord, Segment, Tag};
use sift::pipeline::process::{Pipeline, DEFAULT_ENRICH_CAP};
use sift::pipeline::views;

/// Deterministic stand-in for the external service: every submitted
/// account becomes a creator.
struct CreatorStub;

#[async_trait]
impl TextClassifier for CreatorStub {
    async fn classify_batch(
        &self,
        accounts: &[AccountSummary],
    ) -> Result<Vec<SegmentClassification>, ClassifyError> {
        Ok(accounts
            .iter()
            .map(|_| SegmentClassification {
                segment: Segment::Creator,
                confidence: 0.6,
                reasons: vec!["stub classification".to_string()],
            })
            .collect())
    }

    async fn translate_query(&self, _query: &str) -> Result<FilterSpec, ClassifyError> {
        Ok(FilterSpec::default())
    }
}

/// Counts batch calls so tests can assert "at most one request per run".
struct CountingStub(Arc<AtomicUsize>);

#[async_trait]
impl TextClassifier for CountingStub {
    async fn classify_batch(
        &self,
        accounts: &[AccountSummary],
    ) -> Result<Vec<SegmentClassification>, ClassifyError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(accounts
            .iter()
            .map(|_| SegmentClassification {
                segment: Segment::Unknown,
                confidence: 0.5,
                reasons: vec!["counted".to_string()],
            })
            .collect())
    }

    async fn translate_query(&self, _query: &str) -> Result<FilterSpec, ClassifyError> {
        Ok(FilterSpec::default())
    }
}

fn records(handles: &[&str]) -> Vec<RawAccountRecord> {
    handles
        .iter()
        .map(|h| RawAccountRecord::from_handle(*h))
        .collect()
}

fn pipeline(classifier: Box<dyn TextClassifier>) -> Pipeline {
    Pipeline::new(AllowlistStore::empty(), classifier, DEFAULT_ENRICH_CAP)
}

// ============================================================
// Bucketing through the full pipeline
// ============================================================

#[tokio::test]
async fn fan_mutual_unfollower_scenario() {
    let accounts = pipeline(Box::new(CreatorStub))
        .process(&records(&["alice", "bob"]), &records(&["bob", "carol"]))
        .await;

    let bucket_of = |identity: &str| {
        accounts
            .iter()
            .find(|a| a.identity == identity)
            .map(|a| a.bucket)
            .unwrap()
    };

    assert_eq!(bucket_of("alice"), Bucket::Fan);
    assert_eq!(bucket_of("bob"), Bucket::Mutual);
    assert_eq!(bucket_of("carol"), Bucket::Unfollower);
}

#[tokio::test]
async fn every_account_is_tagged() {
    let accounts = pipeline(Box::new(CreatorStub))
        .process(&records(&["a1", "b2"]), &records(&["b2", "c3"]))
        .await;

    for account in &accounts {
        assert!(!account.tags.is_empty(), "{} has no tags", account.identity);
    }
}

#[tokio::test]
async fn unmatched_accounts_get_other_tag() {
    let accounts = pipeline(Box::new(CreatorStub))
        .process(&records(&["qx.91"]), &records(&[]))
        .await;

    assert_eq!(accounts[0].tags, vec![Tag::Other]);
}

// ============================================================
// Enrichment scope: unfollowers only, capped, one batch call
// ============================================================

#[tokio::test]
async fn only_unfollowers_are_enriched() {
    let accounts = pipeline(Box::new(CreatorStub))
        .process(&records(&["fan1", "mutual1"]), &records(&["mutual1", "unf1"]))
        .await;

    for account in &accounts {
        if account.bucket == Bucket::Unfollower {
            assert!(account.segment.is_some(), "{} missing segment", account.identity);
            assert!(account.suggestion_score.is_some());
        } else {
            assert!(account.segment.is_none(), "{} should not be enriched", account.identity);
            assert!(account.suggestion_score.is_none());
        }
    }
}

#[tokio::test]
async fn enrichment_cap_bounds_the_batch() {
    let following = records(&["u1", "u2", "u3", "u4"]);
    let pipeline = Pipeline::new(AllowlistStore::empty(), Box::new(CreatorStub), 2);
    let accounts = pipeline.process(&records(&[]), &following).await;

    let enriched = accounts.iter().filter(|a| a.segment.is_some()).count();
    assert_eq!(enriched, 2);

    // Cap applies in insertion order
    assert!(accounts[0].segment.is_some());
    assert!(accounts[1].segment.is_some());
    assert!(accounts[2].segment.is_none());
    assert!(accounts[3].segment.is_none());
}

#[tokio::test]
async fn at_most_one_external_call_per_run() {
    let calls = Arc::new(AtomicUsize::new(0));

    let pipeline = pipeline(Box::new(CountingStub(calls.clone())));
    pipeline
        .process(&records(&[]), &records(&["u1", "u2", "u3", "u4", "u5"]))
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// ============================================================
// Fallback determinism
// ============================================================

#[tokio::test]
async fn unconfigured_capability_yields_unknown_segments() {
    let accounts = pipeline(Box::new(UnconfiguredClassifier))
        .process(&records(&[]), &records(&["someone", "else"]))
        .await;

    for account in &accounts {
        assert_eq!(account.segment, Some(Segment::Unknown));
        assert!(account.reasons.iter().any(|r| r == "AI unavailable"));
        // unfollower base 0.6 + unknown 0.1
        let score = account.suggestion_score.unwrap();
        assert!((score - 0.7).abs() < 1e-9, "got {score}");
    }
}

#[tokio::test]
async fn heuristic_decisions_survive_unconfigured_capability() {
    let mut famous = RawAccountRecord::from_handle("megafamous");
    famous.followers_count = Some(500_000);
    famous.bio = Some("Singer".to_string());

    let accounts = pipeline(Box::new(UnconfiguredClassifier))
        .process(&records(&[]), &[famous])
        .await;

    assert_eq!(accounts[0].segment, Some(Segment::Celebrity));
}

// ============================================================
// Keyword threshold demonstration
// ============================================================

#[tokio::test]
async fn single_brand_keyword_is_not_enough_for_a_segment() {
    // "official" alone gives brand_score 1 — below the >= 2 threshold, so
    // the account is ambiguous and falls back without a configured service.
    let accounts = pipeline(Box::new(UnconfiguredClassifier))
        .process(&records(&[]), &records(&["nike_official"]))
        .await;
    assert_eq!(accounts[0].segment, Some(Segment::Unknown));

    // A second brand keyword crosses the threshold.
    let accounts = pipeline(Box::new(UnconfiguredClassifier))
        .process(&records(&[]), &records(&["nike_official_store"]))
        .await;
    assert_eq!(accounts[0].segment, Some(Segment::Brand));
}

// ============================================================
// Idempotence
// ============================================================

#[tokio::test]
async fn process_is_idempotent_with_a_deterministic_stub() {
    let followers = records(&["alice", "bob", "dana"]);
    let following = records(&["bob", "carol", "erin"]);

    let first = pipeline(Box::new(CreatorStub))
        .process(&followers, &following)
        .await;
    let second = pipeline(Box::new(CreatorStub))
        .process(&followers, &following)
        .await;

    assert_eq!(first, second);

    let first_suggested: Vec<&str> = views::suggested_unfollows(&first)
        .iter()
        .map(|a| a.identity.as_str())
        .collect();
    let second_suggested: Vec<&str> = views::suggested_unfollows(&second)
        .iter()
        .map(|a| a.identity.as_str())
        .collect();
    assert_eq!(first_suggested, second_suggested);
}

// ============================================================
// Views over pipeline output
// ============================================================

#[tokio::test]
async fn suggested_view_ranks_spam_above_creators() {
    struct MixedStub;

    #[async_trait]
    impl TextClassifier for MixedStub {
        async fn classify_batch(
            &self,
            accounts: &[AccountSummary],
        ) -> Result<Vec<SegmentClassification>, ClassifyError> {
            Ok(accounts
                .iter()
                .map(|summary| SegmentClassification {
                    segment: if summary.username.starts_with("spam") {
                        Segment::Spam
                    } else {
                        Segment::Creator
                    },
                    confidence: 0.6,
                    reasons: vec!["stub".to_string()],
                })
                .collect())
        }

        async fn translate_query(&self, _query: &str) -> Result<FilterSpec, ClassifyError> {
            Ok(FilterSpec::default())
        }
    }

    let accounts = pipeline(Box::new(MixedStub))
        .process(&records(&[]), &records(&["creator1", "spammy1"]))
        .await;

    let suggested = views::suggested_unfollows(&accounts);
    // spam: 0.6 + 0.5 = 1.0 (clamped); creator: 0.6 + 0.2 = 0.8
    assert_eq!(suggested[0].identity, "spammy1");
    assert_eq!(suggested[1].identity, "creator1");
}

#[tokio::test]
async fn grouped_view_only_contains_unfollowers() {
    let accounts = pipeline(Box::new(CreatorStub))
        .process(&records(&["fanny"]), &records(&["zeta", "9bot"]))
        .await;

    let groups = views::group_unfollowers(&accounts);
    let all_members: Vec<&str> = groups
        .iter()
        .flat_map(|(_, members)| members.iter().map(String::as_str))
        .collect();

    assert!(all_members.contains(&"zeta"));
    assert!(all_members.contains(&"9bot"));
    assert!(!all_members.contains(&"fanny"));

    // Non-letter group is last
    assert_eq!(groups.last().unwrap().0, "#");
}

#[tokio::test]
async fn category_counts_reflect_buckets_and_tags() {
    let accounts = pipeline(Box::new(CreatorStub))
        .process(&records(&["alice", "bob"]), &records(&["bob", "carol"]))
        .await;

    let counts = views::category_counts(&accounts);
    assert_eq!(counts["fans"], 1);
    assert_eq!(counts["mutuals"], 1);
    assert_eq!(counts["unfollowers"], 1);
    assert_eq!(counts["unknown"], 0);
}

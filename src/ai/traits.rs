// Text classification trait — the swap-ready abstraction.
//
// Implementations must be async because providers require HTTP API calls.
// Failures are enumerated, not rescued: callers branch on the error kind
// and apply the fallback policy explicitly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Account, Segment};

/// A single account summarized for the external classifier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: usize,
    pub username: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
}

impl AccountSummary {
    pub fn from_account(id: usize, account: &Account) -> Self {
        Self {
            id,
            username: account.identity.clone(),
            full_name: account.display_name.clone(),
            bio: account.bio.clone(),
            followers_count: account.followers_count,
            following_count: account.following_count,
        }
    }
}

/// One classification returned by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentClassification {
    pub segment: Segment,
    pub confidence: f64,
    pub reasons: Vec<String>,
}

/// A filter specification translated from a natural-language query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub segments: Vec<String>,
    pub min_suggestion: Option<f64>,
    pub max_suggestion: Option<f64>,
    pub hide_followers: Option<bool>,
    pub show_followers: Option<bool>,
    pub hide_these: Option<bool>,
}

/// Why a classification call produced no usable result.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The capability was never configured (no API credential)
    #[error("classification service is not configured")]
    ServiceUnavailable,
    /// The service was reached but returned unusable data, or the transport
    /// failed mid-call
    #[error("classification failed: {0}")]
    ClassificationFailure(String),
}

/// Capability interface for external text classification.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Classify a batch of accounts into segments. The returned vector must
    /// contain exactly one entry per submitted account, in the same order.
    async fn classify_batch(
        &self,
        accounts: &[AccountSummary],
    ) -> Result<Vec<SegmentClassification>, ClassifyError>;

    /// Translate a natural-language query into a filter specification.
    async fn translate_query(&self, query: &str) -> Result<FilterSpec, ClassifyError>;
}

/// Stand-in used when no API credential is configured. Every call reports
/// ServiceUnavailable so callers route straight to fallback behavior.
pub struct UnconfiguredClassifier;

#[async_trait]
impl TextClassifier for UnconfiguredClassifier {
    async fn classify_batch(
        &self,
        _accounts: &[AccountSummary],
    ) -> Result<Vec<SegmentClassification>, ClassifyError> {
        Err(ClassifyError::ServiceUnavailable)
    }

    async fn translate_query(&self, _query: &str) -> Result<FilterSpec, ClassifyError> {
        Err(ClassifyError::ServiceUnavailable)
    }
}

// The pipeline orchestrator.
//
// Composes the classification stages into one request-scoped computation:
// normalize + bucket every identity, tag every account, then resolve a
// segment and suggestion score for unfollower-bucket accounts up to the
// enrichment cap. At most one external request leaves this call, and no
// classification error escapes it.
//
// Everything the run needs arrives through the constructor — allowlists,
// classifier handle, weights. No process-wide state crosses invocations.

use tracing::info;

use crate::ai::traits::TextClassifier;
use crate::classify::allowlist::AllowlistStore;
use crate::classify::buckets::bucket_relationships;
use crate::classify::resolver::resolve_segments;
use crate::classify::tagger::HeuristicTagger;
use crate::model::{Account, RawAccountRecord};
use crate::scoring::suggestion::{compute_suggestion_score, SuggestionWeights};

/// Default cap on accounts sent through segment enrichment per run — bounds
/// external-service cost and latency.
pub const DEFAULT_ENRICH_CAP: usize = 100;

pub struct Pipeline {
    allowlists: AllowlistStore,
    classifier: Box<dyn TextClassifier>,
    weights: SuggestionWeights,
    enrich_cap: usize,
}

impl Pipeline {
    pub fn new(
        allowlists: AllowlistStore,
        classifier: Box<dyn TextClassifier>,
        enrich_cap: usize,
    ) -> Self {
        Self {
            allowlists,
            classifier,
            weights: SuggestionWeights::default(),
            enrich_cap,
        }
    }

    /// Run the full pipeline over both lists.
    ///
    /// Returns one Account per unique normalized identity, in deterministic
    /// insertion order (see `bucket_relationships`). Accounts outside the
    /// unfollower bucket, or past the enrichment cap, keep
    /// `segment = None` and `suggestion_score = None`.
    pub async fn process(
        &self,
        followers: &[RawAccountRecord],
        following: &[RawAccountRecord],
    ) -> Vec<Account> {
        info!(
            followers = followers.len(),
            following = following.len(),
            "Starting classification"
        );

        // Stage 1: normalize + bucket
        let mut accounts = bucket_relationships(followers, following);

        // Stage 2: heuristic tagging — every account, regardless of bucket
        let tagger = HeuristicTagger::new(&self.allowlists);
        for account in &mut accounts {
            let (tags, reasons) = tagger.tag(&account.identity, account.display_name.as_deref());
            account.tags = tags;
            account.reasons.extend(reasons);
        }

        // Stage 3: segment + suggestion score for unfollowers, capped
        let targets: Vec<usize> = accounts
            .iter()
            .enumerate()
            .filter(|(_, account)| account.is_unfollower())
            .map(|(index, _)| index)
            .collect();

        if targets.len() > self.enrich_cap {
            info!(
                skipped = targets.len() - self.enrich_cap,
                cap = self.enrich_cap,
                "Enrichment cap reached, remaining unfollowers keep no segment"
            );
        }
        let targets = &targets[..targets.len().min(self.enrich_cap)];

        let subset: Vec<Account> = targets.iter().map(|&index| accounts[index].clone()).collect();
        let decisions = resolve_segments(&subset, self.classifier.as_ref()).await;

        for (&index, decision) in targets.iter().zip(decisions) {
            let account = &mut accounts[index];
            account.segment = Some(decision.segment);
            account.suggestion_score = Some(compute_suggestion_score(
                true,
                decision.segment,
                account.followers_count,
                account.following_count,
                &self.weights,
            ));
            account.reasons.extend(decision.reasons);
        }

        info!(total = accounts.len(), "Classification complete");
        accounts
    }
}

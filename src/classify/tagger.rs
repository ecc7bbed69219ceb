// Heuristic tagging — allowlist authority over keyword density over default.
//
// The ordering is load-bearing: curated allowlists exist to override noisy
// keyword heuristics for known accounts, so an allowlist hit short-circuits
// the keyword scan entirely. Keyword families overlap on purpose ("official"
// appears in more than one); evaluation order resolves the ties.

use crate::classify::allowlist::AllowlistStore;
use crate::model::Tag;

const BRAND_KEYWORDS: &[&str] = &[
    "official", "store", "inc", "brand", "shop", "co", "app", "io", "hq", "labs",
    "company", "corp", "ltd", "llc", "group", "team", "studio", "agency", "network",
    "media", "news", "tech", "digital", "online", "global", "international",
];

const SPORTS_KEYWORDS: &[&str] = &[
    "fc", "cf", "f1", "ufc", "nba", "nfl", "mlb", "nhl", "mls", "fifa", "uefa",
    "olympics", "formula1", "nascar", "pga", "masters", "usopen", "wimbledon",
    "sports", "basketball", "football", "soccer", "baseball", "hockey", "tennis",
];

const CELEBRITY_KEYWORDS: &[&str] = &[
    "official", "real", "theofficial", "tv", "actor", "actress", "music", "dj",
    "artist", "singer", "rapper", "musician", "comedian", "author", "writer",
    "director", "producer", "model", "influencer", "youtuber", "tiktoker",
];

const CREATOR_KEYWORDS: &[&str] = &[
    "content", "creator", "influencer", "blogger", "youtuber", "tiktoker", "streamer",
    "photographer", "designer", "artist", "filmmaker", "podcaster", "coach", "trainer",
    "fitness", "lifestyle", "travel", "food", "fashion", "beauty", "gaming", "tech",
];

/// Keyword families in evaluation order, paired with the tag they contribute
/// and the label used in reasons.
const FAMILIES: &[(Tag, &str, &[&str])] = &[
    (Tag::Brand, "Brand", BRAND_KEYWORDS),
    (Tag::Sports, "Sports", SPORTS_KEYWORDS),
    (Tag::Celebrity, "Celebrity", CELEBRITY_KEYWORDS),
    (Tag::Creator, "Creator", CREATOR_KEYWORDS),
];

/// Heuristic tagger over a read-only allowlist store.
pub struct HeuristicTagger<'a> {
    allowlists: &'a AllowlistStore,
}

impl<'a> HeuristicTagger<'a> {
    pub fn new(allowlists: &'a AllowlistStore) -> Self {
        Self { allowlists }
    }

    /// Tag one account from its normalized identity and optional display
    /// name. Total function: always returns at least one tag (`Other` when
    /// nothing matched) and one reason per tag.
    pub fn tag(&self, identity: &str, display_name: Option<&str>) -> (Vec<Tag>, Vec<String>) {
        let mut tags = Vec::new();
        let mut reasons = Vec::new();

        // Step 1: allowlist check — an exact match is authoritative and
        // skips the keyword scan.
        if let Some(tag) = self.allowlists.lookup(identity) {
            let list_name = match tag {
                Tag::Brand => "brands",
                Tag::Sports => "sports",
                _ => "celebrities",
            };
            tags.push(tag);
            reasons.push(format!("Found in {list_name} allowlist"));
            return (tags, reasons);
        }

        // Step 2: keyword scan over the combined text blob. Families are
        // non-exclusive — several may match the same account.
        let text = match display_name {
            Some(name) => format!("{} {}", identity, name.to_lowercase()),
            None => identity.to_string(),
        };

        for (tag, label, keywords) in FAMILIES {
            let matches: Vec<&str> = keywords
                .iter()
                .copied()
                .filter(|kw| text.contains(kw))
                .collect();
            if !matches.is_empty() {
                tags.push(*tag);
                reasons.push(format!(
                    "{} keywords: {}",
                    label,
                    matches[..matches.len().min(3)].join(", ")
                ));
            }
        }

        // Step 3: default
        if tags.is_empty() {
            tags.push(Tag::Other);
            reasons.push("No specific category detected".to_string());
        }

        (tags, reasons)
    }
}

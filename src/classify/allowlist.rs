// Curated allowlists — exact-match handle sets that override keyword
// heuristics for known accounts.
//
// Loaded once at startup and treated as read-only for the lifetime of the
// pipeline. A missing file yields an empty set, never an error: the tagger
// degrades to keyword heuristics alone.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{error, warn};

use crate::classify::normalize::normalize;
use crate::model::Tag;

/// Three named handle sets: brands, sports, celebrities.
#[derive(Debug, Clone, Default)]
pub struct AllowlistStore {
    pub brands: HashSet<String>,
    pub sports: HashSet<String>,
    pub celebrities: HashSet<String>,
}

impl AllowlistStore {
    /// Load `brands.json`, `sports.json`, and `celebrities.json` from the
    /// given directory. Each file is a JSON array of handle strings.
    pub fn load(dir: &Path) -> Self {
        Self {
            brands: load_one(&dir.join("brands.json")),
            sports: load_one(&dir.join("sports.json")),
            celebrities: load_one(&dir.join("celebrities.json")),
        }
    }

    /// An empty store — every lookup misses. Useful for tests and for
    /// callers that want keyword heuristics only.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Exact-match lookup on a normalized handle. Checked in fixed order:
    /// brands, then sports, then celebrities.
    pub fn lookup(&self, identity: &str) -> Option<Tag> {
        if self.brands.contains(identity) {
            Some(Tag::Brand)
        } else if self.sports.contains(identity) {
            Some(Tag::Sports)
        } else if self.celebrities.contains(identity) {
            Some(Tag::Celebrity)
        } else {
            None
        }
    }

    pub fn total_entries(&self) -> usize {
        self.brands.len() + self.sports.len() + self.celebrities.len()
    }
}

/// Load a single allowlist file. Entries are normalized like any other
/// handle; empties are dropped.
fn load_one(path: &Path) -> HashSet<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => {
            warn!(path = %path.display(), "Allowlist file not found, using empty set");
            return HashSet::new();
        }
    };

    match serde_json::from_str::<Vec<String>>(&content) {
        Ok(items) => items
            .iter()
            .map(|item| normalize(item))
            .filter(|item| !item.is_empty())
            .collect(),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to parse allowlist, using empty set");
            HashSet::new()
        }
    }
}

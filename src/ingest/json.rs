// Instagram export JSON parsing.
//
// Two shapes, one per list: the followers export is a bare JSON array of
// entries, the following export wraps the same entry shape in an object
// under "relationships_following". Each entry carries its handle (and, on
// the following side, the follow timestamp) inside "string_list_data".

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::model::RawAccountRecord;

#[derive(Deserialize)]
struct ListEntry {
    #[serde(default)]
    string_list_data: Vec<StringListItem>,
}

#[derive(Deserialize)]
struct StringListItem {
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

#[derive(Deserialize)]
struct FollowingExport {
    #[serde(default)]
    relationships_following: Vec<ListEntry>,
}

/// Parse the followers export (JSON array of entries).
pub fn parse_followers(content: &str) -> Result<Vec<RawAccountRecord>> {
    let entries: Vec<ListEntry> =
        serde_json::from_str(content).context("Invalid followers JSON format")?;

    let records = collect_records(&entries);
    debug!(count = records.len(), "Parsed followers from JSON");
    Ok(records)
}

/// Parse the following export (object with "relationships_following").
/// Records carry the follow timestamp when the export provides one.
pub fn parse_following(content: &str) -> Result<Vec<RawAccountRecord>> {
    let export: FollowingExport =
        serde_json::from_str(content).context("Invalid following JSON format")?;

    let records = collect_records(&export.relationships_following);
    debug!(count = records.len(), "Parsed following from JSON");
    Ok(records)
}

fn collect_records(entries: &[ListEntry]) -> Vec<RawAccountRecord> {
    entries
        .iter()
        .flat_map(|entry| entry.string_list_data.iter())
        .filter_map(|item| {
            let username = item.value.clone()?;
            Some(RawAccountRecord {
                username,
                relationship_timestamp: item.timestamp,
                ..Default::default()
            })
        })
        .collect()
}

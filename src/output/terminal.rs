// Colored terminal output for classification results.
//
// This module handles all terminal-specific formatting: colors, tables,
// group listings. The main.rs display calls delegate here.

use std::collections::BTreeMap;

use chrono::DateTime;
use colored::Colorize;

use crate::model::{Account, Segment};
use crate::output::truncate_chars;

/// Display the headline numbers and per-category counts.
pub fn display_summary(
    total_followers: usize,
    total_following: usize,
    counts: &BTreeMap<&'static str, usize>,
) {
    println!("\n{}", "=== Follow Analysis ===".bold());
    println!("  Followers: {total_followers}");
    println!("  Following: {total_following}");
    println!(
        "  Don't follow back: {}",
        counts.get("unfollowers").copied().unwrap_or(0)
    );
    println!(
        "  Fans: {}  Mutuals: {}",
        counts.get("fans").copied().unwrap_or(0),
        counts.get("mutuals").copied().unwrap_or(0)
    );

    let tag_line: Vec<String> = ["brand", "sports", "celebrity", "creator", "other"]
        .iter()
        .map(|name| format!("{name} {}", counts.get(name).copied().unwrap_or(0)))
        .collect();
    println!("  Tags: {}", tag_line.join(" | ").dimmed());
}

/// Display the ranked "suggested unfollows" view.
pub fn display_suggestions(suggestions: &[&Account]) {
    if suggestions.is_empty() {
        println!("\nNo unfollow suggestions — nothing scored above the threshold.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Suggested Unfollows ({} accounts) ===", suggestions.len()).bold()
    );
    println!();

    // Header
    println!(
        "  {:>4}  {:<32} {:>6}  {:<10}  Why",
        "Rank".dimmed(),
        "Handle".dimmed(),
        "Score".dimmed(),
        "Segment".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    for (i, account) in suggestions.iter().enumerate() {
        let segment = account.segment.unwrap_or(Segment::Unknown);
        let reason = account
            .reasons
            .last()
            .map(|r| truncate_chars(r, 40))
            .unwrap_or_default();

        println!(
            "  {:>4}. @{:<30} {:>6.2}  {:<10}  {}",
            i + 1,
            account.identity,
            account.suggestion_score.unwrap_or(0.0),
            colorize_segment(segment),
            reason.dimmed(),
        );
    }
}

/// Display the alphabetical grouped view of unfollowers.
pub fn display_grouped(groups: &[(String, Vec<String>)]) {
    if groups.is_empty() {
        println!("\nEveryone you follow follows you back.");
        return;
    }

    println!("\n{}", "=== Not Following Back ===".bold());
    for (label, identities) in groups {
        println!("\n  {}", label.bold());
        for identity in identities {
            println!("    @{identity}");
        }
    }
}

/// Display one account's full classification detail.
pub fn display_account_detail(account: &Account) {
    println!(
        "\n{}",
        format!("=== @{} ===", account.identity).bold()
    );
    if let Some(name) = &account.display_name {
        println!("  Name: {name}");
    }
    println!("  Relationship: {}", account.bucket);
    let tags: Vec<&str> = account.tags.iter().map(|t| t.as_str()).collect();
    println!("  Tags: {}", tags.join(", "));
    if let Some(segment) = account.segment {
        println!("  Segment: {}", colorize_segment(segment));
    }
    if let Some(score) = account.suggestion_score {
        println!("  Suggestion score: {score:.2}");
    }
    if let Some(ts) = account.relationship_timestamp {
        if let Some(when) = DateTime::from_timestamp(ts, 0) {
            println!("  Followed since: {}", when.format("%Y-%m-%d"));
        }
    }
    if !account.reasons.is_empty() {
        println!("  Why:");
        for reason in &account.reasons {
            println!("    - {reason}");
        }
    }
}

fn colorize_segment(segment: Segment) -> String {
    match segment {
        Segment::Spam => segment.as_str().red().bold().to_string(),
        Segment::Friend => segment.as_str().green().to_string(),
        Segment::Celebrity | Segment::Brand => segment.as_str().yellow().to_string(),
        Segment::Creator => segment.as_str().cyan().to_string(),
        Segment::Unknown => segment.as_str().dimmed().to_string(),
    }
}

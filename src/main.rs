use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use sift::ai::traits::TextClassifier;
use sift::classify::allowlist::AllowlistStore;
use sift::classify::normalize::normalize;
use sift::classify::tagger::HeuristicTagger;
use sift::config::Config;
use sift::model::AccountView;
use sift::pipeline::process::Pipeline;
use sift::pipeline::views;

/// Sift: follow-relationship analysis for Instagram exports.
///
/// Compares your followers and following lists, classifies every account,
/// and ranks the ones worth unfollowing.
#[derive(Parser)]
#[command(name = "sift", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare followers vs following exports and classify every account
    Compare {
        /// Path to the followers export (followers_1.json)
        followers: PathBuf,

        /// Path to the following export (following.json)
        following: PathBuf,

        /// Reject the whole input on the first malformed record instead of
        /// dropping it
        #[arg(long)]
        strict: bool,

        /// Skip AI segment enrichment even if a key is configured
        #[arg(long)]
        no_ai: bool,

        /// Emit the full classified account list as JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Show full classification detail for one handle after the summary
        #[arg(long)]
        detail: Option<String>,
    },

    /// Classify a single handle with the heuristic tagger
    Tag {
        /// The handle to tag (e.g. nike or @nike)
        handle: String,

        /// Display name to include in the keyword scan
        #[arg(long)]
        name: Option<String>,
    },

    /// Translate a natural-language query into a filter specification
    Translate {
        /// e.g. "hide celebrities and brands"
        query: String,
    },

    /// Show configuration status (allowlists, AI capability)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sift=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            followers,
            following,
            strict,
            no_ai,
            json,
            detail,
        } => {
            let config = Config::load()?;

            let followers_content = fs::read_to_string(&followers)
                .with_context(|| format!("Failed to read {}", followers.display()))?;
            let following_content = fs::read_to_string(&following)
                .with_context(|| format!("Failed to read {}", following.display()))?;

            let follower_records = sift::ingest::json::parse_followers(&followers_content)?;
            let following_records = sift::ingest::json::parse_following(&following_content)?;

            let follower_records = sift::validate::validate_records(&follower_records, strict)?;
            let following_records = sift::validate::validate_records(&following_records, strict)?;

            let allowlists = AllowlistStore::load(&config.allowlist_dir);
            info!(
                entries = allowlists.total_entries(),
                "Loaded allowlists"
            );

            let classifier = build_classifier(&config, no_ai)?;
            let pipeline = Pipeline::new(allowlists, classifier, config.enrich_cap);

            let accounts = pipeline
                .process(&follower_records, &following_records)
                .await;

            if json {
                let serialized: Vec<AccountView> =
                    accounts.iter().map(AccountView::from).collect();
                println!("{}", serde_json::to_string_pretty(&serialized)?);
                return Ok(());
            }

            let counts = views::category_counts(&accounts);
            sift::output::terminal::display_summary(
                follower_records.len(),
                following_records.len(),
                &counts,
            );

            let suggestions = views::suggested_unfollows(&accounts);
            sift::output::terminal::display_suggestions(&suggestions);

            let groups = views::group_unfollowers(&accounts);
            sift::output::terminal::display_grouped(&groups);

            if let Some(handle) = detail {
                let identity = normalize(&handle);
                match accounts.iter().find(|a| a.identity == identity) {
                    Some(account) => sift::output::terminal::display_account_detail(account),
                    None => println!("\n@{identity} not found in either list."),
                }
            }

            if !config.ai_configured() && !no_ai {
                println!(
                    "\n{}",
                    "Tip: set GEMINI_API_KEY to enable AI segment enrichment.".dimmed()
                );
            }
        }

        Commands::Tag { handle, name } => {
            let config = Config::load()?;
            let identity = normalize(&handle);
            if identity.is_empty() {
                anyhow::bail!("Handle normalizes to nothing: {handle:?}");
            }

            let allowlists = AllowlistStore::load(&config.allowlist_dir);
            let tagger = HeuristicTagger::new(&allowlists);
            let (tags, reasons) = tagger.tag(&identity, name.as_deref());

            println!("\n{}", format!("=== @{identity} ===").bold());
            let tag_names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
            println!("  Tags: {}", tag_names.join(", "));
            for reason in &reasons {
                println!("    - {reason}");
            }
        }

        Commands::Translate { query } => {
            let config = Config::load()?;
            config.require_gemini()?;

            let query = sift::validate::validate_query(&query)?;
            let classifier = build_classifier(&config, false)?;

            match classifier.translate_query(&query).await {
                Ok(filter) => println!("{}", serde_json::to_string_pretty(&filter)?),
                Err(e) => anyhow::bail!("Could not understand query: {e}"),
            }
        }

        Commands::Status => {
            let config = Config::load()?;
            let allowlists = AllowlistStore::load(&config.allowlist_dir);

            println!("{}", "=== Sift Status ===".bold());
            println!(
                "Allowlists: {} ({} brands, {} sports, {} celebrities)",
                config.allowlist_dir.display(),
                allowlists.brands.len(),
                allowlists.sports.len(),
                allowlists.celebrities.len(),
            );
            if config.ai_configured() {
                println!("AI capability: configured (model {})", config.gemini_model);
            } else {
                println!(
                    "AI capability: {} — ambiguous accounts will fall back to 'unknown'",
                    "not configured".yellow()
                );
            }
            println!("Enrichment cap: {} accounts per run", config.enrich_cap);
        }
    }

    Ok(())
}

/// Select the text classifier based on configuration. Without a key (or
/// with --no-ai) the unconfigured stand-in routes every ambiguous account
/// to the deterministic fallback.
fn build_classifier(config: &Config, no_ai: bool) -> Result<Box<dyn TextClassifier>> {
    if no_ai || !config.ai_configured() {
        info!("AI capability absent, ambiguous accounts fall back to unknown");
        return Ok(Box::new(sift::ai::traits::UnconfiguredClassifier));
    }

    info!(model = %config.gemini_model, "Using Gemini classifier");
    let classifier = sift::ai::gemini::GeminiClassifier::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(Box::new(classifier))
}

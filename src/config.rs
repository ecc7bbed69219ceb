use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::pipeline::process::DEFAULT_ENRICH_CAP;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Gemini API key — empty means the AI capability is absent and every
    /// ambiguous account takes the deterministic fallback.
    pub gemini_api_key: String,
    /// Gemini model name (defaults to gemini-1.5-flash)
    pub gemini_model: String,
    /// Directory containing brands.json / sports.json / celebrities.json
    pub allowlist_dir: PathBuf,
    /// Cap on accounts sent through segment enrichment per run
    pub enrich_cap: usize,
}

impl Config {
    /// Load configuration from environment variables. Everything has a
    /// default except the API key, which is only needed for AI features.
    pub fn load() -> Result<Self> {
        let enrich_cap = match env::var("SIFT_ENRICH_CAP") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("SIFT_ENRICH_CAP must be a number, got: {raw}"))?,
            Err(_) => DEFAULT_ENRICH_CAP,
        };

        Ok(Self {
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| crate::ai::gemini::DEFAULT_MODEL.to_string()),
            allowlist_dir: env::var("SIFT_ALLOWLIST_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            enrich_cap,
        })
    }

    /// Whether the AI capability is configured at all.
    pub fn ai_configured(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }

    /// Check that the Gemini API key is configured.
    /// Call this before any operation that requires the AI capability
    /// (query translation has no fallback).
    pub fn require_gemini(&self) -> Result<()> {
        if self.gemini_api_key.is_empty() {
            anyhow::bail!(
                "GEMINI_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }
}

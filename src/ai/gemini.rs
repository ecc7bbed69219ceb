// Gemini generateContent implementation.
//
// One POST per batch: the whole undecided set goes out in a single request
// with JSON response mode and temperature 0. The response is parsed
// strictly — a body that isn't a JSON array with one entry per submitted
// account is a ClassificationFailure, while an individual entry missing a
// usable `segment` degrades only that entry.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::traits::{
    AccountSummary, ClassifyError, FilterSpec, SegmentClassification, TextClassifier,
};
use crate::model::Segment;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const CLASSIFY_SYSTEM_PROMPT: &str = "\
You are an Instagram account classifier. Analyze the provided accounts and classify each into one of these segments:

- \"celebrity\": Famous people, verified accounts, entertainers, public figures
- \"creator\": Content creators, influencers, bloggers, artists, coaches
- \"brand\": Companies, businesses, official brand accounts, stores
- \"friend\": Real people, personal accounts, likely genuine connections
- \"spam\": Fake accounts, bots, suspicious activity, cryptocurrency/forex promotion

For each account, provide:
1. segment: one of the 5 categories above
2. confidence: float between 0.0-1.0
3. explanations: array of short reasons for the classification

Respond with a valid JSON array only, one object per account, in input order, no additional text.";

const TRANSLATE_SYSTEM_PROMPT: &str = "\
You are a query translator for an Instagram account filter system. Convert natural language queries into JSON filter objects.

Available filters:
- segments: array of [\"celebrity\", \"creator\", \"brand\", \"friend\", \"spam\", \"unknown\"]
- minSuggestion: float 0.0-1.0 (higher = more likely to unfollow)
- maxSuggestion: float 0.0-1.0
- hideFollowers: boolean (hide accounts that follow you back)
- showFollowers: boolean (show only accounts that follow you back)

Examples:
\"Hide celebrities and brands\" -> {\"segments\": [\"celebrity\", \"brand\"], \"hideThese\": true}
\"Show real friends who don't follow back\" -> {\"segments\": [\"friend\"], \"hideFollowers\": true}
\"Show spam accounts\" -> {\"segments\": [\"spam\"]}
\"Show high suggestion scores\" -> {\"minSuggestion\": 0.7}

Respond with valid JSON only.";

/// Gemini-backed text classifier.
pub struct GeminiClassifier {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClassifier {
    pub fn new(api_key: String, model: String) -> Result<Self, ClassifyError> {
        let client = Client::builder()
            .user_agent("sift/0.1 (follow-analysis)")
            .build()
            .map_err(|e| ClassifyError::ClassificationFailure(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// Send one prompt and return the text of the first candidate part.
    async fn generate(&self, prompt: String) -> Result<String, ClassifyError> {
        let url = format!(
            "{API_BASE}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json".to_string(),
            },
        };

        debug!(model = %self.model, "Gemini generateContent request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifyError::ClassificationFailure(format!("transport: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifyError::ClassificationFailure(format!(
                "Gemini returned {status}: {body}"
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            ClassifyError::ClassificationFailure(format!("malformed response envelope: {e}"))
        })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ClassifyError::ClassificationFailure(
                "empty response from Gemini".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait::async_trait]
impl TextClassifier for GeminiClassifier {
    async fn classify_batch(
        &self,
        accounts: &[AccountSummary],
    ) -> Result<Vec<SegmentClassification>, ClassifyError> {
        if accounts.is_empty() {
            return Ok(Vec::new());
        }

        let formatted = serde_json::to_string_pretty(accounts)
            .map_err(|e| ClassifyError::ClassificationFailure(format!("serialize batch: {e}")))?;
        let prompt = format!(
            "{CLASSIFY_SYSTEM_PROMPT}\n\nClassify these Instagram accounts:\n{formatted}"
        );

        let text = self.generate(prompt).await?;
        parse_classifications(&text, accounts.len())
    }

    async fn translate_query(&self, query: &str) -> Result<FilterSpec, ClassifyError> {
        let prompt = format!("{TRANSLATE_SYSTEM_PROMPT}\n\nQuery: {query}");
        let text = self.generate(prompt).await?;

        serde_json::from_str(&text).map_err(|e| {
            ClassifyError::ClassificationFailure(format!("could not understand query: {e}"))
        })
    }
}

/// Parse the model's JSON array into classifications.
///
/// The array must contain exactly `expected` entries — anything else is a
/// whole-batch failure. Within the array, an entry that isn't an object
/// carrying a recognized `segment` string degrades to the per-entry
/// fallback without discarding the rest of the batch.
fn parse_classifications(
    text: &str,
    expected: usize,
) -> Result<Vec<SegmentClassification>, ClassifyError> {
    let entries: Vec<Value> = serde_json::from_str(text)
        .map_err(|e| ClassifyError::ClassificationFailure(format!("unparsable body: {e}")))?;

    if entries.len() != expected {
        return Err(ClassifyError::ClassificationFailure(format!(
            "expected {expected} classifications, got {}",
            entries.len()
        )));
    }

    let results = entries
        .iter()
        .map(|entry| match parse_entry(entry) {
            Some(classification) => classification,
            None => {
                warn!("Malformed classification entry, degrading to unknown");
                SegmentClassification {
                    segment: Segment::Unknown,
                    confidence: 0.3,
                    reasons: vec!["AI classification failed".to_string()],
                }
            }
        })
        .collect();

    Ok(results)
}

fn parse_entry(entry: &Value) -> Option<SegmentClassification> {
    let segment = Segment::parse(entry.get("segment")?.as_str()?)?;
    let confidence = entry
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(0.5);
    let reasons = entry
        .get("explanations")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .filter(|r: &Vec<String>| !r.is_empty())
        .unwrap_or_else(|| vec!["AI classified".to_string()]);

    Some(SegmentClassification {
        segment,
        confidence,
        reasons,
    })
}

// --- Gemini API request/response types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

// External text classification — trait-based abstraction for the LLM
// capability.
//
// The TextClassifier trait defines the interface. GeminiClassifier
// implements it against the Gemini generateContent API. When no credential
// is configured the UnconfiguredClassifier stands in, and every undecided
// account takes the deterministic fallback instead.

pub mod gemini;
pub mod traits;

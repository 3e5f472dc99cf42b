//! Data models for the visibility tracker.
//!
//! This module contains the core data structures shared by the dispatcher,
//! aggregator, snapshot store and report formatter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of characters of raw response text kept in each record.
pub const SNIPPET_CHARS: usize = 300;

/// Prefix of the text recorded for a failed query.
pub const ERROR_MARKER: &str = "ERROR";

/// One of the conversational AI services being queried.
///
/// Variant order is the query order and the order of every per-platform map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// OpenAI chat completions.
    ChatGpt,
    /// Anthropic messages.
    Claude,
    /// Google generative language.
    Gemini,
}

impl Platform {
    /// All platforms, in query order.
    pub const ALL: [Platform; 3] = [Platform::ChatGpt, Platform::Claude, Platform::Gemini];

    /// Machine key used in snapshots and in the winning-prompt lists.
    pub fn key(&self) -> &'static str {
        match self {
            Platform::ChatGpt => "chatgpt",
            Platform::Claude => "claude",
            Platform::Gemini => "gemini",
        }
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::ChatGpt => "ChatGPT",
            Platform::Claude => "Claude",
            Platform::Gemini => "Gemini",
        }
    }
}

/// Result of asking one platform one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The service returned generated text.
    Answered(String),
    /// The request failed; the reason is kept for the record.
    Failed(String),
}

impl QueryOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, QueryOutcome::Failed(_))
    }

    /// The text stored for this outcome. Failures carry the error marker.
    pub fn text(&self) -> String {
        match self {
            QueryOutcome::Answered(text) => text.clone(),
            QueryOutcome::Failed(reason) => format!("{}: {}", ERROR_MARKER, reason),
        }
    }
}

/// A prompt sent to every platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEntry {
    /// Buyer segment the prompt targets.
    pub category: String,
    /// The question asked.
    pub text: String,
}

impl PromptEntry {
    pub fn new(category: &str, text: &str) -> Self {
        Self {
            category: category.to_string(),
            text: text.to_string(),
        }
    }
}

/// One (platform, prompt) result within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub category: String,
    pub prompt: String,
    /// Whether the brand was mentioned. Always false for failed queries.
    pub mentioned: bool,
    /// Whether the query failed.
    pub error: bool,
    /// First 300 characters of the recorded text.
    pub response_snippet: String,
}

impl ResponseRecord {
    /// Build a record from a prompt, its outcome and the detector's verdict.
    pub fn new(prompt: &PromptEntry, outcome: &QueryOutcome, mentioned: bool) -> Self {
        let error = outcome.is_failure();
        Self {
            category: prompt.category.clone(),
            prompt: prompt.text.clone(),
            mentioned: mentioned && !error,
            error,
            response_snippet: outcome.text().chars().take(SNIPPET_CHARS).collect(),
        }
    }
}

/// Hit statistics for a single platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub hits: usize,
    pub total: usize,
    pub pct: i64,
}

/// A prompt together with the platforms that mentioned the brand for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptHits {
    pub prompt: String,
    pub category: String,
    pub platforms: Vec<Platform>,
}

/// Summary statistics of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_hits: usize,
    pub total_queries: usize,
    pub overall_pct: i64,
    pub per_platform: BTreeMap<Platform, PlatformStats>,
    /// Prompts mentioned on at least one platform, in catalog order.
    #[serde(with = "prompt_map")]
    pub winning_prompts: Vec<PromptHits>,
    /// Prompts mentioned nowhere, in catalog order.
    #[serde(with = "prompt_map")]
    pub gap_prompts: Vec<PromptHits>,
    /// Change in `overall_pct` against the previous snapshot.
    pub wow_delta: Option<i64>,
}

/// Full record of one weekly run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// ISO date of the run (`YYYY-MM-DD`).
    pub week: String,
    pub platforms: BTreeMap<Platform, Vec<ResponseRecord>>,
    pub summary: Summary,
}

impl Snapshot {
    /// Number of prompts asked per platform.
    pub fn prompts_per_platform(&self) -> usize {
        self.platforms.values().map(Vec::len).max().unwrap_or(0)
    }
}

/// Prompt lists stored as `{prompt: {category, platforms}}` objects.
///
/// Entries are written and read back in document order.
mod prompt_map {
    use super::{Platform, PromptHits};
    use serde::de::{MapAccess, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    #[derive(Serialize)]
    struct EntryRef<'a> {
        category: &'a str,
        platforms: &'a [Platform],
    }

    #[derive(Deserialize)]
    struct Entry {
        #[serde(default)]
        category: String,
        #[serde(default)]
        platforms: Vec<Platform>,
    }

    pub fn serialize<S: Serializer>(hits: &[PromptHits], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(hits.iter().map(|hit| {
            (
                &hit.prompt,
                EntryRef {
                    category: &hit.category,
                    platforms: &hit.platforms,
                },
            )
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<PromptHits>, D::Error> {
        deserializer.deserialize_map(PromptMapVisitor)
    }

    struct PromptMapVisitor;

    impl<'de> Visitor<'de> for PromptMapVisitor {
        type Value = Vec<PromptHits>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of prompt text to category and platforms")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut hits = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((prompt, entry)) = map.next_entry::<String, Entry>()? {
                hits.push(PromptHits {
                    prompt,
                    category: entry.category,
                    platforms: entry.platforms,
                });
            }
            Ok(hits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_order() {
        assert!(Platform::ChatGpt < Platform::Claude);
        assert!(Platform::Claude < Platform::Gemini);
        assert_eq!(Platform::ALL[0], Platform::ChatGpt);
    }

    #[test]
    fn test_platform_serde_keys() {
        let json = serde_json::to_string(&Platform::ALL).unwrap();
        assert_eq!(json, r#"["chatgpt","claude","gemini"]"#);

        let parsed: Platform = serde_json::from_str("\"chatgpt\"").unwrap();
        assert_eq!(parsed, Platform::ChatGpt);
    }

    #[test]
    fn test_failed_outcome_text() {
        let outcome = QueryOutcome::Failed("timed out".to_string());
        assert!(outcome.is_failure());
        assert_eq!(outcome.text(), "ERROR: timed out");
    }

    #[test]
    fn test_record_snippet_is_char_bounded() {
        let prompt = PromptEntry::new("Competitive", "What is upfitting?");
        let long = "é".repeat(500);
        let record = ResponseRecord::new(&prompt, &QueryOutcome::Answered(long), false);
        assert_eq!(record.response_snippet.chars().count(), SNIPPET_CHARS);
        assert!(!record.error);
    }

    #[test]
    fn test_failed_record_never_mentioned() {
        let prompt = PromptEntry::new("Competitive", "Who does upfitting?");
        let outcome = QueryOutcome::Failed("fleetTEC is down".to_string());
        let record = ResponseRecord::new(&prompt, &outcome, true);
        assert!(record.error);
        assert!(!record.mentioned);
        assert!(record.response_snippet.starts_with("ERROR: "));
    }

    fn summary_with_prompts() -> Summary {
        Summary {
            total_hits: 1,
            total_queries: 6,
            overall_pct: 17,
            per_platform: BTreeMap::new(),
            winning_prompts: vec![PromptHits {
                prompt: "zeta".to_string(),
                category: "Competitive".to_string(),
                platforms: vec![Platform::ChatGpt, Platform::Gemini],
            }],
            gap_prompts: vec![
                PromptHits {
                    prompt: "beta".to_string(),
                    category: "Public Safety".to_string(),
                    platforms: Vec::new(),
                },
                PromptHits {
                    prompt: "alpha".to_string(),
                    category: "Energy/Utility".to_string(),
                    platforms: Vec::new(),
                },
            ],
            wow_delta: None,
        }
    }

    #[test]
    fn test_prompt_lists_serialize_as_prompt_keyed_maps() {
        let value = serde_json::to_value(summary_with_prompts()).unwrap();
        assert_eq!(
            value["winning_prompts"],
            serde_json::json!({"zeta": {"category": "Competitive", "platforms": ["chatgpt", "gemini"]}})
        );
        assert_eq!(
            value["gap_prompts"]["beta"],
            serde_json::json!({"category": "Public Safety", "platforms": []})
        );
    }

    #[test]
    fn test_prompt_map_keeps_document_order() {
        let json = serde_json::to_string(&summary_with_prompts()).unwrap();
        assert!(json.find("\"beta\"").unwrap() < json.find("\"alpha\"").unwrap());

        let parsed: Summary = serde_json::from_str(&json).unwrap();
        let gaps: Vec<&str> = parsed.gap_prompts.iter().map(|h| h.prompt.as_str()).collect();
        assert_eq!(gaps, vec!["beta", "alpha"]);
        assert_eq!(parsed, summary_with_prompts());
    }
}

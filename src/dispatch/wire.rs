//! Request and response shapes for each platform.
//!
//! Each service takes a single-turn prompt and returns generated text at a
//! different path in its response body.

use crate::error::QueryError;
use serde::{Deserialize, Serialize};

/// Anthropic API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A chat message in the OpenAI and Anthropic request bodies.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// OpenAI chat completions request.
#[derive(Debug, Serialize)]
pub struct OpenAiRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// OpenAI chat completions response.
#[derive(Debug, Deserialize)]
pub struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiResponse {
    /// `choices[0].message.content`
    pub fn into_text(self) -> Result<String, QueryError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| QueryError::Malformed("no choices[0].message.content".to_string()))
    }
}

/// Anthropic messages request.
#[derive(Debug, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

/// Anthropic messages response.
#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicResponse {
    /// `content[0].text`
    pub fn into_text(self) -> Result<String, QueryError> {
        self.content
            .into_iter()
            .next()
            .and_then(|b| b.text)
            .ok_or_else(|| QueryError::Malformed("no content[0].text".to_string()))
    }
}

/// Gemini generateContent request.
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GeminiRequest {
    pub fn single_turn(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

/// Gemini generateContent response.
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiResponse {
    /// `candidates[0].content.parts[0].text`
    pub fn into_text(self) -> Result<String, QueryError> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| {
                QueryError::Malformed("no candidates[0].content.parts[0].text".to_string())
            })
    }
}

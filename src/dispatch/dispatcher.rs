//! Sequential dispatcher.
//!
//! Every prompt is sent to every platform one request at a time, platform
//! outer loop and prompt inner loop, with a fixed pause between requests.
//! Failures are captured as [`QueryOutcome::Failed`] and never retried.

use crate::config::{Config, Credentials};
use crate::dispatch::wire::{
    AnthropicRequest, AnthropicResponse, ChatMessage, GeminiRequest, GeminiResponse,
    OpenAiRequest, OpenAiResponse, ANTHROPIC_VERSION,
};
use crate::error::QueryError;
use crate::models::{Platform, PromptEntry, QueryOutcome};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcomes per platform, in catalog order.
pub type PlatformResults = BTreeMap<Platform, Vec<QueryOutcome>>;

/// Everything the dispatcher needs besides the HTTP client.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub openai_url: String,
    pub anthropic_url: String,
    pub gemini_url: String,
    pub openai_model: String,
    pub anthropic_model: String,
    pub gemini_model: String,
    pub openai_api_key: String,
    pub anthropic_api_key: String,
    pub gemini_api_key: String,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    pub delay: Duration,
}

impl DispatchSettings {
    pub fn new(config: &Config, credentials: &Credentials) -> Self {
        Self {
            openai_url: config.platforms.openai_url.clone(),
            anthropic_url: config.platforms.anthropic_url.clone(),
            gemini_url: config.platforms.gemini_url.clone(),
            openai_model: config.platforms.openai_model.clone(),
            anthropic_model: config.platforms.anthropic_model.clone(),
            gemini_model: config.platforms.gemini_model.clone(),
            openai_api_key: credentials.openai_api_key.clone(),
            anthropic_api_key: credentials.anthropic_api_key.clone(),
            gemini_api_key: credentials.gemini_api_key.clone(),
            max_tokens: config.dispatch.max_tokens,
            timeout_seconds: config.dispatch.timeout_seconds,
            delay: Duration::from_millis(config.dispatch.delay_ms),
        }
    }
}

/// Asks the platforms the prompt catalog.
pub struct Dispatcher {
    settings: DispatchSettings,
    http_client: reqwest::Client,
}

impl Dispatcher {
    pub fn new(settings: DispatchSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            settings,
            http_client,
        })
    }

    /// Query every platform with every prompt.
    pub async fn run_all(&self, prompts: &[PromptEntry]) -> PlatformResults {
        let mut results = PlatformResults::new();
        let mut first = true;

        for platform in Platform::ALL {
            info!("[{}] Querying {} prompts", platform.label(), prompts.len());
            let mut outcomes = Vec::with_capacity(prompts.len());

            for (i, prompt) in prompts.iter().enumerate() {
                if !first && !self.settings.delay.is_zero() {
                    tokio::time::sleep(self.settings.delay).await;
                }
                first = false;

                debug!(
                    "  {}/{}: {}",
                    i + 1,
                    prompts.len(),
                    prompt.text.chars().take(65).collect::<String>()
                );
                outcomes.push(self.query(platform, &prompt.text).await);
            }

            results.insert(platform, outcomes);
        }

        results
    }

    /// Ask one platform one prompt. Never fails; errors become `Failed`.
    pub async fn query(&self, platform: Platform, prompt: &str) -> QueryOutcome {
        let result = match platform {
            Platform::ChatGpt => self.query_openai(prompt).await,
            Platform::Claude => self.query_anthropic(prompt).await,
            Platform::Gemini => self.query_gemini(prompt).await,
        };

        match result {
            Ok(text) => QueryOutcome::Answered(text),
            Err(e) => {
                warn!("[{}] query failed: {}", platform.label(), e);
                QueryOutcome::Failed(e.to_string())
            }
        }
    }

    async fn query_openai(&self, prompt: &str) -> Result<String, QueryError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.settings.openai_url.trim_end_matches('/')
        );
        let request = OpenAiRequest {
            model: self.settings.openai_model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: self.settings.max_tokens,
        };

        let builder = self
            .http_client
            .post(&url)
            .bearer_auth(&self.settings.openai_api_key)
            .json(&request);

        let response: OpenAiResponse = self.send(builder).await?;
        response.into_text()
    }

    async fn query_anthropic(&self, prompt: &str) -> Result<String, QueryError> {
        let url = format!(
            "{}/v1/messages",
            self.settings.anthropic_url.trim_end_matches('/')
        );
        let request = AnthropicRequest {
            model: self.settings.anthropic_model.clone(),
            max_tokens: self.settings.max_tokens,
            messages: vec![ChatMessage::user(prompt)],
        };

        let builder = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.settings.anthropic_api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request);

        let response: AnthropicResponse = self.send(builder).await?;
        response.into_text()
    }

    async fn query_gemini(&self, prompt: &str) -> Result<String, QueryError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.gemini_url.trim_end_matches('/'),
            self.settings.gemini_model
        );

        let builder = self
            .http_client
            .post(&url)
            .query(&[("key", self.settings.gemini_api_key.as_str())])
            .json(&GeminiRequest::single_turn(prompt));

        let response: GeminiResponse = self.send(builder).await?;
        response.into_text()
    }

    /// Send a request and decode a 2xx JSON body.
    ///
    /// Transport errors carry no URL, so query-string keys stay out of the
    /// recorded failure text.
    async fn send<R: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<R, QueryError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                QueryError::Timeout(self.settings.timeout_seconds)
            } else {
                QueryError::Http(e.without_url())
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                QueryError::Timeout(self.settings.timeout_seconds)
            } else {
                QueryError::Http(e.without_url())
            }
        })?;

        if !status.is_success() {
            return Err(QueryError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| QueryError::Malformed(e.to_string()))
    }
}

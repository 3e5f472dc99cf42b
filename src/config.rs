//! Configuration handling.
//!
//! Tunables (brand, prompt catalog, dispatch timing, report layout) come
//! from an optional `.visibility-tracker.toml`. API keys and the webhook URL
//! come from the environment and are validated once at startup.

use crate::catalog;
use crate::error::ConfigError;
use crate::models::PromptEntry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".visibility-tracker.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Brand detection settings.
    #[serde(default)]
    pub brand: BrandConfig,

    /// Request timing settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Models and endpoints per platform.
    #[serde(default)]
    pub platforms: PlatformsConfig,

    /// Report layout settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Prompt catalog.
    #[serde(default = "catalog::default_prompts")]
    pub prompts: Vec<PromptEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            brand: BrandConfig::default(),
            dispatch: DispatchConfig::default(),
            platforms: PlatformsConfig::default(),
            report: ReportConfig::default(),
            prompts: catalog::default_prompts(),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding the weekly snapshots.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Brand detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    /// Display name used in the report.
    #[serde(default = "default_brand_name")]
    pub name: String,

    /// Spellings counted as a mention (case-insensitive).
    #[serde(default = "catalog::default_brand_variants")]
    pub variants: Vec<String>,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: default_brand_name(),
            variants: catalog::default_brand_variants(),
        }
    }
}

fn default_brand_name() -> String {
    catalog::DEFAULT_BRAND_NAME.to_string()
}

/// Request timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Pause between consecutive requests, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Maximum tokens requested from the chat platforms.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            delay_ms: default_delay_ms(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_delay_ms() -> u64 {
    400
}

fn default_max_tokens() -> u32 {
    800
}

/// Models and base URLs for each platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformsConfig {
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_openai_url")]
    pub openai_url: String,

    #[serde(default = "default_anthropic_url")]
    pub anthropic_url: String,

    #[serde(default = "default_gemini_url")]
    pub gemini_url: String,
}

impl Default for PlatformsConfig {
    fn default() -> Self {
        Self {
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            gemini_model: default_gemini_model(),
            openai_url: default_openai_url(),
            anthropic_url: default_anthropic_url(),
            gemini_url: default_gemini_url(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_model() -> String {
    "claude-haiku-4-5-20251001".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_openai_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_anthropic_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

/// Report layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Maximum winning prompts listed.
    #[serde(default = "default_max_winning")]
    pub max_winning: usize,

    /// Maximum gap prompts listed before the "more" line.
    #[serde(default = "default_max_gaps")]
    pub max_gaps: usize,

    /// Characters of each prompt shown.
    #[serde(default = "default_prompt_width")]
    pub prompt_width: usize,

    /// Category order for the gap list; unknown categories go last.
    #[serde(default = "catalog::default_category_priority")]
    pub category_priority: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_winning: default_max_winning(),
            max_gaps: default_max_gaps(),
            prompt_width: default_prompt_width(),
            category_priority: catalog::default_category_priority(),
        }
    }
}

fn default_max_winning() -> usize {
    8
}

fn default_max_gaps() -> usize {
    6
}

fn default_prompt_width() -> usize {
    72
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Reject settings the tracker cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prompts.is_empty() {
            return Err(ConfigError::Invalid("prompt catalog is empty".to_string()));
        }
        if self.brand.variants.iter().all(|v| v.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "brand.variants must contain at least one non-empty spelling".to_string(),
            ));
        }
        if self.dispatch.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "dispatch.timeout_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

/// Secrets read from the environment.
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub anthropic_api_key: String,
    pub gemini_api_key: String,
    pub slack_webhook_url: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("anthropic_api_key", &"<redacted>")
            .field("gemini_api_key", &"<redacted>")
            .field("slack_webhook_url", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Load credentials, reading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Build credentials from an env-var lookup function.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let require = |var: &str| -> Result<String, ConfigError> {
            match lookup(var) {
                Ok(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(ConfigError::MissingEnvVar(var.to_string())),
            }
        };

        Ok(Self {
            openai_api_key: require("OPENAI_API_KEY")?,
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            gemini_api_key: require("GEMINI_API_KEY")?,
            slack_webhook_url: require("SLACK_WEBHOOK_URL")?,
        })
    }
}

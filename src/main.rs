//! Visibility Tracker - weekly brand visibility across AI assistants
//!
//! Asks ChatGPT, Claude and Gemini a catalog of buyer questions, detects
//! brand mentions in the answers, stores a weekly JSON snapshot and posts a
//! summary to a Slack webhook.
//!
//! Exit codes:
//!   0 - Report delivered
//!   1 - Startup error (missing credentials, bad config) or delivery failure

mod analysis;
mod catalog;
mod cli;
mod config;
mod delivery;
mod detect;
mod dispatch;
mod error;
mod models;
mod report;
mod store;
mod tracker;

use anyhow::{Context, Result};
use chrono::Local;
use cli::Args;
use config::{Config, Credentials};
use delivery::WebhookClient;
use dispatch::{DispatchSettings, Dispatcher};
use report::ReportOptions;
use store::SnapshotStore;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Visibility Tracker v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default config file.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize the brand, prompts and report layout.");
    Ok(())
}

/// Initialize logging. `RUST_LOG` wins over the verbosity flags.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load credentials and config, then run this week's pass.
async fn run(args: Args) -> Result<i32> {
    let credentials = Credentials::from_env()?;

    let config = load_config(&args)?;
    config.validate()?;

    let week = Local::now().date_naive().format("%Y-%m-%d").to_string();
    run_week(&config, &credentials, &week).await
}

/// Query, save, format and deliver one weekly report. Returns the exit code.
///
/// Only delivery decides the exit code; a failed save is logged.
async fn run_week(config: &Config, credentials: &Credentials, week: &str) -> Result<i32> {
    let store = SnapshotStore::open(&config.general.data_dir)?;
    debug!("Snapshot directory: {}", store.dir().display());

    let dispatcher = Dispatcher::new(DispatchSettings::new(config, credentials))?;
    let tracker = tracker::Tracker::new(config, dispatcher, &store);

    let snapshot = tracker.run(week).await;

    match store.save(&snapshot) {
        Ok(path) => info!("Saved snapshot to {}", path.display()),
        Err(e) => error!("Failed to save snapshot: {}", e),
    }

    let message = report::format_report(&snapshot, &ReportOptions::from(config));
    info!("Report preview:\n{}", message);

    let webhook = WebhookClient::new(&credentials.slack_webhook_url)?;
    if let Err(e) = webhook.send(&message).await {
        error!("Slack delivery failed: {}", e);
        return Ok(1);
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default()? {
        Some(config) => {
            info!("Loaded config from {}", config::DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PromptEntry;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const WEEK: &str = "2026-10-12";

    fn config_for(server: &MockServer, data_dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.general.data_dir = data_dir.to_path_buf();
        config.dispatch.delay_ms = 0;
        config.dispatch.timeout_seconds = 5;
        config.platforms.openai_url = server.uri();
        config.platforms.anthropic_url = server.uri();
        config.platforms.gemini_url = server.uri();
        config.prompts = vec![PromptEntry::new("Competitive", "Who upfits police cars?")];
        config
    }

    fn credentials_for(server: &MockServer) -> Credentials {
        Credentials {
            openai_api_key: "k".to_string(),
            anthropic_api_key: "k".to_string(),
            gemini_api_key: "k".to_string(),
            slack_webhook_url: format!("{}/hook", server.uri()),
        }
    }

    async fn mount_webhook(server: &MockServer, status: u16) {
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_delivered_report_exits_zero() {
        let server = MockServer::start().await;
        mount_webhook(&server, 200).await;
        let dir = TempDir::new().unwrap();

        let config = config_for(&server, dir.path());
        let code = run_week(&config, &credentials_for(&server), WEEK).await.unwrap();

        assert_eq!(code, 0);
        assert!(dir.path().join("week_2026-10-12.json").is_file());
    }

    #[tokio::test]
    async fn test_failed_save_still_delivers_and_rejection_exits_one() {
        let server = MockServer::start().await;
        mount_webhook(&server, 500).await;
        let dir = TempDir::new().unwrap();
        // A directory in the snapshot's place makes the write fail.
        let blocked = dir.path().join("week_2026-10-12.json");
        std::fs::create_dir(&blocked).unwrap();

        let config = config_for(&server, dir.path());
        let code = run_week(&config, &credentials_for(&server), WEEK).await.unwrap();

        assert_eq!(code, 1);
        assert!(blocked.is_dir());
        let hooks = server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.url.path() == "/hook")
            .count();
        assert_eq!(hooks, 1);
    }

    #[tokio::test]
    async fn test_failed_save_with_delivered_report_exits_zero() {
        let server = MockServer::start().await;
        mount_webhook(&server, 200).await;
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("week_2026-10-12.json")).unwrap();

        let config = config_for(&server, dir.path());
        let code = run_week(&config, &credentials_for(&server), WEEK).await.unwrap();

        assert_eq!(code, 0);
    }
}

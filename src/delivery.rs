//! Report delivery to a Slack incoming webhook.

use crate::error::DeliveryError;
use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

const DELIVERY_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Posts report text to a single webhook URL.
pub struct WebhookClient {
    http_client: reqwest::Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DELIVERY_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            url: url.to_string(),
        })
    }

    /// Send `{"text": message}`. Only HTTP 200 counts as delivered.
    pub async fn send(&self, message: &str) -> Result<(), DeliveryError> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&WebhookPayload { text: message })
            .send()
            .await
            .map_err(|e| DeliveryError::Http(e.without_url()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Report delivered to webhook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_posts_text_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/T/B/X"))
            .and(body_json(serde_json::json!({"text": "hello team"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = WebhookClient::new(&format!("{}/services/T/B/X", server.uri())).unwrap();
        client.send("hello team").await.unwrap();
    }

    #[tokio::test]
    async fn test_non_200_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no_service"))
            .mount(&server)
            .await;

        let client = WebhookClient::new(&server.uri()).unwrap();
        let err = client.send("hello").await.unwrap_err();
        assert!(matches!(
            err,
            DeliveryError::Rejected { status: 404, ref body } if body == "no_service"
        ));
    }

    #[tokio::test]
    async fn test_other_2xx_is_still_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = WebhookClient::new(&server.uri()).unwrap();
        assert!(client.send("hello").await.is_err());
    }

    #[tokio::test]
    async fn test_transport_error_hides_webhook_url() {
        let client = WebhookClient::new("http://127.0.0.1:1/services/T0/B0/SECRETTOKEN").unwrap();
        let err = client.send("hello").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Http(_)));
        assert!(!err.to_string().contains("SECRETTOKEN"));
    }
}

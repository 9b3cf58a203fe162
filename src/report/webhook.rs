//! Fire-and-forget notification sink.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

/// Accepts a finished report for delivery.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, report: &str) -> Result<()>;
}

/// Body shape expected by the webhook: `{"payload": {"report": ...}}`
pub fn webhook_payload(report: &str) -> serde_json::Value {
    json!({
        "payload": {
            "report": report
        }
    })
}

pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        WebhookSink {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn notify(&self, report: &str) -> Result<()> {
        info!("📨 [Webhook] Transmitting report ({} chars)", report.len());
        let resp = self
            .client
            .post(&self.url)
            .json(&webhook_payload(report))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_nests_report() {
        let body = webhook_payload("Acquire now.");
        assert_eq!(body, json!({"payload": {"report": "Acquire now."}}));
    }

    #[tokio::test]
    async fn unreachable_webhook_errors() {
        let sink = WebhookSink::new(reqwest::Client::new(), "http://127.0.0.1:9/hook");
        assert!(matches!(sink.notify("x").await, Err(Error::Http(_))));
    }
}

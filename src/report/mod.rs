//! Executive report stage
//!
//! Turns the session's prime target into a short investment rationale and
//! hands it to a notification sink. Two failure points only:
//! - generator failure falls back to a templated report
//! - sink failure is logged and ignored (no retry)

pub mod gemini;
pub mod prompt;
pub mod sanitizer;
pub mod webhook;

use crate::swarm::House;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use gemini::{GeminiReportGenerator, ReportGenerator};
pub use prompt::{build_prompt, fallback_report, ANALYSIS_HEADER};
pub use sanitizer::sanitize_vocabulary;
pub use webhook::{webhook_payload, NotificationSink, WebhookSink};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Generated,
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportOutcome {
    /// Text as sent to the sink
    pub text: String,
    pub source: ReportSource,
    pub delivered: bool,
    pub generated_at: DateTime<Utc>,
}

impl ReportOutcome {
    /// Text for display. Generated reports get the analysis header the
    /// fallback template already carries.
    pub fn display(&self) -> String {
        match self.source {
            ReportSource::Generated => format!("{}\n\n{}", ANALYSIS_HEADER, self.text),
            ReportSource::Fallback => self.text.clone(),
        }
    }
}

/// Generate a report for `target` and deliver it to `sink` if one is given.
pub async fn deliver_report(
    target: &House,
    generator: &dyn ReportGenerator,
    sink: Option<&dyn NotificationSink>,
) -> ReportOutcome {
    info!(
        "📝 [Report] Generating investment rationale (yield {:.1}%, risk {:.0})",
        target.yield_pct, target.risk
    );

    let (text, source) = match generator.generate(target).await {
        Ok(raw) => {
            let (clean, _) = sanitize_vocabulary(&raw);
            (clean, ReportSource::Generated)
        }
        Err(e) => {
            warn!("[Report] Generator failed, using fallback: {}", e);
            (fallback_report(target), ReportSource::Fallback)
        }
    };

    let delivered = match sink {
        Some(sink) => match sink.notify(&text).await {
            Ok(()) => {
                info!("✅ [Webhook] Executive report delivered");
                true
            }
            Err(e) => {
                warn!("[Webhook] Delivery failed (ignored): {}", e);
                false
            }
        },
        None => {
            info!("[Webhook] No webhook configured; skipping delivery");
            false
        }
    };

    ReportOutcome {
        text,
        source,
        delivered,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedGenerator(&'static str);

    #[async_trait]
    impl ReportGenerator for CannedGenerator {
        async fn generate(&self, _target: &House) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ReportGenerator for FailingGenerator {
        async fn generate(&self, _target: &House) -> Result<String> {
            Err(Error::EmptyResponse)
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn notify(&self, report: &str) -> Result<()> {
            self.sent.lock().unwrap().push(report.to_string());
            Ok(())
        }
    }

    struct BrokenSink;

    #[async_trait]
    impl NotificationSink for BrokenSink {
        async fn notify(&self, _report: &str) -> Result<()> {
            Err(Error::Api {
                status: 500,
                body: "down".to_string(),
            })
        }
    }

    fn target() -> House {
        House::new(200.0, 300.0, 5.0, 20.0)
    }

    #[tokio::test]
    async fn generated_text_is_sanitized_and_sent() {
        let sink = RecordingSink::default();
        let outcome = deliver_report(
            &target(),
            &CannedGenerator("Negligible crime exposure."),
            Some(&sink),
        )
        .await;

        assert_eq!(outcome.source, ReportSource::Generated);
        assert_eq!(outcome.text, "Negligible Composite Risk Index exposure.");
        assert!(outcome.delivered);
        assert_eq!(sink.sent.lock().unwrap().as_slice(), [outcome.text.clone()]);
        assert!(outcome.display().starts_with("DeepMind Analysis:\n\n"));
    }

    #[tokio::test]
    async fn generator_failure_uses_fallback() {
        let sink = RecordingSink::default();
        let outcome = deliver_report(&target(), &FailingGenerator, Some(&sink)).await;

        assert_eq!(outcome.source, ReportSource::Fallback);
        assert_eq!(outcome.text, fallback_report(&target()));
        assert_eq!(outcome.display(), outcome.text);
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sink_failure_is_swallowed() {
        let outcome = deliver_report(&target(), &FailingGenerator, Some(&BrokenSink)).await;
        assert!(!outcome.delivered);
        assert_eq!(outcome.source, ReportSource::Fallback);
    }

    #[tokio::test]
    async fn no_sink_means_not_delivered() {
        let outcome = deliver_report(&target(), &CannedGenerator("Acquire."), None).await;
        assert!(!outcome.delivered);
        assert_eq!(outcome.text, "Acquire.");
    }

    #[tokio::test]
    async fn real_clients_fall_back_when_offline() {
        let client = reqwest::Client::new();
        let config = crate::core::config::ReportConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        let generator = GeminiReportGenerator::new(client.clone(), &config);
        let sink = WebhookSink::new(client, "http://127.0.0.1:9/hook");

        let outcome = deliver_report(&target(), &generator, Some(&sink)).await;
        assert_eq!(outcome.source, ReportSource::Fallback);
        assert!(!outcome.delivered);
    }
}

//! Generative-text client for investment rationales.

use super::prompt::build_prompt;
use crate::core::config::ReportConfig;
use crate::error::{Error, Result};
use crate::swarm::House;
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

/// Produces free-text rationale for a locked target.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, target: &House) -> Result<String>;
}

/// Client for a `generateContent` endpoint.
pub struct GeminiReportGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    max_output_tokens: u32,
}

impl GeminiReportGenerator {
    pub fn new(client: reqwest::Client, config: &ReportConfig) -> Self {
        GeminiReportGenerator {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            max_output_tokens: config.max_output_tokens,
        }
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!("{}/{}:generateContent?key={}", self.base_url, self.model, api_key)
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "maxOutputTokens": self.max_output_tokens
            }
        })
    }
}

#[async_trait]
impl ReportGenerator for GeminiReportGenerator {
    async fn generate(&self, target: &House) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(Error::MissingApiKey)?;
        let body = self.request_body(&build_prompt(target));

        info!("🧠 [Report] Requesting rationale from {}", self.model);
        let resp = self.client.post(self.endpoint(api_key)).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let error = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body: error.chars().take(200).collect(),
            });
        }

        let payload = resp.json::<serde_json::Value>().await?;
        extract_text(&payload).ok_or(Error::EmptyResponse)
    }
}

/// Concatenate the text parts of the first candidate.
pub fn extract_text(response: &serde_json::Value) -> Option<String> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>, base_url: &str) -> ReportConfig {
        ReportConfig {
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
            ..ReportConfig::default()
        }
    }

    #[test]
    fn extracts_candidate_text() {
        let response = json!({
            "candidates": [{
                "content": {"parts": [{"text": "First sentence. "}, {"text": "Second sentence.\n"}]}
            }]
        });
        assert_eq!(
            extract_text(&response).as_deref(),
            Some("First sentence. Second sentence.")
        );
    }

    #[test]
    fn empty_or_missing_text_is_none() {
        assert!(extract_text(&json!({"candidates": []})).is_none());
        assert!(extract_text(&json!({"candidates": [{"content": {"parts": [{"text": "  "}]}}]})).is_none());
        assert!(extract_text(&json!({"error": {"code": 429}})).is_none());
    }

    #[test]
    fn endpoint_shape() {
        let gen = GeminiReportGenerator::new(
            reqwest::Client::new(),
            &config(Some("k"), "https://example.test/v1beta/models/"),
        );
        assert_eq!(
            gen.endpoint("k"),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent?key=k"
        );
        let body = gen.request_body("hello");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let gen = GeminiReportGenerator::new(reqwest::Client::new(), &config(None, "http://127.0.0.1:9"));
        let err = gen.generate(&House::new(0.0, 0.0, 5.0, 20.0)).await.unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_http_error() {
        let gen = GeminiReportGenerator::new(reqwest::Client::new(), &config(Some("k"), "http://127.0.0.1:9"));
        let err = gen.generate(&House::new(0.0, 0.0, 5.0, 20.0)).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}

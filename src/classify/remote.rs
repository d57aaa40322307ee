// HTTP topic classifier client.
//
// The provider takes a JSON batch of texts and returns, per text, the
// candidate labels with probabilities. Results come back in the same
// order as the submitted texts; that positional contract is all that
// ties a label list to its text, so we verify it on every response.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::rate_limit::RateLimiter;
use crate::classify::traits::{TopicClassifier, TopicLabel};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default request pacing; classifier plans meter by the minute, one
/// call per second keeps a full snapshot build inside any of them.
const DEFAULT_REQUESTS_PER_SEC: u32 = 1;

pub struct RemoteClassifier {
    client: reqwest::Client,
    url: String,
    api_key: String,
    limiter: RateLimiter,
}

impl RemoteClassifier {
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("kith/0.1 (trust-decisions)")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for topic classifier")?;

        Ok(Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
            limiter: RateLimiter::per_second(DEFAULT_REQUESTS_PER_SEC),
        })
    }
}

#[async_trait]
impl TopicClassifier for RemoteClassifier {
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Vec<TopicLabel>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        self.limiter.acquire().await;

        debug!(batch_size = texts.len(), "Sending batch to topic classifier");

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&ClassifyRequest { text_list: texts })
            .send()
            .await
            .context("Classifier request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Classifier returned {}: {}", status, body);
        }

        let parsed: ClassifyResponse = response
            .json()
            .await
            .context("Failed to parse classifier response")?;

        if parsed.result.len() != texts.len() {
            bail!(
                "Classifier returned {} results for {} texts",
                parsed.result.len(),
                texts.len()
            );
        }

        Ok(parsed.result)
    }
}

// ===== Wire format =====

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text_list: &'a [String],
}

#[derive(Deserialize)]
struct ClassifyResponse {
    result: Vec<Vec<TopicLabel>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classifier_response() {
        let json = r#"{
            "result": [
                [
                    {"label": "music", "probability": 0.81},
                    {"label": "news", "probability": 0.12}
                ],
                []
            ]
        }"#;

        let parsed: ClassifyResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.result.len(), 2);
        assert_eq!(parsed.result[0][0].label, "music");
        assert!((parsed.result[0][0].probability - 0.81).abs() < 1e-9);
        assert!(parsed.result[1].is_empty());
    }

    #[test]
    fn test_request_body_shape() {
        let texts = vec!["first post".to_string(), "second post".to_string()];
        let body = serde_json::to_value(ClassifyRequest { text_list: &texts }).unwrap();
        assert_eq!(body["text_list"][0], "first post");
        assert_eq!(body["text_list"][1], "second post");
    }
}

use crate::config::GeminiConfig;
use crate::errors::RelayError;
use crate::providers::{ReplyProvider, outbound_http_client};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

/// Client for the Gemini `generateContent` endpoint.
///
/// Single-turn: one prompt in, one reply out. The relay keeps no
/// conversation history.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
            client: outbound_http_client(),
        }
    }

    /// Extract the first candidate's first text part.
    ///
    /// Total function: any missing level of the nested response maps to
    /// `RelayError::NoReply` rather than a panic or a partial value.
    fn parse_reply(json: &Value) -> Result<String> {
        let candidate = json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .ok_or(RelayError::NoReply)?;

        let text = candidate["content"]["parts"]
            .as_array()
            .and_then(|parts| parts.iter().find_map(|p| p["text"].as_str()))
            .ok_or(RelayError::NoReply)?;

        Ok(text.to_string())
    }
}

#[async_trait]
impl ReplyProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let payload = json!({
            "contents": [{
                "parts": [{
                    "text": prompt
                }]
            }]
        });

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::Api {
                message: format!("request to completion endpoint failed: {}", e),
                status: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(RelayError::Api {
                message: format!("completion endpoint returned {}: {}", status, body),
                status: Some(status.as_u16()),
            }
            .into());
        }

        let body: Value = resp.json().await.map_err(|e| RelayError::Api {
            message: format!("completion response was not valid JSON: {}", e),
            status: Some(status.as_u16()),
        })?;
        debug!("completion response received for model {}", self.model);

        Self::parse_reply(&body)
    }
}

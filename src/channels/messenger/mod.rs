//! Facebook Messenger platform integration.
//!
//! Typed views over Meta's webhook delivery envelope, and the Graph API
//! client used to push replies back to the sender.

use crate::config::MessengerConfig;
use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

// --- Meta webhook payload types ---

/// Top-level webhook delivery from Meta. `object` is `"page"` for page
/// subscriptions; anything else is ignored by the gateway.
#[derive(Debug, Deserialize)]
pub struct WebhookNotification {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

/// One batch entry; Meta may group several messaging events per entry.
#[derive(Debug, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

/// A single messaging event. Every field is optional so one malformed or
/// non-message event (read receipt, delivery confirmation, postback) can be
/// skipped without failing the whole batch.
#[derive(Debug, Deserialize)]
pub struct MessagingEvent {
    #[serde(default)]
    pub sender: Option<EventSender>,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
pub struct EventSender {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct EventMessage {
    /// Absent for attachment-only messages.
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagingEvent {
    /// Sender id and message text, if this event is a text message.
    pub fn text_message(&self) -> Option<(&str, &str)> {
        let sender = self.sender.as_ref()?;
        let text = self.message.as_ref()?.text.as_deref()?;
        if sender.id.is_empty() || text.is_empty() {
            return None;
        }
        Some((sender.id.as_str(), text))
    }
}

// --- Outbound send API ---

/// Client for the Graph send-message API.
pub struct MessengerClient {
    access_token: String,
    api_base: String,
    client: Client,
}

impl MessengerClient {
    pub fn new(config: &MessengerConfig) -> Self {
        Self {
            access_token: config.page_access_token.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client: Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Deliver a text reply to one recipient.
    ///
    /// The page access token travels as a query parameter, which is how the
    /// Graph API authenticates send calls.
    pub async fn send_text(&self, recipient_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/me/messages", self.api_base);
        let payload = json!({
            "recipient": {"id": recipient_id},
            "message": {"text": text},
            "messaging_type": "RESPONSE",
        });

        let response = self
            .client
            .post(&url)
            .query(&[("access_token", self.access_token.as_str())])
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(anyhow::anyhow!("graph API error ({}): {}", status, body));
        }

        debug!("reply delivered to {}", recipient_id);
        Ok(())
    }
}

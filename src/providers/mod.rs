pub mod gemini;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Connect timeout for outbound API clients (seconds).
pub(crate) const CONNECT_TIMEOUT_SECS: u64 = 10;
/// Overall request timeout for outbound API clients (seconds).
pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Build a `reqwest::Client` with the standard outbound timeouts
/// (10 s connect, 30 s overall).
///
/// Falls back to the default client if the builder fails.
pub(crate) fn outbound_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// A completion backend that turns one user prompt into reply text.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

use std::env;

use crate::errors::RelayError;

// Graph API version is pinned; Meta retires old versions on a schedule.
const DEFAULT_GRAPH_API_BASE: &str = "https://graph.facebook.com/v18.0";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Process-wide configuration, built once at startup and injected into the
/// gateway. There is no ambient/global configuration state.
#[derive(Debug, Clone)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub messenger: MessengerConfig,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Clone)]
pub struct MessengerConfig {
    /// Page access token for the Graph send-message API.
    pub page_access_token: String,
    /// Shared secret for the webhook ownership handshake.
    pub verify_token: String,
    pub api_base: String,
}

impl std::fmt::Debug for MessengerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessengerConfig")
            .field("page_access_token", &redact(&self.page_access_token))
            .field("verify_token", &redact(&self.verify_token))
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "[empty]" } else { "[REDACTED]" }
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// `PAGE_ACCESS_TOKEN`, `VERIFY_TOKEN` and `AI_API_KEY` are required;
    /// every missing variable is reported in a single error. Empty values
    /// count as missing.
    pub fn from_env() -> Result<Self, RelayError> {
        let mut missing = Vec::new();
        let page_access_token = required_var("PAGE_ACCESS_TOKEN", &mut missing);
        let verify_token = required_var("VERIFY_TOKEN", &mut missing);
        let api_key = required_var("AI_API_KEY", &mut missing);
        if !missing.is_empty() {
            return Err(RelayError::Config(format!(
                "missing required environment variable(s): {}",
                missing.join(", ")
            )));
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                RelayError::Config(format!("PORT is not a valid port number: {}", raw))
            })?,
            Err(_) => default_port(),
        };

        let config = Self {
            gateway: GatewayConfig {
                host: optional_var("HOST").unwrap_or_else(default_host),
                port,
            },
            messenger: MessengerConfig {
                page_access_token,
                verify_token,
                api_base: optional_var("GRAPH_API_BASE")
                    .unwrap_or_else(|| DEFAULT_GRAPH_API_BASE.to_string()),
            },
            gemini: GeminiConfig {
                api_key,
                model: optional_var("GEMINI_MODEL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                api_base: optional_var("GEMINI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.gateway.port == 0 {
            return Err(RelayError::Config("PORT must be > 0".into()));
        }
        if self.gateway.host.is_empty() {
            return Err(RelayError::Config("HOST must not be empty".into()));
        }
        if self.messenger.api_base.is_empty() {
            return Err(RelayError::Config("GRAPH_API_BASE must not be empty".into()));
        }
        if self.gemini.api_base.is_empty() {
            return Err(RelayError::Config(
                "GEMINI_API_BASE must not be empty".into(),
            ));
        }
        if self.gemini.model.is_empty() {
            return Err(RelayError::Config("GEMINI_MODEL must not be empty".into()));
        }
        Ok(())
    }
}

fn required_var(name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match optional_var(name) {
        Some(value) => value,
        None => {
            missing.push(name);
            String::new()
        }
    }
}

/// Read an env var, treating unset and empty identically.
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests;

use super::*;
use std::sync::Mutex;

/// Env vars are process-global; tests that touch them must not interleave.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const ALL_VARS: &[&str] = &[
    "PAGE_ACCESS_TOKEN",
    "VERIFY_TOKEN",
    "AI_API_KEY",
    "HOST",
    "PORT",
    "GRAPH_API_BASE",
    "GEMINI_API_BASE",
    "GEMINI_MODEL",
];

fn with_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let _guard = ENV_LOCK
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    for name in ALL_VARS {
        unsafe { env::remove_var(name) };
    }
    for (name, value) in vars {
        unsafe { env::set_var(name, value) };
    }
    let result = f();
    for (name, _) in vars {
        unsafe { env::remove_var(name) };
    }
    result
}

const REQUIRED: &[(&str, &str)] = &[
    ("PAGE_ACCESS_TOKEN", "page-token"),
    ("VERIFY_TOKEN", "verify-secret"),
    ("AI_API_KEY", "gemini-key"),
];

#[test]
fn test_from_env_defaults() {
    let config = with_env(REQUIRED, || Config::from_env().unwrap());
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.messenger.page_access_token, "page-token");
    assert_eq!(config.messenger.verify_token, "verify-secret");
    assert_eq!(config.messenger.api_base, "https://graph.facebook.com/v18.0");
    assert_eq!(config.gemini.api_key, "gemini-key");
    assert_eq!(config.gemini.model, "gemini-pro");
    assert_eq!(
        config.gemini.api_base,
        "https://generativelanguage.googleapis.com/v1beta"
    );
}

#[test]
fn test_from_env_missing_secrets_lists_all() {
    let err = with_env(&[], || Config::from_env().unwrap_err());
    let msg = err.to_string();
    assert!(msg.contains("PAGE_ACCESS_TOKEN"), "got: {}", msg);
    assert!(msg.contains("VERIFY_TOKEN"), "got: {}", msg);
    assert!(msg.contains("AI_API_KEY"), "got: {}", msg);
}

#[test]
fn test_from_env_empty_secret_counts_as_missing() {
    let vars = [
        ("PAGE_ACCESS_TOKEN", "page-token"),
        ("VERIFY_TOKEN", ""),
        ("AI_API_KEY", "gemini-key"),
    ];
    let err = with_env(&vars, || Config::from_env().unwrap_err());
    let msg = err.to_string();
    assert!(msg.contains("VERIFY_TOKEN"), "got: {}", msg);
    assert!(!msg.contains("PAGE_ACCESS_TOKEN"), "got: {}", msg);
}

#[test]
fn test_from_env_overrides() {
    let vars = [
        ("PAGE_ACCESS_TOKEN", "page-token"),
        ("VERIFY_TOKEN", "verify-secret"),
        ("AI_API_KEY", "gemini-key"),
        ("HOST", "127.0.0.1"),
        ("PORT", "9090"),
        ("GRAPH_API_BASE", "http://localhost:4000"),
        ("GEMINI_API_BASE", "http://localhost:4001"),
        ("GEMINI_MODEL", "gemini-2.0-flash"),
    ];
    let config = with_env(&vars, || Config::from_env().unwrap());
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 9090);
    assert_eq!(config.messenger.api_base, "http://localhost:4000");
    assert_eq!(config.gemini.api_base, "http://localhost:4001");
    assert_eq!(config.gemini.model, "gemini-2.0-flash");
}

#[test]
fn test_from_env_rejects_bad_port() {
    let vars = [
        ("PAGE_ACCESS_TOKEN", "page-token"),
        ("VERIFY_TOKEN", "verify-secret"),
        ("AI_API_KEY", "gemini-key"),
        ("PORT", "not-a-port"),
    ];
    let err = with_env(&vars, || Config::from_env().unwrap_err());
    assert!(err.to_string().contains("PORT"), "got: {}", err);
}

#[test]
fn test_from_env_rejects_port_zero() {
    let vars = [
        ("PAGE_ACCESS_TOKEN", "page-token"),
        ("VERIFY_TOKEN", "verify-secret"),
        ("AI_API_KEY", "gemini-key"),
        ("PORT", "0"),
    ];
    let err = with_env(&vars, || Config::from_env().unwrap_err());
    assert!(err.to_string().contains("PORT"), "got: {}", err);
}

#[test]
fn test_debug_redacts_secrets() {
    let config = with_env(REQUIRED, || Config::from_env().unwrap());
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("page-token"), "got: {}", rendered);
    assert!(!rendered.contains("verify-secret"), "got: {}", rendered);
    assert!(!rendered.contains("gemini-key"), "got: {}", rendered);
    assert!(rendered.contains("[REDACTED]"), "got: {}", rendered);
}

#[test]
fn test_validate_rejects_empty_api_base() {
    let mut config = with_env(REQUIRED, || Config::from_env().unwrap());
    config.gemini.api_base = String::new();
    assert!(config.validate().is_err());
}

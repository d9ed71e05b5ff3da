//! HTTP surface for the relay.
//!
//! One route, two methods: GET serves Meta's webhook ownership handshake,
//! POST receives batched messaging events and drives the reply pipeline.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{debug, error, info, warn};

use crate::channels::messenger::{MessengerClient, WebhookNotification};
use crate::config::Config;
use crate::providers::gemini::GeminiProvider;
use crate::relay::ReplyPipeline;

/// Max webhook payload size: 1 MB.
const WEBHOOK_MAX_BODY: usize = 1_048_576;

/// Fixed acknowledgment body Meta expects for event deliveries.
const EVENT_ACK: &str = "EVENT_RECEIVED";
const VERIFICATION_FAILED: &str = "VERIFICATION_FAILED";
const INVALID_REQUEST: &str = "INVALID_REQUEST";

/// Shared state for the webhook handlers.
pub struct AppState {
    verify_token: String,
    pipeline: ReplyPipeline,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let provider = Arc::new(GeminiProvider::new(&config.gemini));
        let messenger = MessengerClient::new(&config.messenger);
        Self {
            verify_token: config.messenger.verify_token.clone(),
            pipeline: ReplyPipeline::new(provider, messenger),
        }
    }
}

/// Query parameters of the verification handshake.
#[derive(Debug, Deserialize)]
struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

/// Build the webhook router.
pub fn app(config: &Config) -> Router {
    let state = Arc::new(AppState::new(config));
    Router::new()
        .route(
            "/webhook",
            get(verify_handler)
                .post(event_handler)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

/// GET /webhook: Meta's webhook ownership handshake.
///
/// This is the only path allowed to answer with a non-200 status; event
/// deliveries are always acknowledged (see `event_handler`).
async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyQuery>,
) -> Response {
    let (Some(mode), Some(token)) = (query.mode.as_deref(), query.verify_token.as_deref()) else {
        debug!("verification request missing hub.mode or hub.verify_token");
        return (StatusCode::BAD_REQUEST, INVALID_REQUEST).into_response();
    };

    let token_matches: bool = token
        .as_bytes()
        .ct_eq(state.verify_token.as_bytes())
        .into();
    if mode != "subscribe" || !token_matches {
        warn!("webhook verification failed: mode={}", mode);
        return (StatusCode::FORBIDDEN, VERIFICATION_FAILED).into_response();
    }

    match query.challenge {
        Some(challenge) => {
            info!("WEBHOOK_VERIFIED");
            (StatusCode::OK, challenge).into_response()
        }
        None => {
            warn!("verification request missing hub.challenge");
            (StatusCode::BAD_REQUEST, INVALID_REQUEST).into_response()
        }
    }
}

/// POST /webhook: batched messaging-event delivery.
///
/// Always acknowledges with 200: a non-2xx here makes the platform retry
/// with backoff and redeliver, which would mean duplicate replies. Malformed
/// payloads are skipped per event, never failed per request.
async fn event_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    if body.len() > WEBHOOK_MAX_BODY {
        warn!("webhook payload too large ({} bytes)", body.len());
        return StatusCode::PAYLOAD_TOO_LARGE.into_response();
    }

    let notification: WebhookNotification = match serde_json::from_slice(&body) {
        Ok(notification) => notification,
        Err(e) => {
            debug!("ignoring unparseable webhook body: {}", e);
            return (StatusCode::OK, EVENT_ACK).into_response();
        }
    };

    if notification.object != "page" {
        debug!("ignoring webhook for object: {}", notification.object);
        return (StatusCode::OK, EVENT_ACK).into_response();
    }

    // Events within one delivery are independent; process them in platform
    // order, one at a time.
    for entry in &notification.entry {
        for event in &entry.messaging {
            let Some((sender_id, text)) = event.text_message() else {
                debug!("skipping non-text messaging event");
                continue;
            };
            debug!("inbound message from {} ({} bytes)", sender_id, text.len());
            state.pipeline.handle_message(sender_id, text).await;
        }
    }

    (StatusCode::OK, EVENT_ACK).into_response()
}

async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
}

/// Start the webhook server. Runs until shutdown is requested.
pub async fn start(config: &Config) -> Result<()> {
    let router = app(config);
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("webhook endpoint listening on {}/webhook", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            // Keep serving; without a signal handler there is nothing to wait for
            error!("failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

use crate::channels::messenger::MessengerClient;
use crate::errors::RelayError;
use crate::providers::ReplyProvider;
use std::sync::Arc;
use tracing::error;

/// Reply sent when the completion endpoint answers but no reply text can be
/// extracted from the candidates.
pub const FALLBACK_NO_REPLY: &str = "দুঃখিত, আমি এই মুহূর্তে উত্তর তৈরি করতে পারছি না।";

/// Reply sent when the completion endpoint cannot be reached at all
/// (transport failure, timeout, or non-2xx status).
pub const FALLBACK_UNREACHABLE: &str =
    "AI এর সাথে সংযোগ করতে একটি সমস্যা হয়েছে। দয়া করে পরে চেষ্টা করুন।";

/// One-shot pipeline bridging an inbound message to the completion service
/// and back out through the send API.
pub struct ReplyPipeline {
    provider: Arc<dyn ReplyProvider>,
    messenger: MessengerClient,
}

impl ReplyPipeline {
    pub fn new(provider: Arc<dyn ReplyProvider>, messenger: MessengerClient) -> Self {
        Self {
            provider,
            messenger,
        }
    }

    /// Run the full pipeline for one inbound text message.
    ///
    /// Never fails: a completion error degrades to the fixed fallback reply
    /// and a delivery error is logged and dropped, so the webhook handler
    /// can always acknowledge the platform.
    pub async fn handle_message(&self, sender_id: &str, text: &str) {
        let reply = match self.provider.generate(text).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("completion failed for sender {}: {}", sender_id, e);
                fallback_reply(&e).to_string()
            }
        };

        if let Err(e) = self.messenger.send_text(sender_id, &reply).await {
            error!("failed to send reply to {}: {}", sender_id, e);
        }
    }
}

/// Pick the user-facing fallback for a failed completion call.
fn fallback_reply(e: &anyhow::Error) -> &'static str {
    match e.downcast_ref::<RelayError>() {
        Some(RelayError::NoReply) => FALLBACK_NO_REPLY,
        _ => FALLBACK_UNREACHABLE,
    }
}

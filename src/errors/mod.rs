use thiserror::Error;

/// Typed error hierarchy for pagebot.
///
/// Used at module boundaries (completion calls, config validation).
/// Internal helpers stay on `anyhow::Result`; the `Internal` variant
/// converts via `?`.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure, timeout, or non-2xx status from the completion
    /// endpoint.
    #[error("Completion API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    /// The completion endpoint answered 2xx but no reply text could be
    /// extracted from the candidates.
    #[error("completion response contained no reply text")]
    NoReply,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

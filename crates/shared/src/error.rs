use thiserror::Error;

/// Shown instead of the raw cause when the backend could not be reached at all.
pub const NETWORK_FAILURE_MESSAGE: &str = "Generation failed due to a network error.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language code '{0}'")]
pub struct UnknownLanguage(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP error {status}: {body}")]
    Server { status: u16, body: String },
    /// No response arrived (connection refused, reset, DNS, ...).
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("failed to read reference audio '{path}': {reason}")]
    ReferenceAudio { path: String, reason: String },
    #[error("failed to store synthesized audio: {0}")]
    Storage(String),
}

impl SynthesisError {
    /// Text suitable for the result view.
    pub fn user_message(&self) -> String {
        match self {
            SynthesisError::Transport(_) => NETWORK_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SynthesisError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

//! Error types for the scoring client.

use std::path::PathBuf;
use std::time::Duration;

use hts_model::ModelError;
use thiserror::Error;

/// Errors that can occur while scoring a feature vector.
///
/// A response that parsed but carried no prediction is not an error; it is
/// reported as [`hts_model::RiskOutcome::NoResult`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScoringError {
    /// Connection, TLS or body transfer failure.
    #[error("network error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("scoring endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(String),

    /// A prediction was present but unusable.
    #[error("invalid prediction: {0}")]
    InvalidProbability(#[from] ModelError),

    /// The caller's deadline elapsed before a response arrived.
    #[error("scoring request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the request.
    #[error("scoring request cancelled")]
    Cancelled,
}

impl ScoringError {
    /// Returns a user-friendly error message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Transport(_) => {
                "Could not reach the risk scoring service. Please check the network connection."
            }
            Self::Status { .. } => "The risk scoring service reported an error.",
            Self::Parse(_) | Self::InvalidProbability(_) => {
                "The risk scoring service returned an unexpected response."
            }
            Self::Timeout(_) => "The risk scoring service did not respond in time.",
            Self::Cancelled => "Risk scoring was cancelled.",
        }
    }

    /// Returns whether a later attempt could plausibly succeed.
    ///
    /// The client never retries on its own; this is a hint for the host.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Parse(_) | Self::InvalidProbability(_) | Self::Cancelled => false,
        }
    }
}

impl From<reqwest::Error> for ScoringError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ScoringError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type alias for scoring operations.
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Errors raised while loading [`crate::ScoringSettings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid scoring config: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

use reqwest::StatusCode;
use shared::config::ConfigError;
use std::sync::Arc;
use thiserror::Error;

/// Message every caller sees when the server invalidated the session.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please login again";

/// Shortest password the registration flow accepts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Failure of a client call.
///
/// Cloneable so a single settled outcome can be handed to every caller that
/// joined the same in-flight request.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Network failure, timeout, or unreadable response stream.
    #[error("request failed: {0}")]
    Transport(#[source] Arc<reqwest::Error>),

    /// The server answered with a non-success HTTP status and no envelope.
    #[error("request failed with status {0}")]
    Status(StatusCode),

    /// The server no longer accepts the session; local state was cleared.
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    SessionExpired,

    /// The envelope carried a non-200 code.
    #[error("{message}")]
    Api { code: i64, message: String },

    /// The body was not the JSON shape the call expects.
    #[error("invalid response body: {0}")]
    Decode(#[source] Arc<serde_json::Error>),

    #[error(transparent)]
    Callback(#[from] CallbackError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Envelope code, when the failure came from one.
    #[must_use]
    pub const fn code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            Self::Callback(CallbackError::Rejected { code, .. }) => Some(*code),
            _ => None,
        }
    }

    /// HTTP status, when the failure came from one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Arc::new(err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(Arc::new(err))
    }
}

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Why an OAuth2/OIDC callback exchange failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CallbackError {
    #[error("OAuth callback redirected")]
    Redirected,

    #[error("OAuth callback returned non-JSON response")]
    NonJson,

    #[error("{}", .message.as_deref().unwrap_or("OAuth callback failed"))]
    Rejected { code: i64, message: Option<String> },
}

/// Registration input rejected before any request was made.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,

    #[error("Email is required")]
    MissingEmail,
}

// ── Core error types ──
//
// `CoreError` is for failures that escape to the caller (building the
// context, storage setup). Request failures inside a view never escape:
// they are classified as a `Failure` and folded into the view's feedback.

use thiserror::Error;

use crate::lifecycle::FieldErrors;
use crate::storage::StorageError;

/// Generic message when no response arrived at all.
pub const CONNECTION_FAILED: &str = "Connection error";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Rejected by the server: {message}")]
    Rejected {
        message: String,
        status: Option<u16>,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<eventos_api::Error> for CoreError {
    fn from(err: eventos_api::Error) -> Self {
        match err {
            eventos_api::Error::Transport(ref e) if e.status().is_none() => {
                CoreError::ConnectionFailed {
                    url: e.url().map(ToString::to_string).unwrap_or_default(),
                    reason: err.to_string(),
                }
            }
            eventos_api::Error::Tls(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason,
            },
            eventos_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid API URL: {e}"),
            },
            ref e if e.is_unauthorized() => CoreError::AuthenticationFailed {
                message: e.server_message().unwrap_or("token rejected").to_owned(),
            },
            eventos_api::Error::Validation { ref errors, .. } => CoreError::ValidationFailed {
                message: errors
                    .iter()
                    .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
                    .collect::<Vec<_>>()
                    .join("; "),
            },
            eventos_api::Error::Api {
                status: 404,
                message,
            } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: message.unwrap_or_default(),
            },
            other => CoreError::Rejected {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

// ── Request failure classification ───────────────────────────────────

/// What went wrong with one attempt, as far as a view is concerned.
///
/// Every variant except `LocalValidation` and `AuthRequired` originates
/// from the network layer. Views turn these into feedback; they are never
/// returned to the code driving the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The form failed local checks; nothing was sent.
    LocalValidation(FieldErrors),
    /// The server returned per-field messages (first message per field).
    FieldValidation(FieldErrors),
    /// The server answered with an error status and maybe a message.
    Request {
        status: Option<u16>,
        message: Option<String>,
    },
    /// No response was received.
    Transport(String),
    /// A gated action was attempted without a session.
    AuthRequired,
}

impl Failure {
    /// The single-line message for this failure, using `fallback` when the
    /// server gave nothing better.
    pub fn message(&self, fallback: &str) -> String {
        match self {
            Self::Request {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Transport(_) => CONNECTION_FAILED.to_owned(),
            Self::FieldValidation(errors) => {
                let joined = errors.values().cloned().collect::<Vec<_>>().join("; ");
                if joined.is_empty() {
                    fallback.to_owned()
                } else {
                    joined
                }
            }
            _ => fallback.to_owned(),
        }
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => *status,
            Self::FieldValidation(_) => Some(400),
            _ => None,
        }
    }
}

impl From<eventos_api::Error> for Failure {
    fn from(err: eventos_api::Error) -> Self {
        match err {
            eventos_api::Error::Validation { errors, .. } => Self::FieldValidation(
                errors
                    .into_iter()
                    .filter_map(|(field, messages)| {
                        messages.into_iter().next().map(|first| (field, first))
                    })
                    .collect(),
            ),
            eventos_api::Error::Api { status, message } => Self::Request {
                status: Some(status),
                message,
            },
            eventos_api::Error::Transport(e) => match e.status() {
                Some(status) => Self::Request {
                    status: Some(status.as_u16()),
                    message: None,
                },
                None => Self::Transport(e.to_string()),
            },
            eventos_api::Error::InvalidUrl(e) => Self::Transport(e.to_string()),
            eventos_api::Error::Tls(reason) => Self::Transport(reason),
            eventos_api::Error::Deserialization { message, .. } => {
                tracing::debug!(%message, "unreadable response body");
                Self::Request {
                    status: None,
                    message: None,
                }
            }
        }
    }
}

/// Session-store login reports failures as plain messages.
impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::Request {
            status: None,
            message: Some(message),
        }
    }
}

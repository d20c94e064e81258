use reqwest::Method;
use reqwest::StatusCode;
use serde_json::Value;

use crate::validation::ValidationError;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend answered with a non-success status.
    #[error("{method} {url} failed: {status}; body={body}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        /// `message` field of a JSON error body, when present.
        message: Option<String>,
        body: String,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("decode error for {url}: {source}; body={body}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid API base URL: {0}")]
    BaseUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// 401 or 403: the backend refused the credentials. Transport failures,
    /// decode errors and other statuses say nothing about the session.
    pub fn is_credential_rejection(&self) -> bool {
        self.status()
            .is_some_and(|s| s == StatusCode::UNAUTHORIZED || s == StatusCode::FORBIDDEN)
    }

    /// The message to show a user: validation text, the backend's own
    /// `message`, or nothing.
    pub fn backend_message(&self) -> Option<String> {
        match self {
            Self::Validation(err) => Some(err.to_string()),
            Self::Status { message, .. } => message.clone(),
            _ => None,
        }
    }

    pub fn user_message(&self, fallback: &str) -> String {
        self.backend_message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Pull the `message` field out of an error body, if the body is JSON.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
}

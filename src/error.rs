//! Error types
//!
//! Every fallible call in the crate returns [`Result`]. Usage errors are
//! reported before any request is sent; API errors keep the raw response
//! body so callers can inspect what the server said.

use serde_json::Value;

/// Result type for Compute Engine calls
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by the Compute Engine client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller passed an unusable argument. Nothing was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API request failed: {status} {message}")]
    Api {
        status: u16,
        message: String,
        response: Option<Value>,
    },

    /// A finished operation reported an error member.
    #[error("operation {name} failed: {message}")]
    Operation {
        name: String,
        message: String,
        response: Value,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A success response whose body is not JSON. `response` holds the
    /// body text.
    #[error("failed to decode response: {source}")]
    UnexpectedResponse {
        source: serde_json::Error,
        response: Value,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Raw response body attached to the error, if any
    pub fn response(&self) -> Option<&Value> {
        match self {
            Self::Api { response, .. } => response.as_ref(),
            Self::Operation { response, .. } => Some(response),
            Self::UnexpectedResponse { response, .. } => Some(response),
            _ => None,
        }
    }

    /// HTTP status code for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the API reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Format an error for display to a user
/// Security: avoids echoing raw API bodies, which may contain project details
pub fn format_api_error(error: &Error) -> String {
    match error.status() {
        Some(403) => return "Permission denied. Check your GCP IAM permissions.".to_string(),
        Some(401) => {
            return "Authentication failed. Run 'gcloud auth application-default login'."
                .to_string()
        }
        Some(404) => return "Resource not found.".to_string(),
        Some(429) => return "Rate limit exceeded. Please try again later.".to_string(),
        Some(400) => return "Invalid request. Check your parameters.".to_string(),
        Some(409) => {
            return "Resource conflict. The resource may already exist or be in use.".to_string()
        }
        Some(500) | Some(503) => {
            return "Compute Engine temporarily unavailable. Please try again.".to_string()
        }
        _ => {}
    }

    let error_str = error.to_string();
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}

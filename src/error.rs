use std::fmt;

use rmcp::model::ErrorData;

/// A failure reported by the GitHub transport.
///
/// `status` is the HTTP status GitHub answered with; it is `None` when the
/// request never produced a response (DNS, TLS, connection reset, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub status: Option<u16>,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Build the error for a non-success answer. GitHub's JSON `message` is
    /// preferred; any other body (proxy HTML, plain text) is kept as is, and
    /// an empty body falls back to the status reason phrase.
    pub fn from_response(status: u16, reason: Option<&str>, body: &str) -> Self {
        let from_json = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| json.get("message")?.as_str().map(String::from));
        let message = match from_json {
            Some(message) => message,
            None if !body.trim().is_empty() => body.trim().to_string(),
            None => reason.unwrap_or("Unknown error").to_string(),
        };
        Self::new(Some(status), message)
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "GitHub API error ({}): {}", status, self.message),
            None => write!(f, "GitHub API error: {}", self.message),
        }
    }
}

impl std::error::Error for RemoteError {}

/// GitHub-shaped errors keep their status; failures below HTTP (connection,
/// TLS, invalid URI) carry none.
impl From<octocrab::Error> for RemoteError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                RemoteError::new(Some(source.status_code.as_u16()), source.message.clone())
            }
            other => RemoteError::new(None, other.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GithubOpsError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Could not resolve repository '{identifier}': {failure}")]
    Resolution {
        identifier: String,
        failure: RemoteError,
    },

    #[error("{operation} failed: {failure}")]
    RemoteOperation {
        operation: String,
        failure: RemoteError,
    },

    #[error("Invalid parameters for {operation}: {message}")]
    InvalidParams { operation: String, message: String },

    #[error("Tool not found: {0}")]
    NotFound(String),
}

pub type Result<T, E = GithubOpsError> = std::result::Result<T, E>;

impl GithubOpsError {
    /// Upstream HTTP status, when the error came from GitHub.
    pub fn status(&self) -> Option<u16> {
        match self {
            GithubOpsError::Resolution { failure, .. }
            | GithubOpsError::RemoteOperation { failure, .. } => failure.status,
            _ => None,
        }
    }

    pub fn to_mcp_error(&self) -> ErrorData {
        match self {
            GithubOpsError::NotFound(_) | GithubOpsError::InvalidParams { .. } => {
                ErrorData::invalid_params(self.to_string(), None)
            }
            GithubOpsError::RemoteOperation { operation, failure } => ErrorData::internal_error(
                self.to_string(),
                Some(serde_json::json!({
                    "operation": operation,
                    "status": failure.status,
                })),
            ),
            GithubOpsError::Configuration(_) | GithubOpsError::Resolution { .. } => {
                ErrorData::internal_error(self.to_string(), None)
            }
        }
    }
}

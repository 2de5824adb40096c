use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::models::{MatchesError, UnknownInputFormat};
use crate::infrastructure::supervisor::SupervisorError;

/// Body the server sends when a request exceeded its server-side timeout
pub const TIMEOUT_MESSAGE: &str = "CoreNLP request timed out. Your document may be too long.";

/// Errors surfaced to callers of the annotation client
///
/// The client never retries on its own; [`AnnotationError::is_transient`] is a
/// hint for callers that want a retry policy.
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// The server reported that the request itself timed out
    #[error("Annotation timed out: {0}")]
    Timeout(String),

    /// Unsupported `inputFormat` property; raised before any network call
    #[error("Unrecognized inputFormat {0}")]
    InvalidInputFormat(String),

    /// Any other non-2xx response, with the body for diagnostics
    #[error("Annotation failed with {status}: {body}")]
    Annotation { status: StatusCode, body: String },

    /// The readiness gate gave up; the service could not be brought up
    #[error("Annotation service unavailable: {0}")]
    Unavailable(#[from] SupervisorError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode document: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Failed to serialize properties: {0}")]
    Properties(#[from] serde_json::Error),

    #[error(transparent)]
    Matches(#[from] MatchesError),
}

impl AnnotationError {
    /// Classify a non-2xx response.
    ///
    /// The status code decides that the request failed; the body decides
    /// whether it was the server-side timeout.
    pub fn from_response(status: StatusCode, body: String) -> Self {
        if body.trim() == TIMEOUT_MESSAGE {
            Self::Timeout(body)
        } else {
            Self::Annotation { status, body }
        }
    }

    /// Returns true if retrying the same request later may succeed
    ///
    /// ```
    /// use corenlp_client::infrastructure::corenlp::AnnotationError;
    /// use reqwest::StatusCode;
    ///
    /// let error = AnnotationError::from_response(StatusCode::SERVICE_UNAVAILABLE, "busy".to_string());
    /// assert!(error.is_transient());
    ///
    /// let error = AnnotationError::InvalidInputFormat("xml".to_string());
    /// assert!(!error.is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(e) => e.is_connect() || e.is_timeout(),
            Self::Annotation { status, .. } => matches!(
                *status,
                StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT
            ),
            _ => false,
        }
    }
}

impl From<UnknownInputFormat> for AnnotationError {
    fn from(err: UnknownInputFormat) -> Self {
        Self::InvalidInputFormat(err.0)
    }
}

/// Result type alias for annotation operations
pub type Result<T> = std::result::Result<T, AnnotationError>;

//! Error type shared by the gateway, the model service client and the server.
//!
//! Every variant maps to one HTTP status through [`HuginnError::status_code`];
//! the server turns errors into `{"error": "..."}` bodies at the handler
//! boundary.

/// Errors returned by huginn operations.
#[derive(Debug, thiserror::Error)]
pub enum HuginnError {
    // Caller errors
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Feedback was already submitted for this review.
    #[error("feedback already recorded for review {0}")]
    AlreadyRecorded(String),

    // Model service errors
    /// The model service answered with a non-success status.
    #[error("Model service error: {status}")]
    Upstream { status: u16, message: String },

    /// Transport-level failure (connect, timeout, reset) reaching the model service.
    #[error("Failed to connect to model service: {0}")]
    ServiceUnavailable(String),

    /// The model service answered 2xx with a body we could not decode.
    #[error("invalid response from model service: {0}")]
    InvalidResponse(String),

    /// Metric exposition could not be encoded.
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HuginnError {
    /// HTTP status this error is reported with at the handler boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            HuginnError::Validation(_) => 400,
            HuginnError::NotFound(_) => 404,
            HuginnError::AlreadyRecorded(_) => 409,
            HuginnError::ServiceUnavailable(_) => 503,
            HuginnError::Upstream { .. }
            | HuginnError::InvalidResponse(_)
            | HuginnError::Metrics(_)
            | HuginnError::Configuration(_) => 500,
        }
    }
}

impl From<reqwest::Error> for HuginnError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            HuginnError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            HuginnError::Upstream {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            // connect, timeout, body and redirect failures
            HuginnError::ServiceUnavailable(err.to_string())
        }
    }
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, HuginnError>;

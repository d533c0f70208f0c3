/// Lectern error types
#[derive(Debug, thiserror::Error)]
pub enum LecternError {
    /// Caller supplied invalid arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider unreachable or returned a non-success status
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// No response within the configured deadline
    #[error("Model timed out after {0} seconds")]
    ModelTimeout(u64),

    /// Provider signaled a rate or quota limit
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Model output did not follow the quiz format contract
    #[error("Malformed quiz response: {0}")]
    MalformedQuizResponse(String),

    /// Summarization failed after chunk recovery and merge retry
    #[error("Summarization failed: {0}")]
    SummarizationFailed(String),

    /// Transcript or document text could not be extracted
    #[error("Source extraction error: {0}")]
    SourceExtraction(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request was cancelled by the caller
    #[error("Operation cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LecternError {
    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create model unavailable error
    pub fn model_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    /// Create quota exceeded error
    pub fn quota_exceeded<S: Into<String>>(msg: S) -> Self {
        Self::QuotaExceeded(msg.into())
    }

    /// Create malformed quiz response error
    pub fn malformed_quiz<S: Into<String>>(msg: S) -> Self {
        Self::MalformedQuizResponse(msg.into())
    }

    /// Create summarization failed error
    pub fn summarization_failed<S: Into<String>>(msg: S) -> Self {
        Self::SummarizationFailed(msg.into())
    }

    /// Create source extraction error
    pub fn source_extraction<S: Into<String>>(msg: S) -> Self {
        Self::SourceExtraction(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Provider-side failures that may succeed on a second attempt
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ModelUnavailable(_) | Self::ModelTimeout(_) | Self::QuotaExceeded(_)
        )
    }
}

// HTTP response conversion
impl LecternError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::SourceExtraction(_) => 422,
            Self::QuotaExceeded(_) => 429,
            Self::Cancelled => 499,
            Self::MalformedQuizResponse(_) => 502,
            Self::SummarizationFailed(_) => 502,
            Self::ModelUnavailable(_) => 503,
            Self::ModelTimeout(_) => 504,
            Self::Config(_) => 500,
            Self::Io(_) => 500,
            Self::Json(_) => 400,
            Self::Other(_) => 500,
        }
    }
}

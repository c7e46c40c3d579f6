//! Analysis Error Types

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis request failed: {message}")]
    Request { message: String },

    #[error("Analysis service rejected credentials: {message}")]
    Auth { message: String },

    #[error("Analysis service rate limited the request")]
    RateLimited,

    #[error("Analysis service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Analysis response was not usable JSON: {message}")]
    MalformedResponse { message: String },

    #[error("Summary response could not be interpreted: {message}")]
    Summarization { message: String },
}

impl AnalysisError {
    /// Whether a retry of the same request could reasonably succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AnalysisError::Request { .. }
                | AnalysisError::RateLimited
                | AnalysisError::Unavailable { .. }
        )
    }
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

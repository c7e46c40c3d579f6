//! Source Error Types

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Repository source unavailable: {message}")]
    Unavailable { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Source request failed: {message}")]
    Request { message: String },

    #[error("Source rejected credentials: {message}")]
    Auth { message: String },

    #[error("Source rate limited the request")]
    RateLimited,

    #[error("Could not decode content of '{path}': {message}")]
    Decode { path: String, message: String },
}

impl SourceError {
    /// Whether a retry of the same request could reasonably succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SourceError::Request { .. }
                | SourceError::RateLimited
                | SourceError::Unavailable { .. }
        )
    }
}

/// Result type for repository source operations
pub type SourceResult<T> = Result<T, SourceError>;

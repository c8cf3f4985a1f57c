use thiserror::Error;

/// Errors surfaced by a provider backend
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-layer failure before or during the HTTP exchange
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// OS-level socket failure (refused, reset, timed out)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider answered with a non-success status
    #[error("upstream returned {status}: {message}")]
    Upstream {
        /// HTTP status code from the provider
        status: u16,
        /// Provider-supplied error body or reason phrase
        message: String,
    },

    /// Provider cannot be used without credentials
    #[error("missing credentials for provider '{0}'")]
    MissingCredentials(String),

    /// Error while consuming a response stream
    #[error("streaming error: {0}")]
    Streaming(String),
}

impl ProviderError {
    /// Status code carried by an upstream error, if any
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

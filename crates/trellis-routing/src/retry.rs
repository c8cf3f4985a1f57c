use std::io::ErrorKind;

use http::StatusCode;
use trellis_llm::ProviderError;

/// Whether a transport-level provider failure is worth re-attempting
///
/// Retryable: network-layer errors (connect failures, timeouts) and
/// OS-level connection refused/reset. Everything else is terminal for
/// the attempt.
pub fn is_retryable(err: &ProviderError) -> bool {
    match err {
        ProviderError::Transport(e) => e.is_timeout() || e.is_connect(),
        ProviderError::Io(e) => matches!(
            e.kind(),
            ErrorKind::TimedOut | ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset
        ),
        ProviderError::Upstream { .. } | ProviderError::MissingCredentials(_) | ProviderError::Streaming(_) => false,
    }
}

/// Whether an upstream HTTP status should drive a retry
///
/// True for 429 (upstream rate limit) and any 5xx.
pub fn status_code_is_retryable(code: StatusCode) -> bool {
    code == StatusCode::TOO_MANY_REQUESTS || code.is_server_error()
}

use uuid::Uuid;

/// Runtime context for one gateway request
///
/// Constructed once per inbound request by the server layer and shared
/// read-only across routing, admission, caching, and usage accounting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique request identifier, used as the idempotency key for
    /// usage records
    pub request_id: String,
    /// Tenant the request belongs to
    pub tenant: String,
    /// Use-case label driving route selection (e.g. "summarize")
    pub use_case: String,
    /// Caller identity for rate limiting (tenant, API key id, ...)
    pub caller: String,
}

impl RequestContext {
    /// Create a context with a fresh UUID v4 request id
    pub fn new(tenant: impl Into<String>, use_case: impl Into<String>, caller: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            tenant: tenant.into(),
            use_case: use_case.into(),
            caller: caller.into(),
        }
    }

    /// Create a context with an explicit request id
    ///
    /// Used when the caller supplies its own correlation id, e.g. for
    /// idempotent retries of the same logical request.
    pub fn with_request_id(
        request_id: impl Into<String>,
        tenant: impl Into<String>,
        use_case: impl Into<String>,
        caller: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            tenant: tenant.into(),
            use_case: use_case.into(),
            caller: caller.into(),
        }
    }
}

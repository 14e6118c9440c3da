//! Bearer credential formatting and redaction.

/// A token attached to a request's `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    /// The raw token.
    pub token: String,
    /// Token type (usually "Bearer")
    pub token_type: String,
}

impl BearerToken {
    /// Create a bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_type: "Bearer".to_string(),
        }
    }

    /// Wrap a stored token, treating blank as absent.
    pub fn from_stored(token: Option<&str>) -> Option<Self> {
        token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Self::new)
    }

    /// Get the authorization header value
    pub fn to_header_value(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }

    /// Header value safe for logs: scheme kept, token hidden.
    pub fn redacted(&self) -> String {
        redact_authorization(&self.to_header_value())
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("token_type", &self.token_type)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Redact an `Authorization` header value, keeping the auth scheme.
///
/// # Examples
///
/// ```
/// use taskdesk::client::bearer::redact_authorization;
///
/// assert_eq!(redact_authorization("Bearer abc.def"), "Bearer [REDACTED]");
/// assert_eq!(redact_authorization("opaque"), "[REDACTED]");
/// ```
pub fn redact_authorization(value: &str) -> String {
    match value.split_once(' ') {
        Some((scheme, _)) => format!("{} [REDACTED]", scheme),
        None => "[REDACTED]".to_string(),
    }
}

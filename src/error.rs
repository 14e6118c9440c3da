//! Error types for taskdesk.
//!
//! Two families of errors live here:
//!
//! - [`Error`]: local failures of the crate's own plumbing (configuration,
//!   credential storage, HTTP client construction).
//! - [`OperationFailure`]: the classified outcome of a failed remote
//!   operation. Its [`FailureKind`] decides whether the executor may recover
//!   through a credential refresh.

/// Message bodies the backend uses to report an access token it no longer
/// accepts. Matched exactly.
pub const AUTH_EXPIRED_PHRASES: [&str; 2] = ["Token has expired", "Token is not valid anymore"];

/// Errors raised by configuration, storage and client setup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration could not be parsed or is semantically invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem failure while reading or writing local state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The credential store rejected a read, write or clear.
    #[error("Credential store error: {0}")]
    Credentials(String),

    /// A value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid base URL: {}", err))
    }
}

/// Result type alias for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;

/// How a failed remote operation is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The access credential was rejected; a refresh may recover.
    AuthExpired,
    /// Any other failure. Surfaced verbatim, never retried.
    Other,
}

impl FailureKind {
    /// Classify a failure from its HTTP status (if any) and the backend's
    /// error message.
    ///
    /// A 401 status, or a message exactly equal to one of
    /// [`AUTH_EXPIRED_PHRASES`], is [`FailureKind::AuthExpired`]. Everything
    /// else, including network errors with no status, is
    /// [`FailureKind::Other`].
    ///
    /// # Examples
    ///
    /// ```
    /// use taskdesk::FailureKind;
    ///
    /// assert_eq!(FailureKind::classify(Some(401), ""), FailureKind::AuthExpired);
    /// assert_eq!(
    ///     FailureKind::classify(Some(400), "Token has expired"),
    ///     FailureKind::AuthExpired
    /// );
    /// assert_eq!(FailureKind::classify(Some(403), "Forbidden"), FailureKind::Other);
    /// assert_eq!(FailureKind::classify(None, "Network error: timeout"), FailureKind::Other);
    /// ```
    pub fn classify(status: Option<u16>, message: &str) -> Self {
        if status == Some(401) || AUTH_EXPIRED_PHRASES.contains(&message) {
            Self::AuthExpired
        } else {
            Self::Other
        }
    }
}

/// A classified remote operation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct OperationFailure {
    /// Whether the failure is recoverable through a refresh.
    pub kind: FailureKind,
    /// Message shown to the user.
    pub message: String,
}

impl OperationFailure {
    /// Create an expired-credential failure.
    pub fn auth_expired(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::AuthExpired,
            message: message.into(),
        }
    }

    /// Create an unrecoverable failure.
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Other,
            message: message.into(),
        }
    }

    /// Create a failure, classifying it from status and message.
    pub fn classified(status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: FailureKind::classify(status, &message),
            message,
        }
    }

    /// Returns `true` if a refresh may recover from this failure.
    pub fn is_auth_expired(&self) -> bool {
        self.kind == FailureKind::AuthExpired
    }
}

/// Outcome of a single remote operation.
pub type OperationResult<T> = std::result::Result<T, OperationFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_status_is_auth_expired() {
        assert_eq!(
            FailureKind::classify(Some(401), "whatever"),
            FailureKind::AuthExpired
        );
    }

    #[test]
    fn expiry_phrases_match_exactly() {
        for phrase in AUTH_EXPIRED_PHRASES {
            assert_eq!(
                FailureKind::classify(Some(400), phrase),
                FailureKind::AuthExpired
            );
        }
        assert_eq!(
            FailureKind::classify(Some(400), "token has expired"),
            FailureKind::Other
        );
        assert_eq!(
            FailureKind::classify(Some(400), "Token has expired."),
            FailureKind::Other
        );
    }

    #[test]
    fn other_statuses_are_other() {
        for status in [400, 403, 404, 422, 500, 502] {
            assert_eq!(
                FailureKind::classify(Some(status), "Bad things"),
                FailureKind::Other
            );
        }
        assert_eq!(FailureKind::classify(None, ""), FailureKind::Other);
    }

    #[test]
    fn classified_failure_keeps_message() {
        let failure = OperationFailure::classified(Some(500), "Internal Server Error");
        assert_eq!(failure.kind, FailureKind::Other);
        assert_eq!(failure.to_string(), "Internal Server Error");
        assert!(!failure.is_auth_expired());

        let failure = OperationFailure::classified(None, "Token is not valid anymore");
        assert!(failure.is_auth_expired());
    }

    #[test]
    fn error_display_messages() {
        let err = Error::Credentials("disk full".to_string());
        assert_eq!(err.to_string(), "Credential store error: disk full");

        let err = Error::Config("missing base_url".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing base_url");
    }
}

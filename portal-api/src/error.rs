use serde::{Deserialize, Serialize};

/// Unified error type for every portal API call.
///
/// The HTTP wrapper normalizes transport failures, non-2xx responses and
/// body decoding failures into these variants. All variants are serializable
/// so the UI layer can forward them as structured notifications.
///
/// There is no retry: a failure is returned to the caller after a single
/// attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ApiError {
    /// The request could not be delivered (DNS failure, connection refused, reset, ...).
    Network {
        /// Error details.
        detail: String,
    },

    /// The request was aborted because the configured timeout elapsed.
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        after_ms: u64,
    },

    /// The server answered with a non-2xx status.
    Http {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code supplied by the server, if any.
        code: Option<String>,
        /// Human-readable message (server-supplied or the status reason).
        message: String,
    },

    /// The bearer token could not be obtained from the token provider.
    Authentication {
        /// Error details.
        detail: String,
    },

    /// The response body could not be decoded.
    Parse {
        /// Details about the decode failure.
        detail: String,
    },

    /// The request body could not be serialized.
    Serialization {
        /// Details about the serialization failure.
        detail: String,
    },

    /// The request could not be built (bad base URL, invalid path, ...).
    InvalidRequest {
        /// Details about what is wrong.
        detail: String,
    },
}

impl ApiError {
    /// Whether this is expected behavior (user input, missing resource, ...), used for log levels.
    ///
    /// Returns `true` for client-side HTTP errors (4xx) and authentication failures,
    /// which should be logged at `warn`; everything else goes to `error`.
    /// **Keep this in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Http { status, .. } => (400..500).contains(status),
            Self::Authentication { .. } => true,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-supplied error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Whether the server rejected the bearer token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }

    /// Whether the error came from the transport rather than from the server.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { after_ms } => write!(f, "Request timed out after {after_ms}ms"),
            Self::Http {
                status,
                code,
                message,
            } => {
                if let Some(code) = code {
                    write!(f, "HTTP {status} ({code}): {message}")
                } else {
                    write!(f, "HTTP {status}: {message}")
                }
            }
            Self::Authentication { detail } => write!(f, "Authentication failed: {detail}"),
            Self::Parse { detail } => write!(f, "Failed to parse response: {detail}"),
            Self::Serialization { detail } => {
                write!(f, "Failed to serialize request: {detail}")
            }
            Self::InvalidRequest { detail } => write!(f, "Invalid request: {detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Convenience type alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;

//! Error types for the Manifold API boundary.
//!
//! Every call into the remote API returns `Result<T, ApiError>`. Non-200
//! responses are classified by status and carried as values so callers
//! must match on them before touching any payload.

use thiserror::Error;

/// Classified failure of a Manifold API call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP 400.
    #[error("bad request: {body}")]
    BadRequest {
        /// Raw response body.
        body: String,
    },

    /// HTTP 401.
    #[error("unauthorized: {body}")]
    Unauthorized {
        /// Raw response body.
        body: String,
    },

    /// HTTP 404.
    #[error("not found: {body}")]
    NotFound {
        /// Raw response body.
        body: String,
    },

    /// HTTP 500.
    #[error("internal server error: {body}")]
    ServerError {
        /// Raw response body.
        body: String,
    },

    /// Any other non-success status.
    #[error("unknown error (HTTP {status}): {body}")]
    Unknown {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Connection, DNS, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 200 response whose body did not match the expected shape.
    #[error("failed to decode {context}: {source}")]
    Decode {
        /// Endpoint the body came from.
        context: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An authenticated endpoint was called without an API key.
    #[error("endpoint {path} requires an API key but none is configured")]
    MissingCredentials {
        /// Endpoint path.
        path: String,
    },

    /// A request filter was rejected before sending.
    #[error("invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),
}

/// Status class of a classified HTTP failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    BadRequest,
    Unauthorized,
    NotFound,
    ServerError,
    Unknown,
}

impl StatusClass {
    /// Label used in logs and metrics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
            Self::Unknown => "unknown",
        }
    }
}

impl ApiError {
    /// Classify a non-success HTTP status into an error value.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => Self::BadRequest { body },
            401 => Self::Unauthorized { body },
            404 => Self::NotFound { body },
            500 => Self::ServerError { body },
            _ => Self::Unknown { status, body },
        }
    }

    /// Status class for HTTP-level failures, `None` for everything else.
    pub const fn status_class(&self) -> Option<StatusClass> {
        match self {
            Self::BadRequest { .. } => Some(StatusClass::BadRequest),
            Self::Unauthorized { .. } => Some(StatusClass::Unauthorized),
            Self::NotFound { .. } => Some(StatusClass::NotFound),
            Self::ServerError { .. } => Some(StatusClass::ServerError),
            Self::Unknown { .. } => Some(StatusClass::Unknown),
            _ => None,
        }
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Transport failures and 5xx responses are transient; 4xx and local
    /// errors are not.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::ServerError { .. } => true,
            Self::Unknown { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Short label for metrics.
    pub const fn kind(&self) -> &'static str {
        match self.status_class() {
            Some(class) => class.as_str(),
            None => match self {
                Self::Transport(_) => "transport",
                Self::Decode { .. } => "decode",
                Self::MissingCredentials { .. } => "missing_credentials",
                _ => "invalid_filter",
            },
        }
    }
}

/// Rejected filter parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Numeric parameter outside the range the endpoint accepts.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },

    /// Required text parameter was empty.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

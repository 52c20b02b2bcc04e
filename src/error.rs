use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Classified cause of a failed backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiErrorKind {
    /// Malformed or missing input. Raised locally before any request, or by a 400/422 response.
    Validation {
        status: Option<u16>,
        field: Option<String>,
    },
    Authentication,
    Authorization,
    NotFound,
    RateLimit {
        retry_after: Option<Duration>,
    },
    Server {
        status: u16,
    },
    /// Transport failure with no HTTP status (refused connection, DNS, reset).
    Network,
    Timeout {
        after: Duration,
    },
    /// Any other HTTP status.
    Http {
        status: u16,
        details: Option<Value>,
    },
    /// A 2xx response whose body did not have the expected shape.
    Decode,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            ApiErrorKind::Validation {
                status: None,
                field: None,
            },
            message,
        )
    }

    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::new(
            ApiErrorKind::Validation {
                status: None,
                field: Some(field.to_string()),
            },
            message,
        )
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            ApiErrorKind::Timeout { after },
            format!("Request timed out after {}ms", after.as_millis()),
        )
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }

    /// Map a non-2xx response onto the taxonomy.
    pub fn from_status(
        status: u16,
        message: impl Into<String>,
        details: Option<Value>,
        retry_after: Option<Duration>,
    ) -> Self {
        let kind = match status {
            400 | 422 => ApiErrorKind::Validation {
                status: Some(status),
                field: None,
            },
            401 => ApiErrorKind::Authentication,
            403 => ApiErrorKind::Authorization,
            404 => ApiErrorKind::NotFound,
            429 => ApiErrorKind::RateLimit { retry_after },
            500..=599 => ApiErrorKind::Server { status },
            _ => ApiErrorKind::Http { status, details },
        };
        Self::new(kind, message)
    }

    /// HTTP status that produced the error, if any.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ApiErrorKind::Validation { status, .. } => *status,
            ApiErrorKind::Authentication => Some(401),
            ApiErrorKind::Authorization => Some(403),
            ApiErrorKind::NotFound => Some(404),
            ApiErrorKind::RateLimit { .. } => Some(429),
            ApiErrorKind::Server { status } | ApiErrorKind::Http { status, .. } => Some(*status),
            ApiErrorKind::Network | ApiErrorKind::Timeout { .. } | ApiErrorKind::Decode => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            ApiErrorKind::Validation { .. } => "VALIDATION_ERROR",
            ApiErrorKind::Authentication => "AUTHENTICATION_ERROR",
            ApiErrorKind::Authorization => "AUTHORIZATION_ERROR",
            ApiErrorKind::NotFound => "NOT_FOUND",
            ApiErrorKind::RateLimit { .. } => "RATE_LIMIT_EXCEEDED",
            ApiErrorKind::Server { .. } => "SERVER_ERROR",
            ApiErrorKind::Network => "NETWORK_ERROR",
            ApiErrorKind::Timeout { .. } => "TIMEOUT",
            ApiErrorKind::Http { .. } => "API_ERROR",
            ApiErrorKind::Decode => "DECODE_ERROR",
        }
    }

    /// 429, 5xx and transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ApiErrorKind::RateLimit { .. } | ApiErrorKind::Server { .. } | ApiErrorKind::Network
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ApiErrorKind::Validation { .. } => write!(f, "Validation error: {}", self.message),
            ApiErrorKind::Authentication => write!(f, "Authentication error: {}", self.message),
            ApiErrorKind::Authorization => write!(f, "Authorization error: {}", self.message),
            ApiErrorKind::NotFound => write!(f, "Not found: {}", self.message),
            ApiErrorKind::RateLimit { .. } => write!(f, "Rate limited: {}", self.message),
            ApiErrorKind::Server { status } => {
                write!(f, "Server error (status {}): {}", status, self.message)
            }
            ApiErrorKind::Network => write!(f, "Network error: {}", self.message),
            ApiErrorKind::Timeout { .. } => write!(f, "{}", self.message),
            ApiErrorKind::Http { status, .. } => {
                write!(f, "API error (status {}): {}", status, self.message)
            }
            ApiErrorKind::Decode => write!(f, "Unexpected response: {}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

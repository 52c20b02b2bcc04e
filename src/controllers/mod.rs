//! Stateful views over the endpoint client.
//!
//! Each controller owns one paged collection, merges pages into it and turns
//! failures into an [`ErrorState`] the presentation layer can show. State sits behind
//! a lock that is never held across a network call, so independent controllers (and
//! reads of a controller's state) proceed while a request is in flight.

mod chats;
mod knowledge_base;
mod knowledge_gaps;

pub use chats::{filter_sessions_by_date, merge_messages, ChatsController, ChatsState};
pub use knowledge_base::{DocumentsController, DocumentsState};
pub use knowledge_gaps::{GapsController, GapsState};

use crate::error::{ApiError, ApiErrorKind};
use std::fmt;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Auth,
    NotFound,
    Network,
    Timeout,
    Api,
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Auth => "auth",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Network => "network",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Api => "api",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing description of the last failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorState {
    pub message: String,
    pub category: ErrorCategory,
}

impl ErrorState {
    /// Classify `err`, raised while trying to `action` (e.g. "load knowledge base gaps").
    pub fn classify(err: &ApiError, action: &str) -> Self {
        let (category, message) = match &err.kind {
            ApiErrorKind::Validation { .. } => (ErrorCategory::Validation, err.message.clone()),
            ApiErrorKind::Authentication => (
                ErrorCategory::Auth,
                "Authentication failed. Please sign in again.".to_string(),
            ),
            ApiErrorKind::Authorization => (
                ErrorCategory::Auth,
                "You do not have permission to perform this action.".to_string(),
            ),
            ApiErrorKind::NotFound => (
                ErrorCategory::NotFound,
                "The requested resource was not found.".to_string(),
            ),
            ApiErrorKind::Network => (
                ErrorCategory::Network,
                "Network connection failed. Please check your internet connection.".to_string(),
            ),
            ApiErrorKind::Timeout { .. } => (
                ErrorCategory::Timeout,
                "Request timed out. Please try again.".to_string(),
            ),
            ApiErrorKind::RateLimit { .. } => (
                ErrorCategory::Api,
                "Too many requests. Please wait a moment and try again.".to_string(),
            ),
            ApiErrorKind::Server { .. } | ApiErrorKind::Http { .. } => {
                let message = if err.message.is_empty() {
                    format!("Failed to {}", action)
                } else {
                    err.message.clone()
                };
                (ErrorCategory::Api, message)
            }
            ApiErrorKind::Decode => {
                let message = if err.message.is_empty() {
                    format!("Failed to {}", action)
                } else {
                    err.message.clone()
                };
                (ErrorCategory::Unknown, message)
            }
        };
        Self { message, category }
    }

    pub(crate) fn record(err: &ApiError, action: &str) -> Self {
        let state = Self::classify(err, action);
        error!(
            action,
            code = err.code(),
            status = ?err.status(),
            category = state.category.as_str(),
            "{}",
            err
        );
        state
    }
}

impl fmt::Display for ErrorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.category)
    }
}

impl std::error::Error for ErrorState {}

// SPDX-License-Identifier: GPL-3.0-or-later

use std::convert::Infallible;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, UnsplashError>;

/// Failure kinds raised by the search builder and the client.
///
/// Local validation failures are raised before any network activity. Remote
/// failures are classified by HTTP status. Every variant carries a human
/// readable message; remote variants also carry the originating status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsplashError {
    #[error("authentication failed ({status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("validation failed{}: {message}", field_suffix(.field))]
    Validation {
        status: Option<u16>,
        field: Option<String>,
        message: String,
    },

    #[error("resource not found ({status}): {message}")]
    NotFound { status: u16, message: String },

    #[error("rate limit exceeded ({status}): {message}")]
    RateLimit {
        status: u16,
        message: String,
        remaining: Option<u32>,
    },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("request timed out: {message}")]
    Timeout { message: String },

    #[error("unexpected client error{}: {message}", status_suffix(.status))]
    Client {
        status: Option<u16>,
        message: String,
    },
}

/// Discriminant of [`UnsplashError`] for call sites that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authentication,
    Validation,
    NotFound,
    RateLimit,
    Server,
    Timeout,
    Client,
}

impl UnsplashError {
    /// Local validation failure for a single builder field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            status: None,
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Server { .. } => ErrorKind::Server,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Client { .. } => ErrorKind::Client,
        }
    }

    /// HTTP status the failure originated from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::NotFound { status, .. }
            | Self::RateLimit { status, .. }
            | Self::Server { status, .. } => Some(*status),
            Self::Validation { status, .. } | Self::Client { status, .. } => *status,
            Self::Timeout { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Authentication { message, .. }
            | Self::Validation { message, .. }
            | Self::NotFound { message, .. }
            | Self::RateLimit { message, .. }
            | Self::Server { message, .. }
            | Self::Timeout { message }
            | Self::Client { message, .. } => message,
        }
    }

    /// Offending field for local validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Whether a caller may reasonably retry. The client itself never does.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RateLimit | ErrorKind::Server | ErrorKind::Timeout
        )
    }
}

impl From<Infallible> for UnsplashError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl From<reqwest::Error> for UnsplashError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                message: err.to_string(),
            }
        } else {
            Self::Client {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

fn field_suffix(field: &Option<String>) -> String {
    field
        .as_deref()
        .map(|f| format!(" for `{f}`"))
        .unwrap_or_default()
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

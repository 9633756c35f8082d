use crate::report::generator::QueryAttempt;
use reqwest::StatusCode;
use std::fmt;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Invalid command-line or report parameters
    InvalidArgument(String),
    /// OAuth token could not be obtained; the whole report is aborted
    TokenFetch { status: Option<StatusCode>, message: String },
    /// Flight search endpoint returned a non-success status
    UpstreamError { status: StatusCode, message: String },
    /// Response body could not be mapped into offers
    DecodeError(String),
    /// Every attempted query came back without offers; carries each
    /// attempt so failure reasons can still be reported
    NoFlightsFound { attempts: Vec<QueryAttempt> },
    /// HTTP request error (connection, timeout, TLS)
    HttpRequest(reqwest::Error),
    /// CSV export error
    Csv(csv::Error),
    /// Filesystem error
    Io(std::io::Error),
}

impl AppError {
    /// Whether this error must stop the report instead of being recorded
    /// against a single query.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::TokenFetch { .. } | Self::InvalidArgument(_)
        )
    }

    /// `(attempted, failed)` query counts for `NoFlightsFound`
    pub fn query_counts(&self) -> Option<(usize, usize)> {
        match self {
            Self::NoFlightsFound { attempts } => {
                let failed = attempts.iter().filter(|a| a.is_failed()).count();
                Some((attempts.len(), failed))
            }
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Self::TokenFetch {
                status: Some(status),
                message,
            } => write!(f, "Token request failed ({}): {}", status, message),
            Self::TokenFetch {
                status: None,
                message,
            } => write!(f, "Token request failed: {}", message),
            Self::UpstreamError { status, message } => {
                write!(f, "Upstream error ({}): {}", status, message)
            }
            Self::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            Self::NoFlightsFound { .. } => {
                let (attempted, failed) = self.query_counts().unwrap_or_default();
                write!(
                    f,
                    "No flights found ({} queries attempted, {} failed)",
                    attempted, failed
                )
            }
            Self::HttpRequest(err) => write!(f, "HTTP request error: {}", err),
            Self::Csv(err) => write!(f, "CSV error: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpRequest(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodeError(format!("JSON error: {}", err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

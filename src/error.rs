//! Error types shared across the crate.
//!
//! The fetch boundary reports every failure as a single [`FetchError`] value;
//! everything else (terminal IO, runtime setup, log file) flows through
//! [`anyhow`] as [`Result`].
//!
use thiserror::Error;

/// Crate-wide result for application plumbing.
pub type Result<T> = anyhow::Result<T>;

/// Message shown when the API could not be reached or did not answer in time.
pub const CONNECTIVITY_MESSAGE: &str =
    "No response from server. Please check your internet connection.";

/// Message used when a failure carries no usable description.
pub const GENERIC_MESSAGE: &str = "An unexpected error occurred";

/// Broad classification of a failed fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Connection refused, DNS failure, timeout: no response was received.
    Connectivity,
    /// The server answered with a non-success status.
    Server { status: u16, status_text: String },
    /// Anything else, e.g. a body that does not decode into user records.
    Other,
}

/// Normalized failure shape returned by the fetch boundary: `{ message, code? }`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
    pub code: Option<String>,
}

impl FetchError {
    pub fn connectivity(code: Option<&str>) -> Self {
        Self {
            kind: FetchErrorKind::Connectivity,
            message: CONNECTIVITY_MESSAGE.to_string(),
            code: code.map(str::to_string),
        }
    }

    /// Non-2xx response; the message embeds the numeric status and its reason phrase.
    pub fn server(status: u16, status_text: impl Into<String>) -> Self {
        let status_text = status_text.into();
        let code = if (400..500).contains(&status) {
            "bad_request"
        } else {
            "bad_response"
        };
        Self {
            message: format!("Server Error: {status} - {status_text}"),
            kind: FetchErrorKind::Server {
                status,
                status_text,
            },
            code: Some(code.to_string()),
        }
    }

    /// Unclassified failure. Blank details fall back to [`GENERIC_MESSAGE`].
    pub fn other(detail: impl Into<String>, code: Option<&str>) -> Self {
        let detail = detail.into();
        let message = if detail.trim().is_empty() {
            GENERIC_MESSAGE.to_string()
        } else {
            detail
        };
        Self {
            kind: FetchErrorKind::Other,
            message,
            code: code.map(str::to_string),
        }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self.kind, FetchErrorKind::Connectivity)
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for smoke checks

use thiserror::Error;

/// Reasons a check could not complete normally.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("service unreachable at {url}")]
    Unreachable { url: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("response is missing field `{field}`")]
    MissingField { field: String },

    #[error("invalid response body from {url}: {source}")]
    InvalidBody {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckError {
    /// Classify a transport error for `url`.
    pub fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Unreachable {
                url: url.to_string(),
            }
        } else if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Http(err)
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckError>;

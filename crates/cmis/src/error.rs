//! Error types for CMIS operations

use thiserror::Error;

/// Result type alias using the CMIS error
pub type Result<T> = std::result::Result<T, CmisError>;

/// CMIS client error types
#[derive(Error, Debug)]
pub enum CmisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to {action}: {status} {body}")]
    Status {
        action: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{action} response carried no cmis:objectId")]
    MissingObjectId { action: &'static str },

    #[error("Repository {0} not present in repositoryInfo response")]
    UnknownRepository(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Folder {folder_id} contents differ: expected {expected:?}, found {found:?}")]
    UnexpectedContents {
        folder_id: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

impl CmisError {
    /// HTTP status carried by a `Status` error
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            CmisError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

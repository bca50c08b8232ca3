//! Error types for the preview suite

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Test data setup failed: {0}")]
    Setup(#[source] docpreview_cmis::CmisError),

    #[error("CMIS error: {0}")]
    Cmis(#[from] docpreview_cmis::CmisError),

    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;

//! Error types for the evaluation harness
//!
//! Transport problems against the target site are not errors at this level:
//! evaluators turn them into failing results. What remains here is what
//! stops a run as a whole.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Common(#[from] siteeval_common::Error),

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;

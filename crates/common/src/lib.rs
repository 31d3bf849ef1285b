//! siteeval Common Library
//!
//! Data model, configuration and error types shared by the evaluation
//! harness and the command-line front end.

pub mod config;
pub mod error;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::{CategoryTargets, EvalConfig, ModelConfig, Thresholds};
pub use error::{Error, Result};
pub use report::{CategorySummary, Grade, RunMetadata, RunReport};
pub use types::*;

/// siteeval version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

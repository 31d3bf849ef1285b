//! Evaluation configuration
//!
//! Built once at process start and passed down explicitly. Values are
//! layered: built-in defaults, then an optional TOML file, then environment
//! variables. The CLI applies its own flags last.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{Category, Outcome};

pub const DEFAULT_WORKER_URL: &str = "https://icy-flower-c586.jsellers.workers.dev";

/// Evaluation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Site under evaluation
    pub target_worker_url: String,

    /// Query file (`{"test_queries": [...]}` or JSON lines)
    pub queries_file: PathBuf,

    /// Where snapshots and reports are written
    pub output_dir: PathBuf,

    /// Per-request timeout
    pub timeout_seconds: u64,

    /// Minimum vendor count used when a data freshness case gives none
    pub default_min_vendor_count: u64,

    /// Per-case pass thresholds
    pub thresholds: Thresholds,

    /// Per-category pass-rate targets shown in summaries
    pub category_targets: CategoryTargets,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            target_worker_url: DEFAULT_WORKER_URL.to_string(),
            queries_file: PathBuf::from("test-data/evaluation-queries.json"),
            output_dir: PathBuf::from("evaluation-results"),
            timeout_seconds: 30,
            default_min_vendor_count: 80,
            thresholds: Thresholds::default(),
            category_targets: CategoryTargets::default(),
        }
    }
}

impl EvalConfig {
    /// Load configuration from an optional TOML file, then apply the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            Some(path) => {
                tracing::warn!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from environment-style lookups.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WORKER_URL") {
            self.target_worker_url = url;
        }
        if let Some(path) = lookup("EVAL_QUERIES_FILE") {
            self.queries_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("EVAL_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(path);
        }
        if let Some(raw) = lookup("EVAL_TIMEOUT_SECONDS") {
            self.timeout_seconds = raw.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("EVAL_TIMEOUT_SECONDS is not a number: {}", raw))
            })?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.target_worker_url.trim();
        if url.is_empty() {
            return Err(Error::InvalidConfig("target worker URL is empty".to_string()));
        }
        if !url.to_ascii_lowercase().starts_with("http") {
            return Err(Error::InvalidConfig(format!(
                "target worker URL must be http(s): {}",
                url
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::InvalidConfig("timeout must be at least 1 second".to_string()));
        }
        Ok(())
    }

    /// Ensure the output directory exists. Safe to call repeatedly.
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Score thresholds a single result must reach to count as passed.
///
/// Route availability has no score threshold: it passes on exact status
/// equality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub feature_completeness: f64,
    pub data_freshness: f64,
    pub seo_validation: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            feature_completeness: 0.8,
            data_freshness: 0.8,
            seo_validation: 0.7,
        }
    }
}

impl Thresholds {
    pub fn passes(&self, category: Category, outcome: &Outcome) -> bool {
        match category {
            Category::RouteAvailability => outcome.check("status_match").unwrap_or(false),
            Category::FeatureCompleteness => outcome.score >= self.feature_completeness,
            Category::DataFreshness => outcome.score >= self.data_freshness,
            Category::SeoValidation => outcome.score >= self.seo_validation,
        }
    }
}

/// Pass-rate targets per category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTargets {
    pub route_availability: f64,
    pub feature_completeness: f64,
    pub data_freshness: f64,
    pub seo_validation: f64,
}

impl Default for CategoryTargets {
    fn default() -> Self {
        Self {
            route_availability: 0.95,
            feature_completeness: 0.90,
            data_freshness: 0.90,
            seo_validation: 0.85,
        }
    }
}

impl CategoryTargets {
    pub fn target(&self, category: Category) -> f64 {
        match category {
            Category::RouteAvailability => self.route_availability,
            Category::FeatureCompleteness => self.feature_completeness,
            Category::DataFreshness => self.data_freshness,
            Category::SeoValidation => self.seo_validation,
        }
    }
}

/// Model-selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub use_azure: bool,
    pub azure_deployment: String,
    pub azure_endpoint: String,
    pub azure_api_key: String,
    pub azure_api_version: String,
    pub openai_model: String,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    /// "azure" or "openai"
    pub default_model_type: String,
}

impl ModelConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            use_azure: true,
            azure_deployment: lookup("AZURE_OPENAI_DEPLOYMENT").unwrap_or_else(|| "gpt-4".to_string()),
            azure_endpoint: lookup("AZURE_OPENAI_ENDPOINT").unwrap_or_default(),
            azure_api_key: lookup("AZURE_OPENAI_API_KEY").unwrap_or_default(),
            azure_api_version: "2025-04-01-preview".to_string(),
            openai_model: lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4-turbo".to_string()),
            openai_api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: lookup("OPENAI_BASE_URL"),
            default_model_type: lookup("MODEL_TYPE").unwrap_or_else(|| "azure".to_string()),
        }
    }

    /// Copy with API keys masked, for display
    pub fn redacted(&self) -> Self {
        let mask = |key: &str| {
            if key.is_empty() {
                String::new()
            } else {
                "********".to_string()
            }
        };
        Self {
            azure_api_key: mask(&self.azure_api_key),
            openai_api_key: mask(&self.openai_api_key),
            ..self.clone()
        }
    }
}

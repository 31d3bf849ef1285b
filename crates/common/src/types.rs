//! Core types for siteeval

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Test category. Declaration order is the order categories run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    RouteAvailability,
    FeatureCompleteness,
    DataFreshness,
    SeoValidation,
}

impl Category {
    /// All categories in run order
    pub const ALL: [Category; 4] = [
        Category::RouteAvailability,
        Category::FeatureCompleteness,
        Category::DataFreshness,
        Category::SeoValidation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::RouteAvailability => "route_availability",
            Category::FeatureCompleteness => "feature_completeness",
            Category::DataFreshness => "data_freshness",
            Category::SeoValidation => "seo_validation",
        }
    }

    /// Human-readable title, e.g. "Route Availability"
    pub fn title(&self) -> &'static str {
        match self {
            Category::RouteAvailability => "Route Availability",
            Category::FeatureCompleteness => "Feature Completeness",
            Category::DataFreshness => "Data Freshness",
            Category::SeoValidation => "Seo Validation",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP method of a test case
///
/// Anything other than GET or POST is kept verbatim so the route evaluator
/// can report it back instead of failing the whole query file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Other(String),
}

impl Default for HttpMethod {
    fn default() -> Self {
        Self::Get
    }
}

impl From<String> for HttpMethod {
    fn from(s: String) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            _ => HttpMethod::Other(s),
        }
    }
}

impl From<HttpMethod> for String {
    fn from(m: HttpMethod) -> Self {
        m.to_string()
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Other(verb) => write!(f, "{}", verb.to_ascii_uppercase()),
        }
    }
}

/// One test case from the query file
///
/// Unknown fields in the source record are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    /// Absolute URL or a path resolved against the target URL
    pub endpoint: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default = "default_expected_status")]
    pub expected_status: u16,
    #[serde(default)]
    pub expected_contains: Vec<String>,
    #[serde(default)]
    pub seo_checks: BTreeMap<String, bool>,
    #[serde(default)]
    pub min_vendor_count: Option<u64>,
    #[serde(default)]
    pub validate_data: Option<String>,
    /// JSON body sent with POST requests
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

fn default_expected_status() -> u16 {
    200
}

/// Kind of failure that stopped an evaluation from scoring normally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Transport,
    HttpStatus,
    UnsupportedMethod,
    MalformedPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::new(FailureKind::Timeout, "Request timeout")
    }

    pub fn http_status(status: u16) -> Self {
        Self::new(FailureKind::HttpStatus, format!("HTTP {}", status))
    }

    pub fn unsupported_method(method: &HttpMethod) -> Self {
        Self::new(
            FailureKind::UnsupportedMethod,
            format!("Unsupported method: {}", method),
        )
    }

    pub fn malformed_payload(reason: impl std::fmt::Display) -> Self {
        Self::new(
            FailureKind::MalformedPayload,
            format!("Malformed payload: {}", reason),
        )
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// What an evaluator produces for a single test case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub score: f64,
    #[serde(default)]
    pub checks: BTreeMap<String, bool>,
    #[serde(default)]
    pub details: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub error: Option<Failure>,
}

impl Outcome {
    /// A zero-score outcome carrying a failure
    pub fn failed(failure: Failure) -> Self {
        Self {
            score: 0.0,
            error: Some(failure),
            ..Default::default()
        }
    }

    /// Score is the share of checks that passed, 1.0 when no check ran.
    pub fn from_checks(
        checks: BTreeMap<String, bool>,
        details: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            score: check_pass_rate(&checks),
            checks,
            details,
            error: None,
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn check(&self, name: &str) -> Option<bool> {
        self.checks.get(name).copied()
    }
}

/// Passed checks over total checks; vacuously 1.0
pub fn check_pass_rate(checks: &BTreeMap<String, bool>) -> f64 {
    if checks.is_empty() {
        return 1.0;
    }
    let passed = checks.values().filter(|v| **v).count();
    passed as f64 / checks.len() as f64
}

/// Result of evaluating one test case in one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub query_id: String,
    pub category: Category,
    pub endpoint: String,
    pub description: String,
    pub score: f64,
    pub passed: bool,
    #[serde(default)]
    pub checks: BTreeMap<String, bool>,
    #[serde(default)]
    pub details: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub error: Option<Failure>,
}

impl EvaluationResult {
    pub fn new(case: &TestCase, outcome: Outcome, passed: bool) -> Self {
        Self {
            query_id: case.id.clone(),
            category: case.category,
            endpoint: case.endpoint.clone(),
            description: case.description.clone(),
            score: outcome.score,
            passed,
            checks: outcome.checks,
            details: outcome.details,
            error: outcome.error,
        }
    }
}

//! siteeval Evaluation Harness
//!
//! Scores a deployed site against a list of test cases:
//! - Loads test cases from a query file
//! - Evaluates each case with one HTTP request and a category-specific scorer
//! - Aggregates pass counts per category and overall
//! - Persists a JSON snapshot and an HTML report
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Runner                                                      │
//! │    ├── load_queries(path) -> Vec<TestCase>                   │
//! │    ├── run_cases(&[TestCase]) -> RunReport                   │
//! │    │     ├── RouteAvailabilityEvaluator   (status + body)    │
//! │    │     ├── FeatureCompletenessEvaluator (substrings)       │
//! │    │     ├── DataFreshnessValidator       (JSON / keywords)  │
//! │    │     └── SeoValidator                 (HTML checks)      │
//! │    └── persist(&RunReport) -> Artifacts { json, html }       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  SiteClient (reqwest): GET/POST, timeout, redirects          │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod error;
pub mod evaluators;
pub mod queries;
pub mod report;
pub mod runner;
pub mod validators;

pub use client::{Fetched, SiteClient};
pub use error::{HarnessError, HarnessResult};
pub use evaluators::Evaluator;
pub use queries::load_queries;
pub use runner::Runner;

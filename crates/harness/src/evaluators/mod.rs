//! Evaluators: one scoring strategy per test category
//!
//! Every evaluator issues exactly one request per test case and never
//! returns an error. Transport problems come back as a zero-score
//! [`Outcome`] carrying a typed [`siteeval_common::Failure`].

use async_trait::async_trait;

use siteeval_common::{Category, Outcome, TestCase};

pub mod feature;
pub mod route;

pub use feature::{FeatureCompletenessEvaluator, FeatureParams};
pub use route::{RouteAvailabilityEvaluator, RouteParams};

/// Scores one category of test case against the live site
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Category this evaluator handles
    fn category(&self) -> Category;

    /// Evaluate a single test case
    async fn evaluate(&self, case: &TestCase) -> Outcome;
}

/// Lower-cased substring search, returning (found, missing) in input order
pub(crate) fn partition_keywords(haystack_lower: &str, keywords: &[String]) -> (Vec<String>, Vec<String>) {
    keywords
        .iter()
        .cloned()
        .partition(|keyword| haystack_lower.contains(&keyword.to_lowercase()))
}

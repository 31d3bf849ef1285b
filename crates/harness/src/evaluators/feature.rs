//! Feature completeness: does the page carry the content it should?

use async_trait::async_trait;
use std::collections::BTreeMap;

use siteeval_common::{Category, Outcome, TestCase};

use crate::client::{Fetched, SiteClient};
use crate::evaluators::{partition_keywords, Evaluator};

#[derive(Debug, Clone)]
pub struct FeatureParams {
    pub endpoint: String,
    /// Case-insensitive substrings, in order
    pub expected_contains: Vec<String>,
    pub expected_status: u16,
}

impl From<&TestCase> for FeatureParams {
    fn from(case: &TestCase) -> Self {
        Self {
            endpoint: case.endpoint.clone(),
            expected_contains: case.expected_contains.clone(),
            expected_status: case.expected_status,
        }
    }
}

pub struct FeatureCompletenessEvaluator {
    client: SiteClient,
}

impl FeatureCompletenessEvaluator {
    pub fn new(client: SiteClient) -> Self {
        Self { client }
    }

    pub async fn check(&self, params: &FeatureParams) -> Outcome {
        match self.client.get(&params.endpoint).await {
            Ok(response) => score_content(&response, params),
            Err(failure) => {
                let mut outcome = Outcome::failed(failure).with_detail("content_match_rate", 0.0);
                outcome.checks.insert("status_ok".to_string(), false);
                outcome
            }
        }
    }
}

#[async_trait]
impl Evaluator for FeatureCompletenessEvaluator {
    fn category(&self) -> Category {
        Category::FeatureCompleteness
    }

    async fn evaluate(&self, case: &TestCase) -> Outcome {
        self.check(&FeatureParams::from(case)).await
    }
}

/// Full credit needs the expected status and every substring. Anything
/// less earns half the content match rate.
pub fn score_content(response: &Fetched, params: &FeatureParams) -> Outcome {
    let status_ok = response.status == params.expected_status;
    let text = response.body.to_lowercase();
    let (found, missing) = partition_keywords(&text, &params.expected_contains);

    let content_match_rate = if params.expected_contains.is_empty() {
        1.0
    } else {
        found.len() as f64 / params.expected_contains.len() as f64
    };
    let score = if status_ok && content_match_rate == 1.0 {
        1.0
    } else {
        content_match_rate * 0.5
    };

    let mut checks = BTreeMap::new();
    checks.insert("status_ok".to_string(), status_ok);

    Outcome {
        score,
        checks,
        ..Default::default()
    }
    .with_detail("actual_status", response.status)
    .with_detail("expected_content_count", params.expected_contains.len())
    .with_detail("found_content_count", found.len())
    .with_detail("missing_content", missing)
    .with_detail("content_match_rate", content_match_rate)
}

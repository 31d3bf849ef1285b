//! Route availability: does the endpoint answer with the expected status?

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use siteeval_common::{Category, Failure, HttpMethod, Outcome, TestCase};

use crate::client::{Fetched, SiteClient};
use crate::evaluators::Evaluator;

/// Inputs for a route availability check
#[derive(Debug, Clone)]
pub struct RouteParams {
    pub endpoint: String,
    pub method: HttpMethod,
    pub expected_status: u16,
    /// JSON body for POST; `{}` when absent
    pub body: Option<Value>,
}

impl From<&TestCase> for RouteParams {
    fn from(case: &TestCase) -> Self {
        Self {
            endpoint: case.endpoint.clone(),
            method: case.method.clone(),
            expected_status: case.expected_status,
            body: case.body.clone(),
        }
    }
}

pub struct RouteAvailabilityEvaluator {
    client: SiteClient,
}

impl RouteAvailabilityEvaluator {
    pub fn new(client: SiteClient) -> Self {
        Self { client }
    }

    pub async fn check(&self, params: &RouteParams) -> Outcome {
        let fetched = match &params.method {
            HttpMethod::Get => self.client.get(&params.endpoint).await,
            HttpMethod::Post => {
                let empty = Value::Object(Default::default());
                let body = params.body.as_ref().unwrap_or(&empty);
                self.client.post(&params.endpoint, body).await
            }
            other => return unreachable_route(params.expected_status, Failure::unsupported_method(other)),
        };

        match fetched {
            Ok(response) => score_route(&response, params.expected_status),
            Err(failure) => unreachable_route(params.expected_status, failure),
        }
    }
}

#[async_trait]
impl Evaluator for RouteAvailabilityEvaluator {
    fn category(&self) -> Category {
        Category::RouteAvailability
    }

    async fn evaluate(&self, case: &TestCase) -> Outcome {
        self.check(&RouteParams::from(case)).await
    }
}

/// Full score only for the expected status with a non-empty body
pub fn score_route(response: &Fetched, expected_status: u16) -> Outcome {
    let status_match = response.status == expected_status;
    let has_content = !response.body.is_empty();

    let mut checks = BTreeMap::new();
    checks.insert("status_match".to_string(), status_match);
    checks.insert("has_content".to_string(), has_content);

    Outcome {
        score: if status_match && has_content { 1.0 } else { 0.0 },
        checks,
        ..Default::default()
    }
    .with_detail("actual_status", response.status)
    .with_detail("expected_status", expected_status)
    .with_detail("content_length", response.body.len())
}

fn unreachable_route(expected_status: u16, failure: Failure) -> Outcome {
    let mut outcome = Outcome::failed(failure)
        .with_detail("actual_status", 0)
        .with_detail("expected_status", expected_status);
    outcome.checks.insert("status_match".to_string(), false);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched(status: u16, body: &str) -> Fetched {
        Fetched {
            url: "http://site.test/".to_string(),
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_matching_status_with_content() {
        let outcome = score_route(&fetched(200, "Sellersco Threat Intelligence Platform"), 200);
        assert_eq!(outcome.score, 1.0);
        assert_eq!(outcome.check("status_match"), Some(true));
        assert_eq!(outcome.details["content_length"], 38);
    }

    #[test]
    fn test_empty_body_scores_zero() {
        let outcome = score_route(&fetched(200, ""), 200);
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.check("status_match"), Some(true));
        assert_eq!(outcome.check("has_content"), Some(false));
    }

    #[test]
    fn test_status_mismatch() {
        let outcome = score_route(&fetched(404, "Not Found"), 200);
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.check("status_match"), Some(false));
        assert_eq!(outcome.details["actual_status"], 404);
    }

    #[tokio::test]
    async fn test_unsupported_method_is_not_sent() {
        // Nothing listens here; an attempted request would fail as transport.
        let client = SiteClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(1)).unwrap();
        let evaluator = RouteAvailabilityEvaluator::new(client);
        let outcome = evaluator
            .check(&RouteParams {
                endpoint: "/".to_string(),
                method: HttpMethod::Other("delete".to_string()),
                expected_status: 200,
                body: None,
            })
            .await;

        assert_eq!(outcome.score, 0.0);
        let failure = outcome.error.unwrap();
        assert_eq!(failure.kind, siteeval_common::FailureKind::UnsupportedMethod);
        assert_eq!(failure.message, "Unsupported method: DELETE");
    }
}

//! Main runner: loads queries, evaluates each category in turn, aggregates

use chrono::Utc;
use tracing::{info, warn};

use siteeval_common::{Category, EvalConfig, EvaluationResult, RunReport, TestCase};

use crate::client::SiteClient;
use crate::error::HarnessResult;
use crate::evaluators::{Evaluator, FeatureCompletenessEvaluator, RouteAvailabilityEvaluator};
use crate::queries::load_queries;
use crate::report::{self, Artifacts};
use crate::validators::{DataFreshnessValidator, SeoValidator};

/// Evaluation runner
///
/// Categories run in a fixed order (route, feature, data freshness, SEO),
/// each one even when it has no cases, and every case is a single awaited
/// request. Nothing runs concurrently.
pub struct Runner {
    config: EvalConfig,
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl Runner {
    pub fn new(config: EvalConfig) -> HarnessResult<Self> {
        let client = SiteClient::new(&config.target_worker_url, config.timeout())?;
        let evaluators: Vec<Box<dyn Evaluator>> = vec![
            Box::new(RouteAvailabilityEvaluator::new(client.clone())),
            Box::new(FeatureCompletenessEvaluator::new(client.clone())),
            Box::new(
                DataFreshnessValidator::new(client.clone())
                    .with_default_min_vendor_count(config.default_min_vendor_count),
            ),
            Box::new(SeoValidator::new(client)),
        ];

        Ok(Self { config, evaluators })
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Load the configured query file and evaluate everything in it
    pub async fn run_all(&self) -> HarnessResult<RunReport> {
        let cases = load_queries(&self.config.queries_file)?;
        Ok(self.run_cases(&cases).await)
    }

    /// Evaluate `cases` and fold the results into a report
    pub async fn run_cases(&self, cases: &[TestCase]) -> RunReport {
        let timestamp = Utc::now();

        if cases.is_empty() {
            warn!("No test queries loaded");
        } else {
            info!("Running {} test queries against {}", cases.len(), self.config.target_worker_url);
        }

        let mut results = Vec::with_capacity(cases.len());
        for evaluator in &self.evaluators {
            let category = evaluator.category();
            let selected: Vec<&TestCase> = cases.iter().filter(|c| c.category == category).collect();
            info!("Running {} tests ({})", category.title(), selected.len());

            for case in selected {
                let result = self.evaluate_case(evaluator.as_ref(), case).await;
                log_result(&result);
                results.push(result);
            }
        }

        let report = RunReport::aggregate(timestamp, self.config.target_worker_url.clone(), results);
        info!(
            "Evaluation complete: {}/{} passed ({:.1}%)",
            report.metadata.passed_queries,
            report.metadata.total_queries,
            report.overall_pass_rate() * 100.0
        );
        report
    }

    async fn evaluate_case(&self, evaluator: &dyn Evaluator, case: &TestCase) -> EvaluationResult {
        let outcome = evaluator.evaluate(case).await;
        let passed = self.config.thresholds.passes(case.category, &outcome);
        EvaluationResult::new(case, outcome, passed)
    }

    /// Write the JSON snapshot and HTML report to the output directory
    pub fn persist(&self, report: &RunReport) -> HarnessResult<Artifacts> {
        report::persist(report, &self.config.output_dir, &self.config.category_targets)
    }
}

fn log_result(result: &EvaluationResult) {
    let label = if result.description.is_empty() {
        result.endpoint.as_str()
    } else {
        result.description.as_str()
    };

    if result.passed {
        info!("✓ {} [{}] score {:.2}", label, result.query_id, result.score);
    } else if result.category == Category::SeoValidation {
        warn!("~ {} [{}] partial, score {:.2}", label, result.query_id, result.score);
    } else {
        match &result.error {
            Some(failure) => warn!("✗ {} [{}] {}", label, result.query_id, failure),
            None => warn!("✗ {} [{}] score {:.2}", label, result.query_id, result.score),
        }
    }
}

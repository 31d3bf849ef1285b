//! Run report: the aggregate of one evaluation invocation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::types::{Category, EvaluationResult};

/// Per-category pass counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub total: usize,
    pub passed: usize,
    pub pass_rate: f64,
}

impl CategorySummary {
    pub fn new(total: usize, passed: usize) -> Self {
        let pass_rate = if total == 0 {
            1.0
        } else {
            passed as f64 / total as f64
        };
        Self {
            total,
            passed,
            pass_rate,
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub timestamp: DateTime<Utc>,
    pub worker_url: String,
    pub total_queries: usize,
    pub passed_queries: usize,
    pub failed_queries: usize,
    pub overall_pass_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub by_category: BTreeMap<Category, CategorySummary>,
    pub detailed_results: Vec<EvaluationResult>,
}

impl RunReport {
    /// Fold evaluation results into a report.
    ///
    /// Every category gets a summary, including ones with no results. The
    /// overall pass rate is summed passed over summed total, 0.0 for an
    /// empty run.
    pub fn aggregate(
        timestamp: DateTime<Utc>,
        worker_url: impl Into<String>,
        detailed_results: Vec<EvaluationResult>,
    ) -> Self {
        let by_category: BTreeMap<Category, CategorySummary> = Category::ALL
            .iter()
            .map(|category| {
                let (total, passed) = detailed_results
                    .iter()
                    .filter(|r| r.category == *category)
                    .fold((0, 0), |(total, passed), r| (total + 1, passed + r.passed as usize));
                (*category, CategorySummary::new(total, passed))
            })
            .collect();

        let total_queries: usize = by_category.values().map(|s| s.total).sum();
        let passed_queries: usize = by_category.values().map(|s| s.passed).sum();
        let overall_pass_rate = if total_queries > 0 {
            passed_queries as f64 / total_queries as f64
        } else {
            0.0
        };

        Self {
            metadata: RunMetadata {
                timestamp,
                worker_url: worker_url.into(),
                total_queries,
                passed_queries,
                failed_queries: total_queries - passed_queries,
                overall_pass_rate,
            },
            by_category,
            detailed_results,
        }
    }

    pub fn overall_pass_rate(&self) -> f64 {
        self.metadata.overall_pass_rate
    }

    pub fn grade(&self) -> Grade {
        Grade::from_pass_rate(self.metadata.overall_pass_rate)
    }

    /// Load a persisted JSON snapshot
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Letter grade for an overall pass rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    F,
}

impl Grade {
    pub fn from_pass_rate(rate: f64) -> Self {
        if rate >= 0.95 {
            Grade::A
        } else if rate >= 0.90 {
            Grade::B
        } else if rate >= 0.80 {
            Grade::C
        } else {
            Grade::F
        }
    }

    /// Report color for the grade box
    pub fn color(&self) -> &'static str {
        match self {
            Grade::A | Grade::B => "#22c55e",
            Grade::C => "#eab308",
            Grade::F => "#ef4444",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::F => write!(f, "F"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, category: Category, passed: bool) -> EvaluationResult {
        EvaluationResult {
            query_id: id.to_string(),
            category,
            endpoint: "/".to_string(),
            description: String::new(),
            score: if passed { 1.0 } else { 0.0 },
            passed,
            checks: Default::default(),
            details: Default::default(),
            error: None,
        }
    }

    #[test]
    fn test_aggregate_counts_per_category() {
        let results = vec![
            result("r1", Category::RouteAvailability, true),
            result("r2", Category::RouteAvailability, false),
            result("f1", Category::FeatureCompleteness, true),
            result("s1", Category::SeoValidation, true),
            result("s2", Category::SeoValidation, true),
            result("s3", Category::SeoValidation, false),
        ];
        let report = RunReport::aggregate(Utc::now(), "http://localhost", results);

        for (category, summary) in &report.by_category {
            let in_category: Vec<_> = report
                .detailed_results
                .iter()
                .filter(|r| r.category == *category)
                .collect();
            assert_eq!(summary.total, in_category.len());
            assert_eq!(summary.passed, in_category.iter().filter(|r| r.passed).count());
            assert!(summary.passed <= summary.total);
        }

        let route = report.by_category[&Category::RouteAvailability];
        assert_eq!(route.pass_rate, 0.5);

        // Empty category counts as a vacuous pass
        let freshness = report.by_category[&Category::DataFreshness];
        assert_eq!(freshness.total, 0);
        assert_eq!(freshness.pass_rate, 1.0);

        assert_eq!(report.metadata.total_queries, 6);
        assert_eq!(report.metadata.passed_queries, 4);
        assert_eq!(report.metadata.failed_queries, 2);
        // 4/6, not the mean of per-category rates
        assert!((report.overall_pass_rate() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_empty_run() {
        let report = RunReport::aggregate(Utc::now(), "http://localhost", vec![]);
        assert_eq!(report.by_category.len(), 4);
        assert!(report.by_category.values().all(|s| s.pass_rate == 1.0));
        assert_eq!(report.overall_pass_rate(), 0.0);
        assert_eq!(report.grade(), Grade::F);
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(Grade::from_pass_rate(1.0), Grade::A);
        assert_eq!(Grade::from_pass_rate(0.95), Grade::A);
        assert_eq!(Grade::from_pass_rate(0.94), Grade::B);
        assert_eq!(Grade::from_pass_rate(0.90), Grade::B);
        assert_eq!(Grade::from_pass_rate(0.85), Grade::C);
        assert_eq!(Grade::from_pass_rate(0.79), Grade::F);
    }

    #[test]
    fn test_category_keys_serialize_snake_case() {
        let report = RunReport::aggregate(Utc::now(), "http://localhost", vec![]);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["by_category"]["seo_validation"].is_object());
        assert_eq!(json["metadata"]["worker_url"], "http://localhost");
    }

    fn mixed_run(passed: usize, total: usize) -> RunReport {
        let results = (0..total)
            .map(|i| result(&format!("r{}", i), Category::RouteAvailability, i < passed))
            .collect();
        RunReport::aggregate(Utc::now(), "http://localhost", results)
    }

    #[test]
    fn test_snapshot_reload_keeps_exact_rates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evaluation-results.json");

        // 1/11 has no short decimal form
        let report = mixed_run(1, 11);
        std::fs::write(&path, serde_json::to_string_pretty(&report).unwrap()).unwrap();
        let loaded = RunReport::load(&path).unwrap();

        assert_eq!(loaded.metadata.total_queries, 11);
        assert_eq!(loaded.metadata.passed_queries, 1);
        assert_eq!(loaded.metadata.failed_queries, 10);
        assert_eq!(loaded.metadata.overall_pass_rate, report.metadata.overall_pass_rate);
        assert_eq!(loaded.by_category, report.by_category);
    }

    #[test]
    fn test_every_small_rate_survives_reload() {
        for total in 1..=60 {
            for passed in 0..=total {
                let report = mixed_run(passed, total);
                let text = serde_json::to_string_pretty(&report).unwrap();
                let loaded: RunReport = serde_json::from_str(&text).unwrap();
                assert_eq!(
                    loaded.metadata.overall_pass_rate.to_bits(),
                    report.metadata.overall_pass_rate.to_bits(),
                    "{}/{}",
                    passed,
                    total
                );
                assert_eq!(loaded.by_category, report.by_category, "{}/{}", passed, total);
            }
        }
    }
}

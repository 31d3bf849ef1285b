//! Queries Command

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use siteeval_common::{EvalConfig, TestCase};
use siteeval_harness::load_queries;

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Debug, Args)]
pub struct QueriesArgs {
    /// Query file (overrides EVAL_QUERIES_FILE)
    #[arg(long)]
    pub queries: Option<PathBuf>,
}

/// Test case display wrapper
#[derive(Serialize)]
pub struct TestCaseDisplay {
    pub id: String,
    pub category: String,
    pub method: String,
    pub endpoint: String,
    pub description: String,
}

impl From<&TestCase> for TestCaseDisplay {
    fn from(case: &TestCase) -> Self {
        Self {
            id: case.id.clone(),
            category: case.category.to_string(),
            method: case.method.to_string(),
            endpoint: case.endpoint.clone(),
            description: case.description.clone(),
        }
    }
}

impl TableDisplay for TestCaseDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Category", "Method", "Endpoint", "Description"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.category.clone(),
            self.method.clone(),
            self.endpoint.clone(),
            self.description.clone(),
        ]
    }
}

pub fn execute(args: QueriesArgs, config: EvalConfig, format: OutputFormat) -> Result<()> {
    let path = args.queries.unwrap_or(config.queries_file);
    let cases = load_queries(&path)?;
    let displays: Vec<TestCaseDisplay> = cases.iter().map(TestCaseDisplay::from).collect();
    print_list(&displays, format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteeval_common::Category;

    #[test]
    fn test_row_uppercases_method() {
        let case: TestCase = serde_json::from_str(
            r#"{"id": "r1", "category": "route_availability", "endpoint": "/api/contact", "method": "post"}"#,
        )
        .unwrap();
        let display = TestCaseDisplay::from(&case);

        assert_eq!(case.category, Category::RouteAvailability);
        assert_eq!(display.row()[1], "route_availability");
        assert_eq!(display.row()[2], "POST");
        assert_eq!(display.row().len(), TestCaseDisplay::headers().len());
    }
}

//! Test query loading

use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use siteeval_common::{Error, Result, TestCase};

/// Top-level shape of `evaluation-queries.json`
#[derive(Debug, Deserialize)]
struct QueryFile {
    #[serde(default)]
    test_queries: Vec<TestCase>,
}

/// Load test cases from `path`.
///
/// A missing file yields an empty list (logged), not an error; callers must
/// read that as "nothing ran". A file that exists but does not parse is an
/// error. Files ending in `.jsonl` hold one test case per line.
pub fn load_queries(path: &Path) -> Result<Vec<TestCase>> {
    if !path.exists() {
        warn!("Query file {} not found", path.display());
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    let is_jsonl = path
        .extension()
        .map(|ext| ext == "jsonl")
        .unwrap_or(false);

    let cases = if is_jsonl {
        parse_jsonl(path, &content)?
    } else {
        let file: QueryFile = serde_json::from_str(&content).map_err(|e| Error::QueryParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        file.test_queries
    };

    info!("Loaded {} test queries from {}", cases.len(), path.display());
    Ok(cases)
}

fn parse_jsonl(path: &Path, content: &str) -> Result<Vec<TestCase>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| Error::QueryParse {
                path: path.to_path_buf(),
                reason: format!("line {}: {}", idx + 1, e),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteeval_common::Category;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cases = load_queries(&dir.path().join("absent.json")).unwrap();
        assert!(cases.is_empty());
    }

    #[test]
    fn test_load_json_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evaluation-queries.json");
        std::fs::write(
            &path,
            r#"{
  "test_queries": [
    {"id": "r1", "category": "route_availability", "description": "Home", "endpoint": "/"},
    {"id": "f1", "category": "feature_completeness", "endpoint": "/", "expected_contains": ["sellersco", "threat"]},
    {"id": "d1", "category": "data_freshness", "endpoint": "/sales-portal/api/vendors", "min_vendor_count": 40}
  ]
}"#,
        )
        .unwrap();

        let cases = load_queries(&path).unwrap();
        let ids: Vec<_> = cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "f1", "d1"]);
        assert_eq!(cases[1].category, Category::FeatureCompleteness);
        assert_eq!(cases[2].min_vendor_count, Some(40));
    }

    #[test]
    fn test_missing_field_is_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        std::fs::write(&path, r#"{"version": 2}"#).unwrap();
        assert!(load_queries(&path).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        std::fs::write(&path, "{\"test_queries\": [").unwrap();
        let err = load_queries(&path).unwrap_err();
        assert!(matches!(err, Error::QueryParse { .. }));
    }

    #[test]
    fn test_load_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.jsonl");
        std::fs::write(
            &path,
            "{\"id\": \"a\", \"category\": \"seo_validation\", \"endpoint\": \"/\"}\n\n{\"id\": \"b\", \"category\": \"route_availability\", \"endpoint\": \"/x\", \"method\": \"POST\"}\n",
        )
        .unwrap();
        let cases = load_queries(&path).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[1].method, siteeval_common::HttpMethod::Post);

        std::fs::write(&path, "{\"id\": \"a\"}\n").unwrap();
        match load_queries(&path).unwrap_err() {
            Error::QueryParse { reason, .. } => assert!(reason.starts_with("line 1")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bundled_query_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-data/evaluation-queries.json");
        let cases = load_queries(&path).unwrap();
        for category in siteeval_common::Category::ALL {
            assert!(cases.iter().any(|c| c.category == category), "no {} cases", category);
        }
    }
}

//! Data freshness: is the site serving current standards, vendors and threat feeds?

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use siteeval_common::{Category, Failure, Outcome, TestCase};

use crate::client::SiteClient;
use crate::evaluators::{partition_keywords, Evaluator};

/// Vendor floor when neither the test case nor the runner sets one
pub const DEFAULT_MIN_VENDOR_COUNT: u64 = 40;

/// Regulatory standards expected in the frameworks API
pub const CURRENT_STANDARDS: [&str; 7] = ["HIPAA", "PCI", "GDPR", "CMMC", "NIS2", "DORA", "SEC"];

const MIN_STANDARDS_FOUND: usize = 5;
const OTX_SOURCE: &str = "AlienVault OTX";

#[derive(Debug, Clone)]
pub struct FreshnessParams {
    pub endpoint: String,
    pub expected_contains: Vec<String>,
    pub min_vendor_count: u64,
    /// Extra validation tag; only `otx_threats` is recognized
    pub validate_data: Option<String>,
}

impl FreshnessParams {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            expected_contains: Vec::new(),
            min_vendor_count: DEFAULT_MIN_VENDOR_COUNT,
            validate_data: None,
        }
    }

    /// Build from a test case, falling back to `default_min_vendor_count`
    pub fn from_case(case: &TestCase, default_min_vendor_count: u64) -> Self {
        Self {
            endpoint: case.endpoint.clone(),
            expected_contains: case.expected_contains.clone(),
            min_vendor_count: case.min_vendor_count.unwrap_or(default_min_vendor_count),
            validate_data: case.validate_data.clone(),
        }
    }

    fn wants_otx_threats(&self) -> bool {
        self.validate_data.as_deref() == Some("otx_threats")
    }
}

pub struct DataFreshnessValidator {
    client: SiteClient,
    default_min_vendor_count: u64,
}

impl DataFreshnessValidator {
    pub fn new(client: SiteClient) -> Self {
        Self {
            client,
            default_min_vendor_count: DEFAULT_MIN_VENDOR_COUNT,
        }
    }

    /// Vendor floor applied to cases that do not set `min_vendor_count`
    pub fn with_default_min_vendor_count(mut self, count: u64) -> Self {
        self.default_min_vendor_count = count;
        self
    }

    pub async fn check(&self, params: &FreshnessParams) -> Outcome {
        let response = match self.client.get(&params.endpoint).await {
            Ok(response) => response,
            Err(failure) => return Outcome::failed(failure),
        };

        if response.status != 200 {
            return Outcome::failed(Failure::http_status(response.status))
                .with_detail("url", response.url)
                .with_detail("status", response.status);
        }

        assess_payload(&response.body, params)
            .with_detail("url", response.url)
            .with_detail("status", response.status)
    }
}

#[async_trait]
impl Evaluator for DataFreshnessValidator {
    fn category(&self) -> Category {
        Category::DataFreshness
    }

    async fn evaluate(&self, case: &TestCase) -> Outcome {
        let params = FreshnessParams::from_case(case, self.default_min_vendor_count);
        self.check(&params).await
    }
}

/// Score a response body that came back with status 200.
///
/// JSON bodies are checked structurally by endpoint; anything else falls
/// back to keyword search. The vendor and OTX text heuristics then add their
/// checks, but never replace a check the JSON branch already decided.
pub fn assess_payload(body: &str, params: &FreshnessParams) -> Outcome {
    let text = body.to_lowercase();
    let mut checks = BTreeMap::new();
    let mut details = BTreeMap::new();

    match serde_json::from_str::<Value>(body) {
        Ok(data) if is_truthy(&data) => {
            if let Err(failure) = assess_json(&data, params, &mut checks, &mut details) {
                return Outcome::failed(failure);
            }
        }
        _ => {
            let (found, missing) = partition_keywords(&text, &params.expected_contains);
            checks.insert("expected_keywords".to_string(), missing.is_empty());
            details.insert("found_keywords".to_string(), Value::from(found));
            details.insert("missing_keywords".to_string(), Value::from(missing));
        }
    }

    if params.endpoint.contains("vendor") {
        let estimate = text.matches("vendor").count()
            + text.matches("crowdstrike").count()
            + text.matches("palo alto").count();
        details.insert("estimated_vendor_count".to_string(), Value::from(estimate));
        checks
            .entry("min_vendor_count".to_string())
            .or_insert(estimate as u64 >= params.min_vendor_count);
    }

    if params.wants_otx_threats() {
        checks
            .entry("has_otx_threats".to_string())
            .or_insert(text.contains("threat") && text.contains("otx"));
    }

    Outcome::from_checks(checks, details)
}

fn assess_json(
    data: &Value,
    params: &FreshnessParams,
    checks: &mut BTreeMap<String, bool>,
    details: &mut BTreeMap<String, Value>,
) -> Result<(), Failure> {
    let endpoint = params.endpoint.as_str();

    match data {
        Value::Array(items) if endpoint.contains("/api/frameworks") => {
            let mut found: Vec<&str> = Vec::new();
            for (index, item) in items.iter().enumerate() {
                if !item.is_object() {
                    return Err(Failure::malformed_payload(format!(
                        "framework record {} is not an object",
                        index
                    )));
                }
                let name = item
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_uppercase();
                for standard in CURRENT_STANDARDS {
                    if name.contains(standard) && !found.contains(&standard) {
                        found.push(standard);
                    }
                }
            }
            checks.insert("has_2025_standards".to_string(), found.len() >= MIN_STANDARDS_FOUND);
            details.insert("found_standards".to_string(), Value::from(found));
        }
        Value::Array(vendors) if endpoint.contains("/api/vendors") => {
            let vendor_count = vendors.len();
            let has_crowdstrike = vendors
                .iter()
                .any(|v| v.to_string().to_lowercase().contains("crowdstrike"));
            checks.insert(
                "min_vendor_count".to_string(),
                vendor_count as u64 >= params.min_vendor_count,
            );
            checks.insert("has_major_vendors".to_string(), has_crowdstrike);
            details.insert("vendor_count".to_string(), Value::from(vendor_count));

            if !params.expected_contains.is_empty() {
                let data_str = data.to_string().to_lowercase();
                let (found, _) = partition_keywords(&data_str, &params.expected_contains);
                checks.insert(
                    "expected_keywords".to_string(),
                    found.len() >= params.expected_contains.len() / 2,
                );
                details.insert("found_keywords".to_string(), Value::from(found));
            }
        }
        _ if endpoint.contains("/api/otx") => {
            let pulse_count = match data.get("pulses") {
                Some(Value::Array(pulses)) => pulses.len(),
                Some(Value::Object(pulses)) => pulses.len(),
                Some(Value::String(pulses)) => pulses.len(),
                _ => 0,
            };
            let has_source = data.get("source").and_then(Value::as_str) == Some(OTX_SOURCE);
            checks.insert("has_otx_threats".to_string(), pulse_count > 0);
            checks.insert("has_otx_source".to_string(), has_source);
            details.insert("pulse_count".to_string(), Value::from(pulse_count));
        }
        _ => {
            checks.insert("is_valid_json".to_string(), data.is_array() || data.is_object());
            if !params.expected_contains.is_empty() {
                let data_str = data.to_string().to_lowercase();
                let (found, missing) = partition_keywords(&data_str, &params.expected_contains);
                checks.insert("expected_keywords".to_string(), missing.is_empty());
                details.insert("found_keywords".to_string(), Value::from(found));
                details.insert("missing_keywords".to_string(), Value::from(missing));
            }
        }
    }
    Ok(())
}

/// Empty collections, empty strings, zero, false and null are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(endpoint: &str) -> FreshnessParams {
        FreshnessParams::new(endpoint)
    }

    #[test]
    fn test_frameworks_need_five_standards() {
        let body = json!([
            {"name": "HIPAA Privacy Rule"},
            {"name": "PCI DSS 4.0"},
            {"name": "gdpr"},
            {"name": "CMMC 2.0"},
            {"name": "NIS2 Directive"},
            {"id": 7}
        ])
        .to_string();
        let outcome = assess_payload(&body, &params("/regulations/api/frameworks"));
        assert_eq!(outcome.check("has_2025_standards"), Some(true));
        assert_eq!(
            outcome.details["found_standards"],
            json!(["HIPAA", "PCI", "GDPR", "CMMC", "NIS2"])
        );
        assert_eq!(outcome.score, 1.0);

        let body = json!([{"name": "HIPAA"}, {"name": "DORA"}]).to_string();
        let outcome = assess_payload(&body, &params("/regulations/api/frameworks"));
        assert_eq!(outcome.check("has_2025_standards"), Some(false));
    }

    #[test]
    fn test_non_object_framework_record_scores_zero() {
        let body = json!([
            {"name": "HIPAA"},
            {"name": "PCI"},
            {"name": "GDPR"},
            {"name": "CMMC"},
            {"name": "NIS2"},
            "DORA"
        ])
        .to_string();
        let outcome = assess_payload(&body, &params("/regulations/api/frameworks"));

        assert_eq!(outcome.score, 0.0);
        assert!(outcome.checks.is_empty());
        let failure = outcome.error.expect("failure");
        assert_eq!(failure.kind, siteeval_common::FailureKind::MalformedPayload);
        assert!(failure.message.contains("record 5"));
    }

    #[test]
    fn test_vendor_list_at_exact_minimum() {
        let mut vendors: Vec<Value> = (0..39).map(|i| json!({"name": format!("Acme {}", i)})).collect();
        vendors.push(json!({"name": "CrowdStrike"}));
        let body = Value::Array(vendors).to_string();

        let mut p = params("/sales-portal/api/vendors");
        p.min_vendor_count = 40;
        let outcome = assess_payload(&body, &p);

        assert_eq!(outcome.check("min_vendor_count"), Some(true));
        assert_eq!(outcome.check("has_major_vendors"), Some(true));
        assert_eq!(outcome.details["vendor_count"], 40);
        // The text heuristic still reports its estimate
        assert_eq!(outcome.details["estimated_vendor_count"], 1);
        assert_eq!(outcome.score, 1.0);
    }

    #[test]
    fn test_vendor_keywords_need_half() {
        let body = json!(["CrowdStrike", "Palo Alto Networks"]).to_string();
        let mut p = params("/sales-portal/api/vendors");
        p.min_vendor_count = 2;
        p.expected_contains = vec!["crowdstrike".into(), "zscaler".into(), "okta".into()];
        let outcome = assess_payload(&body, &p);
        // 1 found >= 3 / 2
        assert_eq!(outcome.check("expected_keywords"), Some(true));
    }

    #[test]
    fn test_otx_feed() {
        let body = json!({"source": "AlienVault OTX", "pulses": [{"name": "APT"}]}).to_string();
        let mut p = params("/api/otx/pulses");
        p.validate_data = Some("otx_threats".into());
        let outcome = assess_payload(&body, &p);
        assert_eq!(outcome.check("has_otx_threats"), Some(true));
        assert_eq!(outcome.check("has_otx_source"), Some(true));
        assert_eq!(outcome.details["pulse_count"], 1);

        let body = json!({"source": "other", "pulses": [], "note": "otx threat feed"}).to_string();
        let outcome = assess_payload(&body, &p);
        // Structured answer wins over the text heuristic
        assert_eq!(outcome.check("has_otx_threats"), Some(false));
        assert_eq!(outcome.score, 0.0);
    }

    #[test]
    fn test_generic_json_requires_every_keyword() {
        let body = json!({"updated": "2025", "items": ["zero trust"]}).to_string();
        let mut p = params("/api/status");
        p.expected_contains = vec!["2025".into(), "quantum".into()];
        let outcome = assess_payload(&body, &p);
        assert_eq!(outcome.check("is_valid_json"), Some(true));
        assert_eq!(outcome.check("expected_keywords"), Some(false));
        assert_eq!(outcome.score, 0.5);
    }

    #[test]
    fn test_html_falls_back_to_keywords() {
        let body = "<html><body>Live OTX threat map</body></html>";
        let mut p = params("/attack-map");
        p.expected_contains = vec!["OTX".into(), "Threat".into()];
        p.validate_data = Some("otx_threats".into());
        let outcome = assess_payload(body, &p);
        assert_eq!(outcome.check("expected_keywords"), Some(true));
        assert_eq!(outcome.check("has_otx_threats"), Some(true));
        assert_eq!(outcome.score, 1.0);
    }

    #[test]
    fn test_vendor_page_heuristic() {
        let body = "<ul><li>CrowdStrike vendor</li><li>Palo Alto vendor</li></ul>";
        let mut p = params("/sales-portal/vendors");
        p.min_vendor_count = 5;
        let outcome = assess_payload(body, &p);
        assert_eq!(outcome.details["estimated_vendor_count"], 4);
        assert_eq!(outcome.check("min_vendor_count"), Some(false));
        // expected_keywords passes vacuously, min_vendor_count fails
        assert_eq!(outcome.score, 0.5);
    }

    #[test]
    fn test_empty_json_uses_text_path() {
        let outcome = assess_payload("[]", &params("/api/frameworks"));
        assert_eq!(outcome.check("expected_keywords"), Some(true));
        assert!(outcome.check("has_2025_standards").is_none());
    }

    #[test]
    fn test_case_default_vendor_count() {
        let case: TestCase = serde_json::from_value(json!({
            "id": "d1",
            "category": "data_freshness",
            "endpoint": "/sales-portal/api/vendors"
        }))
        .unwrap();
        assert_eq!(FreshnessParams::from_case(&case, 80).min_vendor_count, 80);
        assert_eq!(FreshnessParams::new("/x").min_vendor_count, 40);
    }
}

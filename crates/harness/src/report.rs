//! Report persistence: timestamped JSON snapshot and HTML report

use chrono::Local;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use siteeval_common::{CategoryTargets, RunReport};

use crate::error::HarnessResult;

/// Paths written by [`persist`]
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub json: PathBuf,
    pub html: PathBuf,
}

/// Write both artifacts into `output_dir`, creating it if needed.
///
/// File names carry the run's local start time, e.g.
/// `evaluation-results-20261018-143000.json`. Existing artifacts are never
/// overwritten: a run that lands on a taken name gets a `-2`, `-3`, ...
/// suffix on both files.
pub fn persist(report: &RunReport, output_dir: &Path, targets: &CategoryTargets) -> HarnessResult<Artifacts> {
    std::fs::create_dir_all(output_dir)?;

    let stamp = report
        .metadata
        .timestamp
        .with_timezone(&Local)
        .format("%Y%m%d-%H%M%S")
        .to_string();

    let snapshot = serde_json::to_string_pretty(report)?;
    let page = render_html(report, targets);

    let mut attempt = 1;
    loop {
        let suffix = if attempt == 1 {
            String::new()
        } else {
            format!("-{}", attempt)
        };
        attempt += 1;

        let json = output_dir.join(format!("evaluation-results-{}{}.json", stamp, suffix));
        let html = output_dir.join(format!("evaluation-report-{}{}.html", stamp, suffix));
        if html.exists() {
            continue;
        }

        match write_new(&json, &snapshot) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
        info!("Results saved to: {}", json.display());

        write_new(&html, &page)?;
        info!("Report generated: {}", html.display());

        return Ok(Artifacts { json, html });
    }
}

fn write_new(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(contents.as_bytes())
}

/// Static HTML page with grade, totals and the per-category table
pub fn render_html(report: &RunReport, targets: &CategoryTargets) -> String {
    let meta = &report.metadata;
    let grade = report.grade();
    let pass_pct = meta.overall_pass_rate * 100.0;

    let mut rows = String::new();
    for (category, summary) in &report.by_category {
        let target = targets.target(*category);
        let class = if summary.pass_rate >= target { "pass" } else { "fail" };
        rows.push_str(&format!(
            r#"
        <tr>
          <td>{title}</td>
          <td>{total}</td>
          <td>{passed}</td>
          <td><span class="{class}">{rate:.1}%</span></td>
          <td>{target:.0}%</td>
        </tr>"#,
            title = category.title(),
            total = summary.total,
            passed = summary.passed,
            class = class,
            rate = summary.pass_rate * 100.0,
            target = target * 100.0,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Site Evaluation Report</title>
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0f172a; color: #e2e8f0; line-height: 1.6; margin: 0; }}
    .container {{ max-width: 1200px; margin: 0 auto; padding: 2rem; }}
    header {{ text-align: center; padding: 2rem 0; border-bottom: 2px solid #1e293b; margin-bottom: 2rem; }}
    .subtitle {{ color: #94a3b8; }}
    .metrics {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 1.5rem; }}
    .metric-card {{ background: #1e293b; padding: 1.5rem; border-radius: 8px; border-left: 4px solid #3b82f6; }}
    .metric-value {{ font-size: 2.5rem; font-weight: bold; }}
    .progress-bar {{ height: 12px; background: #0f172a; border-radius: 6px; overflow: hidden; margin-top: 1rem; }}
    .progress-fill {{ height: 100%; background: linear-gradient(90deg, #10b981, #3b82f6); }}
    .grade-box {{ background: {grade_color}; color: white; padding: 2rem; border-radius: 8px; text-align: center; margin: 2rem 0; }}
    .grade-letter {{ font-size: 4rem; font-weight: bold; }}
    table {{ width: 100%; border-collapse: collapse; background: #1e293b; }}
    th, td {{ padding: 1rem; text-align: left; border-bottom: 1px solid #334155; }}
    .pass {{ color: #10b981; }}
    .fail {{ color: #ef4444; }}
  </style>
</head>
<body>
  <div class="container">
    <header>
      <h1>Site Evaluation Report</h1>
      <p class="subtitle">{worker_url}</p>
      <p class="subtitle">{timestamp}</p>
    </header>
    <div class="metrics">
      <div class="metric-card">
        <div class="metric-value">{passed}/{total}</div>
        <div>Tests Passed</div>
        <div class="progress-bar"><div class="progress-fill" style="width: {pass_pct:.1}%"></div></div>
      </div>
      <div class="metric-card">
        <div class="metric-value">{pass_pct:.1}%</div>
        <div>Overall Pass Rate</div>
      </div>
      <div class="metric-card">
        <div class="metric-value">{categories}</div>
        <div>Test Categories</div>
      </div>
    </div>
    <div class="grade-box">
      <div class="grade-letter">{grade}</div>
      <p>Grade: {grade}</p>
    </div>
    <h2>Category Breakdown</h2>
    <table>
      <thead>
        <tr><th>Category</th><th>Tests</th><th>Passed</th><th>Rate</th><th>Target</th></tr>
      </thead>
      <tbody>{rows}
      </tbody>
    </table>
  </div>
</body>
</html>
"#,
        grade_color = grade.color(),
        worker_url = escape_html(&meta.worker_url),
        timestamp = meta.timestamp.to_rfc3339(),
        passed = meta.passed_queries,
        total = meta.total_queries,
        pass_pct = pass_pct,
        categories = report.by_category.len(),
        grade = grade,
        rows = rows,
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use siteeval_common::{Category, EvaluationResult, Grade};

    fn sample_report() -> RunReport {
        let results = [
            ("r1", Category::RouteAvailability, true),
            ("r2", Category::RouteAvailability, true),
            ("f1", Category::FeatureCompleteness, false),
            ("s1", Category::SeoValidation, true),
        ]
        .into_iter()
        .map(|(id, category, passed)| EvaluationResult {
            query_id: id.to_string(),
            category,
            endpoint: "/".to_string(),
            description: format!("case {}", id),
            score: if passed { 1.0 } else { 0.25 },
            passed,
            checks: Default::default(),
            details: Default::default(),
            error: None,
        })
        .collect();
        RunReport::aggregate(Utc::now(), "https://site.test/?a=1&b=<2>", results)
    }

    #[test]
    fn test_persist_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();
        let artifacts = persist(&report, &dir.path().join("out"), &CategoryTargets::default()).unwrap();

        let name = artifacts.json.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("evaluation-results-") && name.ends_with(".json"));
        assert!(artifacts.html.exists());

        let loaded = RunReport::load(&artifacts.json).unwrap();
        assert_eq!(loaded.metadata.total_queries, report.metadata.total_queries);
        assert_eq!(loaded.metadata.passed_queries, report.metadata.passed_queries);
        assert_eq!(loaded.metadata.failed_queries, report.metadata.failed_queries);
        assert_eq!(loaded.metadata.overall_pass_rate, 0.75);
        assert_eq!(loaded.detailed_results, report.detailed_results);
    }

    #[test]
    fn test_same_second_runs_keep_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();
        let targets = CategoryTargets::default();

        let first = persist(&report, dir.path(), &targets).unwrap();
        let before = std::fs::read_to_string(&first.json).unwrap();
        let second = persist(&report, dir.path(), &targets).unwrap();

        assert_ne!(first.json, second.json);
        assert_ne!(first.html, second.html);
        assert!(second.json.to_string_lossy().ends_with("-2.json"));
        assert!(second.html.to_string_lossy().ends_with("-2.html"));
        assert_eq!(std::fs::read_to_string(&first.json).unwrap(), before);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 4);
    }

    #[test]
    fn test_html_shows_computed_numbers() {
        let report = sample_report();
        let html = render_html(&report, &CategoryTargets::default());
        assert_eq!(report.grade(), Grade::F);
        assert!(html.contains("3/4"));
        assert!(html.contains("75.0%"));
        assert!(html.contains("<div class=\"grade-letter\">F</div>"));
        assert!(html.contains("Route Availability"));
        assert!(html.contains("&amp;b=&lt;2&gt;"));
    }
}

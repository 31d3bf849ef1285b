//! Run Command

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use siteeval_common::EvalConfig;
use siteeval_harness::Runner;

use crate::output::{
    print_document, print_error, print_success, print_summary, print_warning, OutputFormat,
};

/// Overall pass rate the run must reach for a zero exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Gate {
    /// Overall pass rate of at least 80%
    Standard,
    /// Overall pass rate of at least 95%
    Strict,
}

impl Gate {
    pub fn threshold(&self) -> f64 {
        match self {
            Gate::Standard => 0.80,
            Gate::Strict => 0.95,
        }
    }

    pub fn is_met(&self, overall_pass_rate: f64) -> bool {
        overall_pass_rate >= self.threshold()
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Pass-rate gate deciding the exit code
    #[arg(long, value_enum)]
    pub gate: Gate,

    /// Site to evaluate (overrides WORKER_URL)
    #[arg(long)]
    pub target_url: Option<String>,

    /// Query file (overrides EVAL_QUERIES_FILE)
    #[arg(long)]
    pub queries: Option<PathBuf>,

    /// Output directory (overrides EVAL_OUTPUT_DIR)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Per-request timeout in seconds (overrides EVAL_TIMEOUT_SECONDS)
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl RunArgs {
    /// Command-line flags are the last configuration layer
    pub fn apply(&self, config: &mut EvalConfig) {
        if let Some(url) = &self.target_url {
            config.target_worker_url = url.clone();
        }
        if let Some(path) = &self.queries {
            config.queries_file = path.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_seconds = timeout;
        }
    }
}

/// Run the full evaluation. Returns whether the gate was met.
pub async fn execute(args: RunArgs, mut config: EvalConfig, format: OutputFormat) -> Result<bool> {
    args.apply(&mut config);
    config.validate()?;
    config.prepare()?;

    let runner = Runner::new(config)?;
    let report = runner.run_all().await?;
    let artifacts = runner.persist(&report)?;

    let rate = report.overall_pass_rate();
    let met = args.gate.is_met(rate);
    info!(gate = ?args.gate, rate, met, "Gate evaluated");

    if format.is_document() {
        print_document(&report, format);
        return Ok(met);
    }

    if report.metadata.total_queries == 0 {
        print_warning(&format!(
            "No test cases found in {}",
            runner.config().queries_file.display()
        ));
    }
    print_summary(&report, &runner.config().category_targets, format);
    print_success(&format!("Results saved to {}", artifacts.json.display()));
    print_success(&format!("Report generated at {}", artifacts.html.display()));

    let message = format!(
        "Overall pass rate {:.1}% against {:?} gate of {:.0}%",
        rate * 100.0,
        args.gate,
        args.gate.threshold() * 100.0
    );
    if met {
        print_success(&message);
    } else {
        print_error(&message);
    }

    Ok(met)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_thresholds() {
        assert!(Gate::Standard.is_met(0.80));
        assert!(!Gate::Standard.is_met(0.79));
        assert!(Gate::Strict.is_met(0.95));
        assert!(!Gate::Strict.is_met(0.90));
        // Nothing ran
        assert!(!Gate::Standard.is_met(0.0));
    }

    #[test]
    fn test_flags_override_config() {
        let args = RunArgs {
            gate: Gate::Standard,
            target_url: Some("http://localhost:8787".to_string()),
            queries: None,
            output_dir: Some(PathBuf::from("/tmp/out")),
            timeout: Some(5),
        };
        let mut config = EvalConfig::default();
        args.apply(&mut config);

        assert_eq!(config.target_worker_url, "http://localhost:8787");
        assert_eq!(config.queries_file, EvalConfig::default().queries_file);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.timeout_seconds, 5);
    }
}

//! Config Command

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use siteeval_common::{Category, EvalConfig, ModelConfig};

use crate::output::{print_document, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Also write the effective evaluation settings to this TOML file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

/// Everything the harness will use, with secrets masked
#[derive(Serialize)]
pub struct EffectiveConfig {
    pub evaluation: EvalConfig,
    pub model: ModelConfig,
}

#[derive(Serialize)]
pub struct SettingDisplay {
    pub setting: String,
    pub value: String,
}

impl SettingDisplay {
    fn new(setting: impl Into<String>, value: impl ToString) -> Self {
        Self {
            setting: setting.into(),
            value: value.to_string(),
        }
    }
}

impl TableDisplay for SettingDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Setting", "Value"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.setting.clone(), self.value.clone()]
    }
}

fn settings(config: &EffectiveConfig) -> Vec<SettingDisplay> {
    let eval = &config.evaluation;
    let model = &config.model;

    let mut rows = vec![
        SettingDisplay::new("target_worker_url", &eval.target_worker_url),
        SettingDisplay::new("queries_file", eval.queries_file.display()),
        SettingDisplay::new("output_dir", eval.output_dir.display()),
        SettingDisplay::new("timeout_seconds", eval.timeout_seconds),
        SettingDisplay::new("default_min_vendor_count", eval.default_min_vendor_count),
        SettingDisplay::new("thresholds.route_availability", "status match"),
        SettingDisplay::new("thresholds.feature_completeness", eval.thresholds.feature_completeness),
        SettingDisplay::new("thresholds.data_freshness", eval.thresholds.data_freshness),
        SettingDisplay::new("thresholds.seo_validation", eval.thresholds.seo_validation),
    ];
    for category in Category::ALL {
        rows.push(SettingDisplay::new(
            format!("category_targets.{}", category),
            eval.category_targets.target(category),
        ));
    }
    rows.extend([
        SettingDisplay::new("model.default_model_type", &model.default_model_type),
        SettingDisplay::new("model.use_azure", model.use_azure),
        SettingDisplay::new("model.azure_deployment", &model.azure_deployment),
        SettingDisplay::new("model.azure_endpoint", &model.azure_endpoint),
        SettingDisplay::new("model.azure_api_key", &model.azure_api_key),
        SettingDisplay::new("model.azure_api_version", &model.azure_api_version),
        SettingDisplay::new("model.openai_model", &model.openai_model),
        SettingDisplay::new("model.openai_api_key", &model.openai_api_key),
        SettingDisplay::new(
            "model.openai_base_url",
            model.openai_base_url.as_deref().unwrap_or("-"),
        ),
    ]);
    rows
}

pub fn execute(args: ConfigArgs, config: EvalConfig, format: OutputFormat) -> Result<()> {
    if let Some(path) = &args.save {
        config.save(path)?;
    }

    let effective = EffectiveConfig {
        evaluation: config,
        model: ModelConfig::from_env().redacted(),
    };

    if format.is_document() {
        print_document(&effective, format);
    } else {
        print_list(&settings(&effective), format);
    }

    if let Some(path) = &args.save {
        if !format.is_document() {
            print_success(&format!("Configuration written to {}", path.display()));
        }
    }
    Ok(())
}

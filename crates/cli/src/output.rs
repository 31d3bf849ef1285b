//! Output formatting for CLI

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use siteeval_common::{CategoryTargets, Grade, RunReport};

const BAR_WIDTH: usize = 30;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    /// Json and Yaml print a single machine-readable document and nothing else
    pub fn is_document(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Yaml)
    }
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    if items.is_empty() && !format.is_document() {
        println!("No items found.");
        return;
    }

    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(T::headers());
            for item in items {
                table.add_row(item.row());
            }

            println!("{table}");
        }
        OutputFormat::Json | OutputFormat::Yaml => print_document(items, format),
        OutputFormat::Plain => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    println!("---");
                }
                let row = item.row();
                for (header, value) in T::headers().iter().zip(row.iter()) {
                    println!("{}: {}", header, value);
                }
            }
        }
    }
}

/// Print a whole value as JSON or YAML; other formats fall back to JSON
pub fn print_document<T: Serialize + ?Sized>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(value).unwrap_or_default()),
        _ => println!("{}", serde_json::to_string_pretty(value).unwrap_or_default()),
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("⚠️  {}", message);
}

/// `███░░░` bar for a rate in 0..=1
pub fn progress_bar(rate: f64, width: usize) -> String {
    let filled = ((rate.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn grade_colored(grade: Grade) -> ColoredString {
    let letter = grade.to_string();
    match grade {
        Grade::A => letter.green().bold(),
        Grade::B => letter.cyan().bold(),
        Grade::C => letter.yellow().bold(),
        Grade::F => letter.red().bold(),
    }
}

/// Console summary of a finished run: totals, per-category bars, grade
pub fn print_summary(report: &RunReport, targets: &CategoryTargets, format: OutputFormat) {
    let meta = &report.metadata;

    if format == OutputFormat::Plain {
        println!("worker_url: {}", meta.worker_url);
        println!("total: {}", meta.total_queries);
        println!("passed: {}", meta.passed_queries);
        println!("failed: {}", meta.failed_queries);
        println!("pass_rate: {:.3}", meta.overall_pass_rate);
        for (category, summary) in &report.by_category {
            println!(
                "{}: {}/{} ({:.3})",
                category, summary.passed, summary.total, summary.pass_rate
            );
        }
        println!("grade: {}", report.grade());
        return;
    }

    println!();
    println!("{}", " Evaluation Summary".bold());
    println!("  Target:  {}", meta.worker_url.cyan());
    println!(
        "  Passed:  {}/{} ({:.1}%)",
        meta.passed_queries,
        meta.total_queries,
        meta.overall_pass_rate * 100.0
    );
    println!("  {}", progress_bar(meta.overall_pass_rate, BAR_WIDTH));
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Category", "Tests", "Passed", "Rate", "Target", ""]);

    for (category, summary) in &report.by_category {
        let target = targets.target(*category);
        let color = if summary.pass_rate >= target { Color::Green } else { Color::Red };
        table.add_row(vec![
            Cell::new(category.title()),
            Cell::new(summary.total),
            Cell::new(summary.passed),
            Cell::new(format!("{:.1}%", summary.pass_rate * 100.0)).fg(color),
            Cell::new(format!("{:.0}%", target * 100.0)),
            Cell::new(progress_bar(summary.pass_rate, BAR_WIDTH / 2)),
        ]);
    }
    println!("{table}");

    let failures: Vec<_> = report.detailed_results.iter().filter(|r| !r.passed).collect();
    if !failures.is_empty() {
        println!();
        println!("{}", " Failed Tests".bold());
        for result in failures {
            let reason = match &result.error {
                Some(failure) => failure.to_string(),
                None => format!("score {:.2}", result.score),
            };
            println!(
                "  {} {} {} {}",
                "✗".red(),
                result.query_id.bold(),
                result.endpoint.dimmed(),
                reason
            );
        }
    }

    println!();
    println!("  Grade: {}", grade_colored(report.grade()));
    println!();
}

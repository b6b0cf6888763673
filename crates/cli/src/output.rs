//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use tmat_e2e::{Outcome, SessionReport, Verdict};

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

impl TableDisplay for SessionReport {
    fn headers() -> Vec<&'static str> {
        vec!["Browser", "Total", "Passed", "Failed", "Skipped", "Aborted", "Duration"]
    }

    fn row(&self) -> Vec<String> {
        let aborted = self
            .aborted_families
            .iter()
            .map(|a| a.family.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            self.browser.clone(),
            self.summary.total.to_string(),
            self.tally.passed.to_string(),
            self.tally.failed.to_string(),
            self.tally.skipped.to_string(),
            if aborted.is_empty() { "-".to_string() } else { aborted },
            format!("{}ms", self.duration_ms),
        ]
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    if items.is_empty() {
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
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items).unwrap_or_default());
        }
    }
}

/// Print every verdict of a session followed by its totals
pub fn print_session(report: &SessionReport, format: OutputFormat) {
    if let OutputFormat::Json = format {
        return;
    }

    println!();
    println!("{}", format!("== {} ==", report.browser).bold());
    for verdict in &report.verdicts {
        print_verdict(verdict);
    }
    for abort in &report.aborted_families {
        print_error(&format!("{} scenarios stopped: {}", abort.family, abort.error));
    }

    println!("Total test cases: {}", report.summary.total);
    println!("Passed: {}", report.tally.passed.to_string().green());
    println!("Failed: {}", report.tally.failed.to_string().red());
    if report.tally.skipped > 0 {
        println!("Skipped: {}", report.tally.skipped.to_string().yellow());
    }
}

fn print_verdict(verdict: &Verdict) {
    let label = match verdict.outcome {
        Outcome::Passed => verdict.outcome.to_string().green().bold(),
        Outcome::Failed => verdict.outcome.to_string().red().bold(),
        Outcome::Skipped => verdict.outcome.to_string().yellow().bold(),
    };
    println!("[{}] {} - {}", label, verdict.scenario.family(), verdict.detail);
    println!("{}", verdict.scenario.payload_json().dimmed());
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

/// Print info message
pub fn print_info(message: &str) {
    println!("ℹ️  {}", message);
}

//! Output formatting for CLI commands.
//!
//! Reports go to stdout untouched so CI consumers can parse them; the
//! colored status line and summary table are meant for stderr.

use colored::Colorize;
use tabled::{Table, Tabled};

use crate::diff::DeltaKind;
use crate::report::{ReportRenderer, ValidationResult};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
    /// Report renderer.
    renderer: ReportRenderer,
}

/// Host summary row for table display.
#[derive(Tabled)]
struct HostSummaryRow {
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Added")]
    added: usize,
    #[tabled(rename = "Removed")]
    removed: usize,
    #[tabled(rename = "Changed")]
    changed: usize,
    #[tabled(rename = "Status")]
    status: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self {
            format,
            renderer: ReportRenderer::new(),
        }
    }

    /// Sets whether reports include values.
    #[must_use]
    pub const fn with_values(mut self, show_values: bool) -> Self {
        self.renderer = self.renderer.with_values(show_values);
        self
    }

    /// Formats a validation result for stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn format_result(&self, result: &ValidationResult) -> serde_json::Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&self.renderer.structured(result)).map(|mut json| {
                    json.push('\n');
                    json
                })
            }
            OutputFormat::Text => Ok(self.renderer.render_text(result)),
        }
    }

    /// Formats a list of hosts for stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn format_hosts(&self, hosts: &[String]) -> serde_json::Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(hosts).map(|mut json| {
                json.push('\n');
                json
            }),
            OutputFormat::Text => Ok(hosts.iter().map(|h| format!("{h}\n")).collect()),
        }
    }

    /// Formats the per-host summary table.
    #[must_use]
    pub fn format_summary(result: &ValidationResult) -> String {
        let mut rows: Vec<HostSummaryRow> = result
            .reports
            .iter()
            .map(|r| HostSummaryRow {
                host: r.host.clone(),
                added: r.count(DeltaKind::Added),
                removed: r.count(DeltaKind::Removed),
                changed: r.count(DeltaKind::Changed),
                status: "changed".yellow().to_string(),
            })
            .collect();

        rows.extend(result.failures.iter().map(|f| HostSummaryRow {
            host: f.host.clone(),
            added: 0,
            removed: 0,
            changed: 0,
            status: "error".red().to_string(),
        }));

        if rows.is_empty() {
            return String::new();
        }

        let mut table = Table::new(rows).to_string();
        table.push('\n');
        table
    }

    /// Formats the one-line run status.
    #[must_use]
    pub fn format_status(result: &ValidationResult) -> String {
        let unchanged = result
            .hosts_checked
            .saturating_sub(result.reports.len() + result.failures.len());

        let mark = if result.has_failures() {
            "✗".red()
        } else if result.has_changes() {
            "~".yellow()
        } else {
            "✓".green()
        };

        format!(
            "{mark} {} hosts checked: {} changed, {} unchanged, {} failed ({} deltas)",
            result.hosts_checked,
            result.reports.len(),
            unchanged,
            result.failures.len(),
            result.total_deltas()
        )
    }
}

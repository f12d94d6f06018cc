//! Report rendering and output.

use std::fmt::Write as _;
use std::path::Path;

use clap::ValueEnum;
use recordlint_core::{RecordLintError, Result, ValidationReport};

/// Output format for validation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Full report as pretty-printed JSON
    Json,
    /// One row per issue
    Csv,
    /// Human-readable summary
    Summary,
}

/// Renders a report in the requested format.
pub(crate) fn render(report: &ValidationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| RecordLintError::serialization("Failed to serialize report", e)),
        OutputFormat::Csv => render_csv(report),
        OutputFormat::Summary => Ok(render_summary(report)),
    }
}

fn render_csv(report: &ValidationReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in report.issue_rows() {
        writer
            .serialize(&row)
            .map_err(|e| RecordLintError::csv("Failed to write issue row", e))?;
    }
    // Header is only emitted with the first row.
    if report.detailed_issues.is_empty() {
        writer
            .write_record([
                "category",
                "severity",
                "description",
                "count",
                "affected_percentage",
                "recommendation",
            ])
            .map_err(|e| RecordLintError::csv("Failed to write header", e))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| RecordLintError::csv("Failed to flush issue rows", e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| RecordLintError::csv("Issue rows are not UTF-8", e))
}

fn render_summary(report: &ValidationReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let _ = writeln!(out, "Data Quality Validation Report");
    let _ = writeln!(out, "==============================");
    let _ = writeln!(out, "Records:        {}", summary.total_records);
    let _ = writeln!(out, "Issues found:   {}", summary.total_issues_found);
    let _ = writeln!(
        out,
        "  High: {}  Medium: {}  Low: {}",
        summary.high_severity_issues, summary.medium_severity_issues, summary.low_severity_issues
    );
    let _ = writeln!(out, "Affected:       {}", summary.total_affected_records);
    let _ = writeln!(out, "Quality score:  {:.1}", summary.data_quality_score);
    let _ = writeln!(
        out,
        "Status:         {}",
        if report.validation_passed {
            "PASSED"
        } else {
            "FAILED"
        }
    );

    if !report.detailed_issues.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Issues:");
        for detailed in &report.detailed_issues {
            let issue = &detailed.issue;
            let _ = writeln!(
                out,
                "  [{}] {}: {} ({:.2}% of records)",
                issue.severity, issue.category, issue.description, detailed.affected_percentage
            );
        }
    }

    for block in &report.recommendations {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}:", block.title);
        for item in &block.items {
            let _ = writeln!(out, "  - {}", item);
        }
    }

    if !report.evaluation_errors.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Detectors that failed to run:");
        for failure in &report.evaluation_errors {
            let _ = writeln!(out, "  - {}: {}", failure.detector, failure.message);
        }
    }

    out
}

/// Writes rendered output to a file, or stdout when no path is given.
pub(crate) fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content).map_err(|e| {
            RecordLintError::io(format!("Failed to write to {}", path.display()), e)
        }),
        None => {
            println!("{}", content.trim_end());
            Ok(())
        }
    }
}

//! Markdown report generation
//!
//! This module renders a human-readable markdown report of a scan: run
//! information, batch statistics, and a table of the opportunities found.

use crate::output::traits::{ensure_parent_dir, OutputResult, ReportWriter, ScanSummary};
use crate::pipeline::ScanReport;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the markdown report to a file
#[derive(Debug, Clone)]
pub struct MarkdownReport {
    path: PathBuf,
}

impl MarkdownReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportWriter for MarkdownReport {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write_report(&self, report: &ScanReport) -> OutputResult<()> {
        generate_markdown_report(report, &self.path)
    }
}

/// Generates a markdown report for a finished scan
///
/// # Arguments
///
/// * `report` - The scan to render
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(report: &ScanReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);

    ensure_parent_dir(output_path)?;
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote markdown report to {}", output_path.display());
    Ok(())
}

/// Formats a scan as markdown
pub fn format_markdown_report(report: &ScanReport) -> String {
    let summary = ScanSummary::from_report(report);
    let mut md = String::new();

    // Title
    md.push_str("# RPA Opportunity Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed URL**: {}\n", summary.seed_url));
    md.push_str(&format!("- **Model**: {}\n", summary.model));
    md.push_str(&format!("- **Crawl Depth**: {}\n", summary.max_depth));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        summary.duration_seconds
    ));
    md.push_str(&format!("- **Outcome**: {}\n", summary.outcome));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!(
        "- **Pages Discovered**: {}\n",
        summary.pages_discovered
    ));
    md.push_str(&format!(
        "- **Opportunities Found**: {}\n",
        summary.opportunities
    ));
    md.push_str(&format!("- **Hit Rate**: {:.2}%\n\n", summary.hit_rate()));

    // Batch breakdown
    let batches = &summary.batches;
    md.push_str("## Batch Breakdown\n\n");
    md.push_str("| Batches | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Total | {} |\n", batches.total));
    md.push_str(&format!("| Classified | {} |\n", batches.classified));
    md.push_str(&format!(
        "| Skipped (no previews) | {} |\n",
        batches.skipped_no_previews
    ));
    md.push_str(&format!(
        "| Service Failures | {} |\n",
        batches.service_failures
    ));
    md.push_str(&format!(
        "| Unparseable Replies | {} |\n",
        batches.unparseable
    ));
    md.push_str(&format!(
        "| Rejected Items | {} |\n\n",
        batches.rejected_items
    ));

    // Results
    md.push_str("## Opportunities\n\n");
    if report.classification.results.is_empty() {
        md.push_str("No RPA opportunities were identified.\n");
    } else {
        md.push_str("| URL | Summary | RPA Opportunity |\n");
        md.push_str("|-----|---------|-----------------|\n");
        for result in &report.classification.results {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                escape_cell(&result.url),
                escape_cell(&result.summary),
                escape_cell(&result.rpa_opportunity)
            ));
        }
    }

    md
}

/// Makes a value safe for a single markdown table cell
fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace('\n', " ")
}

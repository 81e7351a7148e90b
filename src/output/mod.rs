//! Output module for scan reports
//!
//! This module handles:
//! - Generating markdown reports of scan results
//! - Exporting result records as JSON
//! - Printing a console summary

mod json;
mod markdown;
pub mod stats;
mod traits;

pub use json::{export_results_json, JsonExport};
pub use markdown::{format_markdown_report, generate_markdown_report, MarkdownReport};
pub use stats::{format_summary, print_summary};
pub use traits::{OutputError, OutputResult, ReportWriter, ScanSummary};

use crate::config::OutputConfig;
use std::path::PathBuf;

/// Builds the writers selected by the output configuration
///
/// The markdown report is always written; the JSON export only when a path
/// is configured.
pub fn writers_for(config: &OutputConfig) -> Vec<Box<dyn ReportWriter>> {
    let mut writers: Vec<Box<dyn ReportWriter>> = vec![Box::new(MarkdownReport::new(
        PathBuf::from(&config.report_path),
    ))];

    if let Some(json_path) = &config.json_path {
        writers.push(Box::new(JsonExport::new(PathBuf::from(json_path))));
    }

    writers
}

//! JSON export of scan results
//!
//! The export is a pretty-printed array of `{url, summary, rpa_opportunity}`
//! records in result order, ready for spreadsheets or further tooling.

use crate::classifier::StructuredResult;
use crate::output::traits::{ensure_parent_dir, OutputResult, ReportWriter};
use crate::pipeline::ScanReport;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the result records as JSON
#[derive(Debug, Clone)]
pub struct JsonExport {
    path: PathBuf,
}

impl JsonExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportWriter for JsonExport {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write_report(&self, report: &ScanReport) -> OutputResult<()> {
        export_results_json(&report.classification.results, &self.path)
    }
}

/// Writes `results` to `output_path` as a JSON array
pub fn export_results_json(results: &[StructuredResult], output_path: &Path) -> OutputResult<()> {
    ensure_parent_dir(output_path)?;
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::info!(
        "Exported {} results to {}",
        results.len(),
        output_path.display()
    );
    Ok(())
}

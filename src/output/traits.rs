//! Output writer trait and types
//!
//! This module defines the trait interface for report writers and the flat
//! summary view they render from a [`ScanReport`].

use crate::classifier::{BatchStats, RunOutcome};
use crate::pipeline::ScanReport;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Summary statistics for a scan
#[derive(Debug, Clone)]
pub struct ScanSummary {
    // Run metadata
    pub seed_url: String,
    pub model: String,
    pub max_depth: u32,
    pub started_at: String,
    pub finished_at: String,
    pub duration_seconds: i64,
    pub outcome: RunOutcome,
    pub config_hash: String,

    // Overall statistics
    pub pages_discovered: usize,
    pub opportunities: usize,

    // Batch breakdown
    pub batches: BatchStats,
}

impl ScanSummary {
    pub fn from_report(report: &ScanReport) -> Self {
        Self {
            seed_url: report.seed_url.clone(),
            model: report.model.clone(),
            max_depth: report.max_depth,
            started_at: report.started_at.to_rfc3339(),
            finished_at: report.finished_at.to_rfc3339(),
            duration_seconds: report.duration().num_seconds(),
            outcome: report.classification.outcome,
            config_hash: report.config_hash.clone(),
            pages_discovered: report.pages_discovered(),
            opportunities: report.opportunities(),
            batches: report.classification.stats.clone(),
        }
    }

    /// Share of discovered pages flagged as opportunities, as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.pages_discovered == 0 {
            return 0.0;
        }
        (self.opportunities as f64 / self.pages_discovered as f64) * 100.0
    }
}

/// Trait for report writers
///
/// Each writer renders a finished scan into one file.
pub trait ReportWriter {
    /// Destination file
    fn path(&self) -> &Path;

    /// Writes the report, replacing any existing file
    fn write_report(&self, report: &ScanReport) -> OutputResult<()>;
}

/// Creates the parent directory of `path` if it does not exist yet
pub(crate) fn ensure_parent_dir(path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

//! Console summary of a finished scan

use crate::output::traits::ScanSummary;
use crate::pipeline::ScanReport;

/// Prints a scan summary to stdout
pub fn print_summary(report: &ScanReport) {
    print!("{}", format_summary(report));
}

/// Formats the console summary
pub fn format_summary(report: &ScanReport) -> String {
    let summary = ScanSummary::from_report(report);
    let batches = &summary.batches;
    let mut out = String::new();

    out.push_str("=== RPA Scan Summary ===\n\n");

    out.push_str("Overview:\n");
    out.push_str(&format!("  Seed: {}\n", summary.seed_url));
    out.push_str(&format!("  Model: {}\n", summary.model));
    out.push_str(&format!("  Outcome: {}\n", summary.outcome));
    out.push_str(&format!(
        "  Pages discovered: {}\n",
        summary.pages_discovered
    ));
    out.push_str(&format!(
        "  Opportunities: {} ({:.1}%)\n",
        summary.opportunities,
        summary.hit_rate()
    ));
    out.push_str(&format!("  Duration: {}s\n\n", summary.duration_seconds));

    out.push_str("Batches:\n");
    out.push_str(&format!(
        "  {} of {} attempted, {} classified\n",
        batches.attempted(),
        batches.total,
        batches.classified
    ));
    if batches.skipped_no_previews > 0 {
        out.push_str(&format!(
            "  Skipped (no previews): {}\n",
            batches.skipped_no_previews
        ));
    }
    if batches.service_failures > 0 {
        out.push_str(&format!(
            "  Service failures: {}\n",
            batches.service_failures
        ));
    }
    if batches.unparseable > 0 {
        out.push_str(&format!("  Unparseable replies: {}\n", batches.unparseable));
    }
    out.push('\n');

    if !report.classification.results.is_empty() {
        out.push_str("Opportunities:\n");
        for result in &report.classification.results {
            out.push_str(&format!("  - {}\n", result.url));
            out.push_str(&format!("    {}\n", result.rpa_opportunity));
        }
        out.push('\n');
    }

    out
}

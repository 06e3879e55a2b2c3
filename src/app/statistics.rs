//! Statistics printing.

use log::info;

use crate::batch::PassReport;
use crate::error_handling::FailureStats;

/// Prints failure counts by kind, if any failure was recorded.
pub fn print_failure_statistics(stats: &FailureStats) {
    let total = stats.total();
    if total == 0 {
        return;
    }
    info!("Failure Counts ({} total):", total);
    for (kind, count) in stats.non_zero() {
        info!("   {}: {}", kind.as_str(), count);
    }
}

/// Prints a simple one-line summary of the run.
pub fn print_simple_summary(roots: usize, passes: &[PassReport], elapsed_seconds: f64) {
    let failed: usize = passes.iter().map(|p| p.failed).sum();
    info!(
        "✅ Enriched {} root{} in {} pass{} ({} failure{}) in {:.1}s",
        roots,
        if roots == 1 { "" } else { "s" },
        passes.len(),
        if passes.len() == 1 { "" } else { "es" },
        failed,
        if failed == 1 { "" } else { "s" },
        elapsed_seconds
    );
}

//! End-to-end enrichment runs.
//!
//! A run reads free text, groups the URLs it contains by canonical root, and
//! applies the selected passes in a fixed order: IP resolution, redirect check,
//! crawl, third-party IP resolution.

mod input;

use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::app::{
    cancel_on_ctrl_c, print_failure_statistics, print_simple_summary, spawn_progress_logger,
};
use crate::batch::{BatchOrchestrator, PassKind, PassReport};
use crate::config::Config;
use crate::extract::{group_entries, scan_text};
use crate::initialization::init_orchestrator;
use crate::models::RootEntry;

pub use input::read_input;

/// Results of an enrichment run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Every distinct root found in the input, in first-seen order
    pub entries: Vec<RootEntry>,
    /// One report per pass that ran, in execution order
    pub passes: Vec<PassReport>,
    /// True when the run was interrupted before all passes completed
    pub cancelled: bool,
    /// Wall-clock duration of the passes
    pub elapsed_seconds: f64,
}

/// Runs an enrichment with the provided configuration.
///
/// This is the main entry point for the library. Ctrl-C stops the run
/// gracefully: the current item finishes and the partial results are returned.
///
/// # Errors
///
/// This function will return an error if:
/// - The input cannot be read
/// - The HTTP clients or the DNS backend cannot be initialized
///
/// Per-entry failures never fail the run; they are recorded on the entries.
///
/// # Example
///
/// ```no_run
/// use domain_trace::{run_enrichment, Config};
/// use std::path::PathBuf;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config {
///     file: PathBuf::from("notes.txt"),
///     ..Default::default()
/// };
/// let report = run_enrichment(config).await?;
/// println!("Enriched {} roots", report.entries.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_enrichment(config: Config) -> Result<RunReport> {
    let text = read_input(&config.file).await?;
    let entries = group_entries(scan_text(&text));

    let orchestrator =
        init_orchestrator(&config).context("Failed to initialize network resources")?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel_on_ctrl_c(cancel.clone());
    let report = enrich(&config, orchestrator, entries, cancel.clone()).await;

    // Release the Ctrl-C listener
    cancel.cancel();
    let _ = ctrl_c.await;

    Ok(report)
}

/// Applies the passes selected by `config` to `entries`.
///
/// Pass events are logged as progress; failure statistics and a summary line
/// are printed once the last pass completes.
pub async fn enrich(
    config: &Config,
    orchestrator: BatchOrchestrator,
    mut entries: Vec<RootEntry>,
    cancel: CancellationToken,
) -> RunReport {
    info!("Found {} distinct root(s)", entries.len());
    let start = Instant::now();

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let progress = spawn_progress_logger(events_rx);
    let orchestrator = orchestrator
        .with_events(events_tx)
        .with_cancellation(cancel.clone());

    let mut passes = Vec::new();
    for pass in selected_passes(config) {
        if cancel.is_cancelled() {
            break;
        }
        let report = match pass {
            PassKind::ResolveIps => orchestrator.resolve_ips(&mut entries).await,
            PassKind::CheckRedirects => orchestrator.check_redirects(&mut entries).await,
            PassKind::Crawl => orchestrator.crawl(&mut entries).await,
            PassKind::ResolveThirdPartyIps => {
                orchestrator.resolve_third_party_ips(&mut entries).await
            }
        };
        passes.push(report);
    }
    let cancelled = cancel.is_cancelled();

    let stats = orchestrator.stats().clone();
    // Dropping the orchestrator closes the event channel
    drop(orchestrator);
    if let Err(e) = progress.await {
        warn!("Progress logger stopped unexpectedly: {e}");
    }

    let elapsed_seconds = start.elapsed().as_secs_f64();
    print_failure_statistics(&stats);
    print_simple_summary(entries.len(), &passes, elapsed_seconds);

    RunReport {
        entries,
        passes,
        cancelled,
        elapsed_seconds,
    }
}

/// Passes enabled by `config`, in execution order.
pub fn selected_passes(config: &Config) -> Vec<PassKind> {
    [
        (config.resolve_ips, PassKind::ResolveIps),
        (config.check_redirects, PassKind::CheckRedirects),
        (config.crawl, PassKind::Crawl),
        (config.resolve_third_party_ips, PassKind::ResolveThirdPartyIps),
    ]
    .into_iter()
    .filter_map(|(enabled, pass)| enabled.then_some(pass))
    .collect()
}

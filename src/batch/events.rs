//! Pass reports and observer events.

use std::fmt;

use serde::Serialize;

use crate::models::RootEntry;

/// The four enrichment passes, in the order a run executes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    /// IPv4 lookup for every root.
    ResolveIps,
    /// Redirect chain walk for every root.
    CheckRedirects,
    /// Page fetch and third-party link extraction.
    Crawl,
    /// IPv4 lookup for every third party found by the crawl.
    ResolveThirdPartyIps,
}

impl PassKind {
    /// Human-readable pass name used in logs and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            PassKind::ResolveIps => "IP resolution",
            PassKind::CheckRedirects => "Redirect check",
            PassKind::Crawl => "Crawl",
            PassKind::ResolveThirdPartyIps => "Third-party IP resolution",
        }
    }

    fn success_verb(&self) -> &'static str {
        match self {
            PassKind::ResolveIps | PassKind::ResolveThirdPartyIps => "resolved",
            PassKind::CheckRedirects => "checked",
            PassKind::Crawl => "crawled",
        }
    }

    fn discovered_noun(&self) -> Option<&'static str> {
        match self {
            PassKind::CheckRedirects => Some("redirect(s) found"),
            PassKind::Crawl => Some("third-party domain(s) found"),
            PassKind::ResolveIps | PassKind::ResolveThirdPartyIps => None,
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate outcome of one pass.
///
/// `discovered` counts redirects detected (redirect check) or third-party roots
/// found (crawl); it stays zero for the IP passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Which pass this report describes.
    pub pass: PassKind,
    /// Items the pass was asked to process.
    pub total: usize,
    /// Items actually processed (less than `total` only when cancelled).
    pub processed: usize,
    /// Items whose operation succeeded.
    pub succeeded: usize,
    /// Items whose failure was recorded on the entry.
    pub failed: usize,
    /// Redirects or third-party roots found.
    pub discovered: usize,
    /// True when cancellation stopped the pass early.
    pub cancelled: bool,
}

impl PassReport {
    /// An empty report for a pass over `total` items.
    pub fn new(pass: PassKind, total: usize) -> Self {
        Self {
            pass,
            total,
            processed: 0,
            succeeded: 0,
            failed: 0,
            discovered: 0,
            cancelled: false,
        }
    }

    /// One-line human summary, e.g. `IP resolution: 2 resolved, 1 failed`.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{}: {} {}, {} failed",
            self.pass,
            self.succeeded,
            self.pass.success_verb(),
            self.failed
        );
        if let Some(noun) = self.pass.discovered_noun() {
            line.push_str(&format!(", {} {}", self.discovered, noun));
        }
        if self.cancelled {
            line.push_str(&format!(
                " (cancelled after {}/{})",
                self.processed, self.total
            ));
        }
        line
    }
}

/// Immutable snapshots sent to observers while a pass runs.
#[derive(Debug, Clone)]
pub enum PassEvent {
    /// A pass is about to process `total` items.
    Started {
        /// The pass starting.
        pass: PassKind,
        /// Items it will process.
        total: usize,
    },
    /// The entry at `index` changed; `entry` is a copy taken right after the change.
    EntryUpdated {
        /// The pass that changed the entry.
        pass: PassKind,
        /// Position of the entry in the working set.
        index: usize,
        /// Snapshot of the entry.
        entry: RootEntry,
    },
    /// The pass ended; carries its final report.
    Finished(PassReport),
}

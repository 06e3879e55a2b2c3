//! Sequential, paced enrichment passes over root entries.

use std::sync::Arc;

use log::{info, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::dns::NameResolver;
use crate::error_handling::{FailureKind, FailureStats};
use crate::fetch::{PageFetcher, RedirectResolver};
use crate::models::{CrawlResult, RootEntry};
use crate::parse::extract_third_party;

use super::events::{PassEvent, PassKind, PassReport};
use super::pacing::{Pacer, PacingPolicy};

/// Applies one component to every entry, one entry at a time, in list order.
///
/// Each pass takes the entries exclusively for its whole duration, clears the
/// fields it owns, then records success or failure on each entry individually.
/// A failing entry never stops the pass.
pub struct BatchOrchestrator {
    resolver: NameResolver,
    redirects: RedirectResolver,
    fetcher: PageFetcher,
    pacing: PacingPolicy,
    stats: Arc<FailureStats>,
    events: Option<UnboundedSender<PassEvent>>,
    cancel: CancellationToken,
}

impl BatchOrchestrator {
    /// Builds an orchestrator over the three components with the given pacing.
    pub fn new(
        resolver: NameResolver,
        redirects: RedirectResolver,
        fetcher: PageFetcher,
        pacing: PacingPolicy,
    ) -> Self {
        Self {
            resolver,
            redirects,
            fetcher,
            pacing,
            stats: Arc::new(FailureStats::new()),
            events: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Sends `PassEvent`s to `events` while passes run.
    pub fn with_events(mut self, events: UnboundedSender<PassEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Stops passes cooperatively once `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Failure counters accumulated over every pass run so far.
    pub fn stats(&self) -> &Arc<FailureStats> {
        &self.stats
    }

    /// Resolves each root's host to its first IPv4 address.
    pub async fn resolve_ips(&self, entries: &mut [RootEntry]) -> PassReport {
        let pass = PassKind::ResolveIps;
        for entry in entries.iter_mut() {
            entry.ip = None;
            entry.ip_error = None;
        }

        let mut report = self.begin(pass, entries.len());
        let mut pacer = Pacer::new(self.pacing.ip_delay);
        for (index, entry) in entries.iter_mut().enumerate() {
            if !pacer.ready(&self.cancel).await {
                report.cancelled = true;
                break;
            }

            match self.resolver.resolve(entry.root().host()).await {
                Ok(ip) => {
                    entry.ip = Some(ip);
                    report.succeeded += 1;
                }
                Err(e) => {
                    warn!("Failed to resolve {}: {e}", entry.root());
                    self.stats.increment(FailureKind::from(&e));
                    entry.ip_error = Some(e);
                    report.failed += 1;
                }
            }
            report.processed += 1;
            self.entry_updated(pass, index, entry);
        }
        self.finish(report)
    }

    /// Walks each root's redirect chain.
    ///
    /// Loops, hop limits and missing `Location` headers end the walk without
    /// failing the entry; only a failed probe counts as a failure.
    pub async fn check_redirects(&self, entries: &mut [RootEntry]) -> PassReport {
        let pass = PassKind::CheckRedirects;
        for entry in entries.iter_mut() {
            entry.redirect = None;
            entry.redirect_stop = None;
        }

        let mut report = self.begin(pass, entries.len());
        let mut pacer = Pacer::new(self.pacing.redirect_delay);
        for (index, entry) in entries.iter_mut().enumerate() {
            if !pacer.ready(&self.cancel).await {
                report.cancelled = true;
                break;
            }

            let check = self.redirects.check(&root_url(entry)).await;
            if let Some(kind) = check.stop.failure_kind() {
                self.stats.increment(kind);
            }
            if check.stop.is_probe_failure() {
                warn!("Redirect check failed for {}: {:?}", entry.root(), check.stop);
                report.failed += 1;
            } else {
                report.succeeded += 1;
            }
            if check.redirect.is_some() {
                report.discovered += 1;
            }
            entry.redirect = check.redirect;
            entry.redirect_stop = Some(check.stop);
            report.processed += 1;
            self.entry_updated(pass, index, entry);
        }
        self.finish(report)
    }

    /// Fetches each root (or its redirect destination) and records the
    /// third-party domains the page references.
    pub async fn crawl(&self, entries: &mut [RootEntry]) -> PassReport {
        let pass = PassKind::Crawl;
        for entry in entries.iter_mut() {
            entry.crawl = None;
        }

        let mut report = self.begin(pass, entries.len());
        let mut pacer = Pacer::new(self.pacing.crawl_delay);
        for (index, entry) in entries.iter_mut().enumerate() {
            if !pacer.ready(&self.cancel).await {
                report.cancelled = true;
                break;
            }

            let root = root_url(entry);
            let preferred = entry.preferred_final_url().map(str::to_string);
            let target = PageFetcher::target(&root, preferred.as_deref()).to_string();

            let result = match self.fetcher.fetch(&root, preferred.as_deref()).await {
                Ok(page) => {
                    let roots = extract_third_party(&page.content, &page.url);
                    report.succeeded += 1;
                    report.discovered += roots.len();
                    CrawlResult::success(page.url.as_str(), roots)
                }
                Err(e) => {
                    warn!("Failed to crawl {target}: {e}");
                    self.stats.increment(FailureKind::from(&e));
                    report.failed += 1;
                    CrawlResult::failure(target, &e)
                }
            };
            entry.crawl = Some(result);
            report.processed += 1;
            self.entry_updated(pass, index, entry);
        }
        self.finish(report)
    }

    /// Resolves every third-party domain found by the last crawl.
    ///
    /// Items are the third parties themselves, flattened across entries in list
    /// order; the owning entry is reported as updated after each lookup.
    pub async fn resolve_third_party_ips(&self, entries: &mut [RootEntry]) -> PassReport {
        let pass = PassKind::ResolveThirdPartyIps;
        for entry in entries.iter_mut() {
            for third_party in entry.third_parties_mut() {
                third_party.ip = None;
                third_party.ip_error = None;
            }
        }

        let total = entries.iter().map(|e| e.third_parties().len()).sum();
        let mut report = self.begin(pass, total);
        let mut pacer = Pacer::new(self.pacing.ip_delay);
        'entries: for (index, entry) in entries.iter_mut().enumerate() {
            for position in 0..entry.third_parties().len() {
                if !pacer.ready(&self.cancel).await {
                    report.cancelled = true;
                    break 'entries;
                }

                let host = entry.third_parties()[position].root().host().to_string();
                let result = self.resolver.resolve(&host).await;
                let third_party = &mut entry.third_parties_mut()[position];
                match result {
                    Ok(ip) => {
                        third_party.ip = Some(ip);
                        report.succeeded += 1;
                    }
                    Err(e) => {
                        warn!("Failed to resolve third party {host}: {e}");
                        self.stats.increment(FailureKind::from(&e));
                        third_party.ip_error = Some(e);
                        report.failed += 1;
                    }
                }
                report.processed += 1;
                self.entry_updated(pass, index, entry);
            }
        }
        self.finish(report)
    }

    fn begin(&self, pass: PassKind, total: usize) -> PassReport {
        info!("{pass}: {total} item(s)");
        self.emit(PassEvent::Started { pass, total });
        PassReport::new(pass, total)
    }

    fn entry_updated(&self, pass: PassKind, index: usize, entry: &RootEntry) {
        if self.events.is_some() {
            self.emit(PassEvent::EntryUpdated {
                pass,
                index,
                entry: entry.clone(),
            });
        }
    }

    fn finish(&self, report: PassReport) -> PassReport {
        if report.cancelled {
            warn!("{}", report.summary());
        } else {
            info!("{}", report.summary());
        }
        self.emit(PassEvent::Finished(report.clone()));
        report
    }

    fn emit(&self, event: PassEvent) {
        if let Some(events) = &self.events {
            // A dropped observer must not stop the pass
            let _ = events.send(event);
        }
    }
}

/// The root as a URL string (`https://example.com/`).
fn root_url(entry: &RootEntry) -> String {
    entry
        .root()
        .to_url()
        .map(String::from)
        .unwrap_or_else(|_| entry.root().to_string())
}

//! Enrichment data model.
//!
//! Entries are created once per extraction and then mutated in place by the
//! batch passes. Every type serializes so snapshots can be printed or sent to an
//! observer.

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::domain::CanonicalRoot;
use crate::error_handling::{DnsError, FailureKind, FetchError};

/// One distinct canonical root found in the input, plus everything learned about it.
#[derive(Debug, Clone, Serialize)]
pub struct RootEntry {
    root: CanonicalRoot,
    /// Raw URL strings that canonicalized to this root, first-seen order.
    pub originals: Vec<String>,
    /// Resolved IPv4 address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<Ipv4Addr>,
    /// Why resolution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_error: Option<DnsError>,
    /// Redirect found by the last check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectResult>,
    /// Why the last redirect check stopped walking the chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_stop: Option<RedirectStop>,
    /// Outcome of the last crawl.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crawl: Option<CrawlResult>,
}

impl RootEntry {
    /// A fresh entry with one original and nothing enriched yet.
    pub fn new(root: CanonicalRoot, original: impl Into<String>) -> Self {
        Self {
            root,
            originals: vec![original.into()],
            ip: None,
            ip_error: None,
            redirect: None,
            redirect_stop: None,
            crawl: None,
        }
    }

    /// The grouping key. Immutable for the life of the entry.
    pub fn root(&self) -> &CanonicalRoot {
        &self.root
    }

    /// URL a crawl should fetch: the redirect destination when one is known.
    pub fn preferred_final_url(&self) -> Option<&str> {
        self.redirect.as_ref().map(|r| r.final_url())
    }

    /// Third parties found by the last successful crawl, if any.
    pub fn third_parties(&self) -> &[ThirdPartyEntry] {
        self.crawl
            .as_ref()
            .map(|c| c.third_parties.as_slice())
            .unwrap_or(&[])
    }

    /// Mutable view used by the third-party IP pass.
    pub fn third_parties_mut(&mut self) -> &mut [ThirdPartyEntry] {
        match self.crawl.as_mut() {
            Some(crawl) => crawl.third_parties.as_mut_slice(),
            None => &mut [],
        }
    }
}

/// A third-party domain referenced by a crawled page.
#[derive(Debug, Clone, Serialize)]
pub struct ThirdPartyEntry {
    root: CanonicalRoot,
    /// Resolved IPv4 address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<Ipv4Addr>,
    /// Why resolution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_error: Option<DnsError>,
}

impl ThirdPartyEntry {
    /// An unresolved third party.
    pub fn new(root: CanonicalRoot) -> Self {
        Self {
            root,
            ip: None,
            ip_error: None,
        }
    }

    /// The third-party root.
    pub fn root(&self) -> &CanonicalRoot {
        &self.root
    }
}

/// A detected redirect: at least two hops, ending somewhere other than the start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectResult {
    /// Hop 0 is the probed URL; each later hop is a resolved `Location` target.
    pub chain: Vec<String>,
    /// Status of the last response received, if any response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// IPv4 address of the final host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_ip: Option<Ipv4Addr>,
    /// Why the final host did not resolve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_ip_error: Option<DnsError>,
}

impl RedirectResult {
    /// Last URL in the chain.
    pub fn final_url(&self) -> &str {
        self.chain.last().map(String::as_str).unwrap_or_default()
    }

    /// Number of redirects followed.
    pub fn hop_count(&self) -> usize {
        self.chain.len().saturating_sub(1)
    }
}

/// Why a redirect walk stopped.
///
/// These are termination conditions, not errors: the chain accumulated before the
/// stop is always kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RedirectStop {
    /// A non-3xx response ended the chain.
    Final,
    /// The next `Location` pointed at a URL already in the chain.
    LoopDetected,
    /// The maximum number of hops was reached.
    HopLimitExceeded,
    /// A 3xx response carried no `Location` header.
    MissingLocation,
    /// A 3xx response carried a `Location` that could not be resolved to a URL.
    InvalidLocation,
    /// The probe itself failed (timeout, transport error).
    ProbeFailed(FetchError),
}

impl RedirectStop {
    /// The failure kind this stop counts as, `None` for a normal end of chain.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            RedirectStop::Final => None,
            RedirectStop::LoopDetected => Some(FailureKind::LoopDetected),
            RedirectStop::HopLimitExceeded => Some(FailureKind::HopLimitExceeded),
            RedirectStop::MissingLocation => Some(FailureKind::MissingLocation),
            RedirectStop::InvalidLocation => Some(FailureKind::InvalidLocation),
            RedirectStop::ProbeFailed(e) => Some(FailureKind::from(e)),
        }
    }

    /// True when the walk ended because a probe failed.
    pub fn is_probe_failure(&self) -> bool {
        matches!(self, RedirectStop::ProbeFailed(_))
    }
}

/// Outcome class of a crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrawlStatus {
    /// Page fetched and parsed.
    Success,
    /// Fetch denied by cross-origin policy.
    CorsBlocked,
    /// Timeout or transport failure.
    Error,
}

/// Result of fetching a page and extracting its third-party domains.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    /// Outcome class.
    pub status: CrawlStatus,
    /// URL actually fetched: the redirect destination if known, else the root.
    pub crawled_url: String,
    /// Third-party roots in discovery order.
    pub third_parties: Vec<ThirdPartyEntry>,
    /// Failure message when the crawl did not succeed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CrawlResult {
    /// A successful crawl of `crawled_url` that found `roots`.
    pub fn success(crawled_url: impl Into<String>, roots: Vec<CanonicalRoot>) -> Self {
        Self {
            status: CrawlStatus::Success,
            crawled_url: crawled_url.into(),
            third_parties: roots.into_iter().map(ThirdPartyEntry::new).collect(),
            error: None,
        }
    }

    /// A failed crawl; `Blocked` maps to `CorsBlocked`, everything else to `Error`.
    pub fn failure(crawled_url: impl Into<String>, error: &FetchError) -> Self {
        let status = match error {
            FetchError::Blocked(_) => CrawlStatus::CorsBlocked,
            FetchError::Timeout | FetchError::Transport(_) => CrawlStatus::Error,
        };
        Self {
            status,
            crawled_url: crawled_url.into(),
            third_parties: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// True when the page was fetched and parsed.
    pub fn is_success(&self) -> bool {
        self.status == CrawlStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::canonical_root;

    fn entry(raw: &str) -> RootEntry {
        RootEntry::new(canonical_root(raw).unwrap(), raw)
    }

    #[test]
    fn test_preferred_final_url_without_redirect() {
        let e = entry("https://a.test/x");
        assert_eq!(e.preferred_final_url(), None);
        assert!(e.third_parties().is_empty());
    }

    #[test]
    fn test_preferred_final_url_with_redirect() {
        let mut e = entry("https://a.test/");
        e.redirect = Some(RedirectResult {
            chain: vec!["https://a.test/".into(), "https://b.test/".into()],
            status_code: Some(200),
            final_ip: None,
            final_ip_error: None,
        });
        assert_eq!(e.preferred_final_url(), Some("https://b.test/"));
        assert_eq!(e.redirect.as_ref().unwrap().hop_count(), 1);
    }

    #[test]
    fn test_crawl_failure_status_mapping() {
        let blocked = CrawlResult::failure("https://a.test/", &FetchError::Blocked("cors".into()));
        assert_eq!(blocked.status, CrawlStatus::CorsBlocked);
        let timeout = CrawlResult::failure("https://a.test/", &FetchError::Timeout);
        assert_eq!(timeout.status, CrawlStatus::Error);
        assert_eq!(timeout.error.as_deref(), Some("request timed out"));
        assert!(!timeout.is_success());
    }

    #[test]
    fn test_entry_serialization_skips_empty_fields() {
        let e = entry("https://a.test/x");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["root"], "https://a.test");
        assert_eq!(json["originals"][0], "https://a.test/x");
        assert!(json.get("ip").is_none());
        assert!(json.get("redirect").is_none());
    }

    #[test]
    fn test_crawl_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&CrawlStatus::CorsBlocked).unwrap(),
            "\"cors-blocked\""
        );
    }
}

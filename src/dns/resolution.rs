//! Hostname to IPv4 resolution.
//!
//! `NameResolver` sits on top of a pluggable `DnsLookup` capability and adds the
//! behavior every caller relies on: IPv4 literals short-circuit, empty hosts are
//! rejected, and every lookup is bounded by a timeout.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;

use crate::domain::clean_url;
use crate::error_handling::{DnsError, UrlError};

/// A-record lookup capability.
///
/// Implementations return the first IPv4 address for `hostname`, `NoRecord` when
/// the lookup succeeded without any A record, and `ResolutionFailed` for
/// everything else.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// First A record of `hostname`.
    async fn lookup_a(&self, hostname: &str) -> Result<Ipv4Addr, DnsError>;
}

/// `DnsLookup` backed by the hickory resolver (system or default nameservers).
pub struct SystemLookup {
    resolver: Arc<TokioAsyncResolver>,
}

impl SystemLookup {
    /// Wraps a shared hickory resolver.
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl DnsLookup for SystemLookup {
    async fn lookup_a(&self, hostname: &str) -> Result<Ipv4Addr, DnsError> {
        match self.resolver.lookup_ip(hostname).await {
            Ok(response) => response
                .iter()
                .find_map(|ip| match ip {
                    IpAddr::V4(v4) => Some(v4),
                    IpAddr::V6(_) => None,
                })
                .ok_or(DnsError::NoRecord),
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => Err(DnsError::NoRecord),
                _ => Err(DnsError::ResolutionFailed(e.to_string())),
            },
        }
    }
}

/// Resolves hostnames to their first IPv4 address.
#[derive(Clone)]
pub struct NameResolver {
    lookup: Arc<dyn DnsLookup>,
    timeout: Duration,
}

impl NameResolver {
    /// Creates a resolver that bounds every lookup by `timeout`.
    pub fn new(lookup: Arc<dyn DnsLookup>, timeout: Duration) -> Self {
        Self { lookup, timeout }
    }

    /// Resolves `hostname` to its first A record.
    ///
    /// # Errors
    ///
    /// - `DnsError::NoRecord` if the name has no A record (IPv6 literals included)
    /// - `DnsError::ResolutionFailed` on transport failure or timeout
    /// - `DnsError::InvalidUrl` if the hostname is empty
    pub async fn resolve(&self, hostname: &str) -> Result<Ipv4Addr, DnsError> {
        let host = hostname.trim().trim_end_matches('.');
        if host.is_empty() {
            return Err(DnsError::InvalidUrl(UrlError::new(hostname, "empty hostname")));
        }
        if let Ok(v4) = host.parse::<Ipv4Addr>() {
            return Ok(v4);
        }
        if host.starts_with('[') {
            return Err(DnsError::NoRecord);
        }

        log::debug!("Resolving A record for {host}");
        match tokio::time::timeout(self.timeout, self.lookup.lookup_a(host)).await {
            Ok(result) => result,
            Err(_) => Err(DnsError::ResolutionFailed(format!(
                "lookup timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    /// Resolves the host of a raw URL string.
    pub async fn resolve_url(&self, url: &str) -> Result<Ipv4Addr, DnsError> {
        let parsed = clean_url(url).map_err(DnsError::InvalidUrl)?;
        let host = parsed.host_str().unwrap_or_default().to_string();
        self.resolve(&host).await
    }
}

//! HTTP redirect chain resolution.
//!
//! This module follows redirect chains manually, one header-only probe per hop, to
//! record the full path from the starting URL to its final destination.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use url::Url;

use crate::dns::NameResolver;
use crate::error_handling::FetchError;
use crate::models::{RedirectResult, RedirectStop};

use super::transport::HeadProbe;

/// Everything a single redirect check learned.
///
/// `redirect` is `None` unless at least one hop was followed to a different URL;
/// `stop` is always set and says why the walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectCheck {
    /// The detected redirect, if any.
    pub redirect: Option<RedirectResult>,
    /// Why the walk ended.
    pub stop: RedirectStop,
}

/// Walks redirect chains with loop and depth protection.
#[derive(Clone)]
pub struct RedirectResolver {
    probe: Arc<dyn HeadProbe>,
    resolver: NameResolver,
    timeout: Duration,
    max_hops: usize,
}

impl RedirectResolver {
    /// Creates a resolver probing with `timeout` per hop and following at most
    /// `max_hops` redirects. The final host is resolved with `resolver`.
    pub fn new(
        probe: Arc<dyn HeadProbe>,
        resolver: NameResolver,
        timeout: Duration,
        max_hops: usize,
    ) -> Self {
        Self {
            probe,
            resolver,
            timeout,
            max_hops,
        }
    }

    /// Resolves the redirect chain starting at `start_url`.
    ///
    /// Never fails: probe errors, loops and the hop limit all terminate the walk
    /// and keep the chain accumulated so far. When a redirect is detected the
    /// final host is resolved and attached to the result; a failed lookup is
    /// recorded on the result and does not cancel the detection.
    pub async fn check(&self, start_url: &str) -> RedirectCheck {
        let start = match Url::parse(start_url) {
            Ok(url) => url,
            Err(e) => {
                return RedirectCheck {
                    redirect: None,
                    stop: RedirectStop::ProbeFailed(FetchError::Transport(format!(
                        "invalid URL '{start_url}': {e}"
                    ))),
                }
            }
        };

        let (chain, status_code, stop) = self.walk(start).await;

        let redirected = chain.len() >= 2 && chain.last() != chain.first();
        if !redirected {
            debug!("No redirect for {start_url} ({stop:?})");
            return RedirectCheck {
                redirect: None,
                stop,
            };
        }

        let mut result = RedirectResult {
            chain,
            status_code,
            final_ip: None,
            final_ip_error: None,
        };
        debug!(
            "Redirect detected: {start_url} -> {} ({} hop(s), {stop:?})",
            result.final_url(),
            result.hop_count()
        );

        match self.resolver.resolve_url(result.final_url()).await {
            Ok(ip) => result.final_ip = Some(ip),
            Err(e) => {
                debug!("Failed to resolve final host of {}: {e}", result.final_url());
                result.final_ip_error = Some(e);
            }
        }

        RedirectCheck {
            redirect: Some(result),
            stop,
        }
    }

    /// Probe loop: `Probing -> (Redirecting -> Probing)* -> Terminal`.
    async fn walk(&self, start: Url) -> (Vec<String>, Option<u16>, RedirectStop) {
        let mut chain = vec![start.to_string()];
        let mut visited: HashSet<String> = HashSet::from([start.to_string()]);
        let mut current = start;
        let mut status_code = None;

        let stop = loop {
            let response =
                match tokio::time::timeout(self.timeout, self.probe.head(&current, self.timeout))
                    .await
                {
                    Ok(Ok(response)) => response,
                    Ok(Err(e)) => break RedirectStop::ProbeFailed(e),
                    Err(_) => break RedirectStop::ProbeFailed(FetchError::Timeout),
                };
            status_code = Some(response.status);

            if !(300..400).contains(&response.status) {
                break RedirectStop::Final;
            }

            let Some(location) = response.location else {
                log::warn!(
                    "Redirect status {} for {} but no Location header",
                    response.status,
                    current
                );
                break RedirectStop::MissingLocation;
            };

            let next = match current.join(location.trim()) {
                Ok(next) if matches!(next.scheme(), "http" | "https") => next,
                _ => {
                    debug!("Unusable Location '{location}' from {current}");
                    break RedirectStop::InvalidLocation;
                }
            };

            if visited.contains(next.as_str()) {
                debug!("Redirect loop at {next} (from {current})");
                break RedirectStop::LoopDetected;
            }
            if chain.len() > self.max_hops {
                debug!("Hop limit {} reached at {current}", self.max_hops);
                break RedirectStop::HopLimitExceeded;
            }

            debug!("{} {current} -> {next}", response.status);
            visited.insert(next.to_string());
            chain.push(next.to_string());
            current = next;
        };

        (chain, status_code, stop)
    }
}

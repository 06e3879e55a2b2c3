//! Fixed-interval pacing between batch items.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::{Config, CRAWL_DELAY, IP_RESOLUTION_DELAY, REDIRECT_CHECK_DELAY};

/// Minimum delays between consecutive items, per pass type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    /// Between lookups of the IP resolution passes (roots and third parties)
    pub ip_delay: Duration,
    /// Between redirect checks
    pub redirect_delay: Duration,
    /// Between page crawls
    pub crawl_delay: Duration,
}

impl PacingPolicy {
    /// No delays at all. Useful in tests and for local targets.
    pub fn none() -> Self {
        Self {
            ip_delay: Duration::ZERO,
            redirect_delay: Duration::ZERO,
            crawl_delay: Duration::ZERO,
        }
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            ip_delay: IP_RESOLUTION_DELAY,
            redirect_delay: REDIRECT_CHECK_DELAY,
            crawl_delay: CRAWL_DELAY,
        }
    }
}

impl From<&Config> for PacingPolicy {
    fn from(config: &Config) -> Self {
        Self {
            ip_delay: config.ip_delay,
            redirect_delay: config.redirect_delay,
            crawl_delay: config.crawl_delay,
        }
    }
}

/// Gate in front of every item of one pass.
///
/// The first item starts immediately; every later item waits the full delay
/// after the previous one finished. Nothing waits after the last item.
pub struct Pacer {
    delay: Duration,
    started: bool,
}

impl Pacer {
    /// A pacer enforcing `delay` between consecutive items.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: false,
        }
    }

    /// Waits until the next item may start.
    ///
    /// Returns `false` if `cancel` fired before or during the wait; the caller
    /// must not start the item in that case.
    pub async fn ready(&mut self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        if !self.started {
            self.started = true;
            return true;
        }
        if self.delay.is_zero() {
            return true;
        }
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.delay) => true,
        }
    }
}

//! Configuration constants.
//!
//! This module defines the timeouts, pacing delays and size limits used throughout
//! the application. `Config::default()` is built from these values.

use std::time::Duration;

// Network operation timeouts
/// DNS query timeout in seconds
/// Most DNS queries complete in <1s, 3s provides good buffer while failing fast
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// Timeout for a single header-only probe while walking a redirect chain
pub const REDIRECT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for fetching page content to extract third-party links
pub const PAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

// Redirect handling
/// Maximum number of redirect hops to follow
/// Prevents infinite redirect loops and excessive request chains
pub const MAX_REDIRECT_HOPS: usize = 10;

// Pass pacing
/// Minimum delay between two entries of an IP resolution pass
pub const IP_RESOLUTION_DELAY: Duration = Duration::from_millis(200);
/// Minimum delay between two entries of a redirect-check pass
pub const REDIRECT_CHECK_DELAY: Duration = Duration::from_millis(500);
/// Minimum delay between two entries of a crawl pass
pub const CRAWL_DELAY: Duration = Duration::from_millis(500);

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; domain_trace/0.1)";

/// Google's public DNS-over-HTTPS JSON endpoint
pub const DEFAULT_DOH_ENDPOINT: &str = "https://dns.google/resolve";

// Response and body size limits
/// Maximum response body size in bytes (2MB)
/// Larger bodies are truncated before link extraction
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Maximum error message length kept on an entry
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 500;

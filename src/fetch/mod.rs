//! HTTP fetching: redirect chains and page content.
//!
//! This module provides:
//! - The `HeadProbe` / `PageGet` capabilities and their reqwest implementation
//! - `RedirectResolver`, which walks redirect chains one probe at a time
//! - `PageFetcher`, which retrieves content for link extraction

mod page;
mod redirects;
mod transport;

// Re-export public API
pub use page::{FetchedPage, PageFetcher};
pub use redirects::{RedirectCheck, RedirectResolver};
pub use transport::{HeadProbe, PageGet, PageResponse, ProbeResponse, ReqwestTransport};

#[cfg(test)]
mod tests;

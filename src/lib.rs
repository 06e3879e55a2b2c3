//! domain_trace library: root-domain grouping and network enrichment
//!
//! This library finds URLs in free text, groups them by canonical root
//! (`scheme://host`), and enriches each root with its IPv4 address, its HTTP
//! redirect chain, and the third-party domains its page references.
//!
//! # Example
//!
//! ```no_run
//! use domain_trace::{run_enrichment, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("notes.txt"),
//!     crawl: true,
//!     ..Default::default()
//! };
//!
//! let report = run_enrichment(config).await?;
//! for entry in &report.entries {
//!     println!("{} -> {:?}", entry.root(), entry.ip);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
pub mod batch;
pub mod config;
pub mod dns;
pub mod domain;
pub mod error_handling;
pub mod extract;
pub mod fetch;
pub mod initialization;
pub mod models;
pub mod parse;
mod run;
#[cfg(test)]
mod testing;

// Re-export public API
pub use batch::{BatchOrchestrator, PassEvent, PassKind, PassReport, PacingPolicy};
pub use config::{Config, DnsBackend, LogFormat, LogLevel, Opt};
pub use domain::{canonical_root, clean_trailing, is_same_site, CanonicalRoot};
pub use error_handling::{DnsError, FetchError, UrlError};
pub use extract::{extract_urls, group_entries, scan_text, SourceUrl};
pub use models::{CrawlResult, CrawlStatus, RedirectResult, RedirectStop, RootEntry};
pub use run::{enrich, read_input, run_enrichment, selected_passes, RunReport};

//! Error handling and failure statistics.
//!
//! This module provides:
//! - Error types recorded on entries (`UrlError`, `DnsError`, `FetchError`)
//! - Startup errors (`InitializationError`)
//! - Categorization of transport errors
//! - Failure counters keyed by `FailureKind`
//!
//! None of the per-entry errors abort a pass: each is caught by the component that
//! produced it and recorded on the entry it belongs to.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, truncate_message};
pub use stats::FailureStats;
pub use types::{DnsError, FailureKind, FetchError, InitializationError, UrlError};

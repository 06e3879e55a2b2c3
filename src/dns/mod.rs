//! DNS resolution.
//!
//! This module provides async A-record lookups behind the `DnsLookup` capability:
//! - `SystemLookup`: `hickory-resolver` with the default nameservers
//! - `DohLookup`: a DNS-over-HTTPS JSON endpoint
//!
//! `NameResolver` wraps either one and is what the rest of the crate calls.

mod doh;
mod resolution;

// Re-export public API
pub use doh::DohLookup;
pub use resolution::{DnsLookup, NameResolver, SystemLookup};

//! Error type definitions.
//!
//! This module defines the error types recorded on entries during enrichment,
//! the startup errors, and the flat `FailureKind` list used for statistics.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// A string could not be turned into an absolute URL with a host.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("invalid URL '{input}': {reason}")]
pub struct UrlError {
    /// The offending input.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

impl UrlError {
    /// Builds the error from the input and a reason.
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of a failed A-record lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DnsError {
    /// The name exists (or the query succeeded) but there is no A record.
    #[error("no A record found")]
    NoRecord,

    /// Transport failure, timeout, or any other lookup failure.
    #[error("resolution failed: {0}")]
    ResolutionFailed(String),

    /// The input did not carry a resolvable host.
    #[error("{0}")]
    InvalidUrl(UrlError),
}

/// Failure of a redirect probe or page fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    /// The operation exceeded its configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The capability reported cross-origin access denial.
    #[error("blocked by cross-origin policy: {0}")]
    Blocked(String),

    /// Any other network or protocol error, including non-2xx responses.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Every failure or termination condition tracked during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureKind {
    /// Input that is not an absolute URL with a host.
    InvalidUrl,
    /// No A record for the host.
    NoRecord,
    /// DNS lookup failure or timeout.
    ResolutionFailed,
    /// Probe or fetch timeout.
    Timeout,
    /// Cross-origin denial.
    Blocked,
    /// Other network failure or non-2xx page.
    Transport,
    /// Redirect chain revisited a URL.
    LoopDetected,
    /// Redirect chain hit the hop limit.
    HopLimitExceeded,
    /// 3xx without a `Location` header.
    MissingLocation,
    /// 3xx with an unusable `Location` header.
    InvalidLocation,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FailureKind {
    /// Label used in the statistics table.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidUrl => "Invalid URL",
            FailureKind::NoRecord => "No A record",
            FailureKind::ResolutionFailed => "DNS resolution failed",
            FailureKind::Timeout => "Timeout",
            FailureKind::Blocked => "Blocked (cross-origin)",
            FailureKind::Transport => "Transport error",
            FailureKind::LoopDetected => "Redirect loop detected",
            FailureKind::HopLimitExceeded => "Redirect hop limit reached",
            FailureKind::MissingLocation => "Redirect without Location header",
            FailureKind::InvalidLocation => "Redirect with unparseable Location",
        }
    }
}

impl From<&DnsError> for FailureKind {
    fn from(e: &DnsError) -> Self {
        match e {
            DnsError::NoRecord => FailureKind::NoRecord,
            DnsError::ResolutionFailed(_) => FailureKind::ResolutionFailed,
            DnsError::InvalidUrl(_) => FailureKind::InvalidUrl,
        }
    }
}

impl From<&FetchError> for FailureKind {
    fn from(e: &FetchError) -> Self {
        match e {
            FetchError::Timeout => FailureKind::Timeout,
            FetchError::Blocked(_) => FailureKind::Blocked,
            FetchError::Transport(_) => FailureKind::Transport,
        }
    }
}

//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - HTTP clients (redirect probes and page fetches)
//! - DNS resolver (system or DNS-over-HTTPS)
//! - Logger
//! - The batch orchestrator wired from all of the above
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod resolver;

use std::sync::Arc;

use crate::batch::{BatchOrchestrator, PacingPolicy};
use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::fetch::{PageFetcher, RedirectResolver, ReqwestTransport};

// Re-export public API
pub use client::{init_client, init_redirect_client};
pub use logger::init_logger_with;
pub use resolver::{init_name_resolver, init_resolver};

/// Builds a `BatchOrchestrator` backed by real network capabilities.
///
/// # Errors
///
/// Returns `InitializationError` if an HTTP client or the DNS backend cannot be
/// created.
pub fn init_orchestrator(config: &Config) -> Result<BatchOrchestrator, InitializationError> {
    let page_client = init_client(config)?;
    let probe_client = init_redirect_client(config)?;
    let resolver = init_name_resolver(config, Arc::clone(&page_client))?;

    let transport = Arc::new(ReqwestTransport::new(probe_client, page_client));
    let redirects = RedirectResolver::new(
        transport.clone(),
        resolver.clone(),
        config.redirect_timeout,
        config.max_hops,
    );
    let fetcher = PageFetcher::new(transport, config.fetch_timeout);

    Ok(BatchOrchestrator::new(
        resolver,
        redirects,
        fetcher,
        PacingPolicy::from(config),
    ))
}

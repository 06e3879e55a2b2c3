//! DNS resolver initialization.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::config::{Config, DnsBackend, DNS_TIMEOUT_SECS};
use crate::dns::{DnsLookup, DohLookup, NameResolver, SystemLookup};
use crate::error_handling::InitializationError;

/// Initializes the hickory resolver for A-record lookups.
///
/// Uses the default nameserver configuration with short timeouts so slow or
/// unresponsive servers cannot stall a pass.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the signature stable should the
/// configuration start reading `/etc/resolv.conf`.
pub fn init_resolver() -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = 2;
    // No search-domain appending: every name we resolve is already absolute
    opts.ndots = 0;

    Ok(Arc::new(TokioAsyncResolver::tokio(
        ResolverConfig::default(),
        opts,
    )))
}

/// Builds the `NameResolver` selected by `config.dns_backend`.
///
/// `client` is only used by the DNS-over-HTTPS backend.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if the DoH endpoint is not a
/// valid URL.
pub fn init_name_resolver(
    config: &Config,
    client: Arc<reqwest::Client>,
) -> Result<NameResolver, InitializationError> {
    let lookup: Arc<dyn DnsLookup> = match config.dns_backend {
        DnsBackend::System => Arc::new(SystemLookup::new(init_resolver()?)),
        DnsBackend::Doh => {
            url::Url::parse(&config.doh_endpoint).map_err(|e| {
                InitializationError::DnsResolverError(format!(
                    "invalid DoH endpoint '{}': {e}",
                    config.doh_endpoint
                ))
            })?;
            Arc::new(DohLookup::new(
                client.as_ref().clone(),
                config.doh_endpoint.clone(),
            ))
        }
    };
    log::debug!("Using {:?} DNS backend", config.dns_backend);
    Ok(NameResolver::new(
        lookup,
        Duration::from_secs(DNS_TIMEOUT_SECS),
    ))
}

//! HTTP capabilities used by the redirect resolver and the page fetcher.
//!
//! The traits are the seams; `ReqwestTransport` is the production implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::LOCATION;
use url::Url;

use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::error_handling::{categorize_reqwest_error, FetchError};

/// Status and `Location` of a header-only response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw `Location` header, if present.
    pub location: Option<String>,
}

/// Status and (possibly truncated) body of a full response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body decoded lossily as UTF-8.
    pub body: String,
}

/// Header-only request that never follows redirects.
#[async_trait]
pub trait HeadProbe: Send + Sync {
    /// Sends a HEAD request to `url`, failing with `Timeout` after `timeout`.
    async fn head(&self, url: &Url, timeout: Duration) -> Result<ProbeResponse, FetchError>;
}

/// Full GET request returning the response body.
#[async_trait]
pub trait PageGet: Send + Sync {
    /// Sends a GET request to `url`, failing with `Timeout` after `timeout`.
    async fn get(&self, url: &Url, timeout: Duration) -> Result<PageResponse, FetchError>;
}

/// reqwest-backed implementation of both capabilities.
///
/// `probe_client` must have redirects disabled (see `init_redirect_client`);
/// `page_client` follows redirects on its own.
pub struct ReqwestTransport {
    probe_client: Arc<reqwest::Client>,
    page_client: Arc<reqwest::Client>,
}

impl ReqwestTransport {
    /// Pairs a no-redirect probe client with a redirect-following page client.
    pub fn new(probe_client: Arc<reqwest::Client>, page_client: Arc<reqwest::Client>) -> Self {
        Self {
            probe_client,
            page_client,
        }
    }
}

#[async_trait]
impl HeadProbe for ReqwestTransport {
    async fn head(&self, url: &Url, timeout: Duration) -> Result<ProbeResponse, FetchError> {
        let response = self
            .probe_client
            .head(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| categorize_reqwest_error(&e))?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(ProbeResponse {
            status: response.status().as_u16(),
            location,
        })
    }
}

#[async_trait]
impl PageGet for ReqwestTransport {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<PageResponse, FetchError> {
        let mut response = self
            .page_client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| categorize_reqwest_error(&e))?;

        let status = response.status().as_u16();
        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| categorize_reqwest_error(&e))?
        {
            let room = MAX_RESPONSE_BODY_SIZE - bytes.len();
            if chunk.len() >= room {
                bytes.extend_from_slice(&chunk[..room]);
                log::debug!(
                    "Body of {url} truncated at {} bytes",
                    MAX_RESPONSE_BODY_SIZE
                );
                break;
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(PageResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

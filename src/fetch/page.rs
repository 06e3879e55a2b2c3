//! Page content retrieval for link extraction.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::error_handling::FetchError;

use super::transport::PageGet;

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested (redirect destination when one was preferred).
    pub url: Url,
    /// HTTP status of the response.
    pub status: u16,
    /// Response body, truncated to the body size limit.
    pub content: String,
}

/// Fetches page content with a fixed timeout.
#[derive(Clone)]
pub struct PageFetcher {
    getter: Arc<dyn PageGet>,
    timeout: Duration,
}

impl PageFetcher {
    /// Creates a fetcher that bounds every GET by `timeout`.
    pub fn new(getter: Arc<dyn PageGet>, timeout: Duration) -> Self {
        Self { getter, timeout }
    }

    /// Returns the URL a fetch would use: `preferred_final_url` when present.
    pub fn target<'a>(root_url: &'a str, preferred_final_url: Option<&'a str>) -> &'a str {
        preferred_final_url.unwrap_or(root_url)
    }

    /// Fetches `preferred_final_url` if known, otherwise `root_url`.
    ///
    /// # Errors
    ///
    /// - `FetchError::Timeout` once the configured timeout elapses
    /// - `FetchError::Blocked` when the capability reports cross-origin denial
    /// - `FetchError::Transport` for any other failure, including non-2xx status
    pub async fn fetch(
        &self,
        root_url: &str,
        preferred_final_url: Option<&str>,
    ) -> Result<FetchedPage, FetchError> {
        let target = Self::target(root_url, preferred_final_url);
        let url = Url::parse(target)
            .map_err(|e| FetchError::Transport(format!("invalid URL '{target}': {e}")))?;

        log::debug!("Fetching {url}");
        let response = match tokio::time::timeout(self.timeout, self.getter.get(&url, self.timeout))
            .await
        {
            Ok(result) => result?,
            Err(_) => return Err(FetchError::Timeout),
        };

        if !(200..300).contains(&response.status) {
            return Err(FetchError::Transport(format!("HTTP {}", response.status)));
        }

        Ok(FetchedPage {
            url,
            status: response.status,
            content: response.body,
        })
    }
}

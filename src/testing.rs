//! Scripted capability fakes shared by unit tests.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::dns::DnsLookup;
use crate::error_handling::{DnsError, FetchError};
use crate::fetch::{HeadProbe, PageGet, PageResponse, ProbeResponse};

/// DNS fake answering from a fixed table; unknown hosts get `NoRecord`.
#[derive(Default)]
pub struct FakeDns {
    answers: HashMap<String, Result<Ipv4Addr, DnsError>>,
    pub calls: Mutex<Vec<String>>,
    pub delay: Option<Duration>,
}

impl FakeDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, host: &str, answer: Result<Ipv4Addr, DnsError>) -> Self {
        self.answers.insert(host.to_string(), answer);
        self
    }

    pub fn with_ip(self, host: &str, ip: [u8; 4]) -> Self {
        self.with(host, Ok(Ipv4Addr::from(ip)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsLookup for FakeDns {
    async fn lookup_a(&self, hostname: &str) -> Result<Ipv4Addr, DnsError> {
        self.calls.lock().unwrap().push(hostname.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answers
            .get(hostname)
            .cloned()
            .unwrap_or(Err(DnsError::NoRecord))
    }
}

/// HTTP fake keyed by exact URL string.
///
/// HEAD answers come from `probes`; GET answers from `pages`. Unknown URLs fail
/// with a transport error. URLs listed in `hang` never answer.
#[derive(Default)]
pub struct FakeHttp {
    probes: HashMap<String, Result<ProbeResponse, FetchError>>,
    pages: HashMap<String, Result<PageResponse, FetchError>>,
    hang: Vec<String>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirect(mut self, from: &str, status: u16, location: &str) -> Self {
        self.probes.insert(
            from.to_string(),
            Ok(ProbeResponse {
                status,
                location: Some(location.to_string()),
            }),
        );
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.probes.insert(
            url.to_string(),
            Ok(ProbeResponse {
                status,
                location: None,
            }),
        );
        self
    }

    pub fn probe_error(mut self, url: &str, error: FetchError) -> Self {
        self.probes.insert(url.to_string(), Err(error));
        self
    }

    pub fn page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            Ok(PageResponse {
                status,
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn page_error(mut self, url: &str, error: FetchError) -> Self {
        self.pages.insert(url.to_string(), Err(error));
        self
    }

    pub fn hang(mut self, url: &str) -> Self {
        self.hang.push(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    async fn maybe_hang(&self, url: &Url) {
        if self.hang.iter().any(|h| h == url.as_str()) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    }
}

#[async_trait]
impl HeadProbe for FakeHttp {
    async fn head(&self, url: &Url, _timeout: Duration) -> Result<ProbeResponse, FetchError> {
        self.requests.lock().unwrap().push(format!("HEAD {url}"));
        self.maybe_hang(url).await;
        self.probes
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Transport(format!("no route to {url}"))))
    }
}

#[async_trait]
impl PageGet for FakeHttp {
    async fn get(&self, url: &Url, _timeout: Duration) -> Result<PageResponse, FetchError> {
        self.requests.lock().unwrap().push(format!("GET {url}"));
        self.maybe_hang(url).await;
        self.pages
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Transport(format!("no route to {url}"))))
    }
}

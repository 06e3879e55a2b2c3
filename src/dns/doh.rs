//! DNS-over-HTTPS lookup using the JSON API served by public resolvers
//! (`https://dns.google/resolve?name=<host>&type=A`).

use std::net::Ipv4Addr;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error_handling::{categorize_reqwest_error, DnsError};

use super::resolution::DnsLookup;

/// DNS record type number for A records.
const RECORD_TYPE_A: u16 = 1;
/// DNS response codes that mean "the name has no data" rather than a failure.
const RCODE_NOERROR: u16 = 0;
const RCODE_NXDOMAIN: u16 = 3;

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Status")]
    status: u16,
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type")]
    record_type: u16,
    data: String,
}

/// `DnsLookup` over a DNS-over-HTTPS JSON endpoint.
pub struct DohLookup {
    client: reqwest::Client,
    endpoint: String,
}

impl DohLookup {
    /// Queries `endpoint` (a Google-style JSON DoH URL) with `client`.
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl DnsLookup for DohLookup {
    async fn lookup_a(&self, hostname: &str) -> Result<Ipv4Addr, DnsError> {
        let url = url::Url::parse_with_params(&self.endpoint, &[("name", hostname), ("type", "A")])
            .map_err(|e| DnsError::ResolutionFailed(format!("bad DoH endpoint: {e}")))?;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/dns-json")
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| DnsError::ResolutionFailed(categorize_reqwest_error(&e).to_string()))?;

        let body: DohResponse = response
            .json()
            .await
            .map_err(|e| DnsError::ResolutionFailed(format!("invalid DoH response: {e}")))?;

        match body.status {
            RCODE_NOERROR | RCODE_NXDOMAIN => {}
            rcode => {
                return Err(DnsError::ResolutionFailed(format!(
                    "DNS server returned rcode {rcode}"
                )))
            }
        }

        body.answer
            .iter()
            .filter(|a| a.record_type == RECORD_TYPE_A)
            .find_map(|a| a.data.parse::<Ipv4Addr>().ok())
            .ok_or(DnsError::NoRecord)
    }
}

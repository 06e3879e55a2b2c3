//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    CRAWL_DELAY, DEFAULT_DOH_ENDPOINT, DEFAULT_USER_AGENT, IP_RESOLUTION_DELAY,
    MAX_REDIRECT_HOPS, PAGE_FETCH_TIMEOUT, REDIRECT_CHECK_DELAY, REDIRECT_PROBE_TIMEOUT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Which DNS capability backs the name resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DnsBackend {
    /// hickory resolver using the system/default nameservers
    System,
    /// DNS-over-HTTPS JSON API (Google public DNS by default)
    Doh,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use domain_trace::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("notes.txt"),
///     crawl: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read free text from (`-` reads stdin)
    pub file: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Timeout for each redirect probe
    pub redirect_timeout: Duration,

    /// Timeout for each page fetch
    pub fetch_timeout: Duration,

    /// Maximum number of redirect hops followed per URL
    pub max_hops: usize,

    /// Delay between entries of IP resolution passes
    pub ip_delay: Duration,

    /// Delay between entries of the redirect-check pass
    pub redirect_delay: Duration,

    /// Delay between entries of the crawl pass
    pub crawl_delay: Duration,

    /// DNS capability used for A-record lookups
    pub dns_backend: DnsBackend,

    /// DNS-over-HTTPS endpoint (only used with `DnsBackend::Doh`)
    pub doh_endpoint: String,

    /// Run the IP resolution pass over root entries
    pub resolve_ips: bool,

    /// Run the redirect-check pass
    pub check_redirects: bool,

    /// Run the crawl pass (third-party link extraction)
    pub crawl: bool,

    /// Run the IP resolution pass over discovered third-party domains
    pub resolve_third_party_ips: bool,

    /// Print the enriched entries as JSON to stdout
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("-"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            redirect_timeout: REDIRECT_PROBE_TIMEOUT,
            fetch_timeout: PAGE_FETCH_TIMEOUT,
            max_hops: MAX_REDIRECT_HOPS,
            ip_delay: IP_RESOLUTION_DELAY,
            redirect_delay: REDIRECT_CHECK_DELAY,
            crawl_delay: CRAWL_DELAY,
            dns_backend: DnsBackend::System,
            doh_endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
            resolve_ips: true,
            check_redirects: true,
            crawl: false,
            resolve_third_party_ips: false,
            json: false,
        }
    }
}

/// Command-line options for the `domain_trace` binary.
#[derive(Debug, Parser)]
#[command(
    name = "domain_trace",
    about = "Group URLs found in text by root domain and enrich each root with its IP, redirect chain and third-party domains"
)]
pub struct Opt {
    /// File to read (use `-` for stdin)
    #[arg(value_parser, default_value = "-")]
    pub file: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// HTTP User-Agent header value
    #[arg(long, env = "DOMAIN_TRACE_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Redirect probe timeout in seconds
    #[arg(long, default_value_t = REDIRECT_PROBE_TIMEOUT.as_secs())]
    pub redirect_timeout_seconds: u64,

    /// Page fetch timeout in seconds
    #[arg(long, default_value_t = PAGE_FETCH_TIMEOUT.as_secs())]
    pub fetch_timeout_seconds: u64,

    /// Maximum redirect hops followed per URL
    #[arg(long, default_value_t = MAX_REDIRECT_HOPS)]
    pub max_hops: usize,

    /// Delay between IP lookups in milliseconds
    #[arg(long, default_value_t = millis(IP_RESOLUTION_DELAY))]
    pub ip_delay_ms: u64,

    /// Delay between redirect checks in milliseconds
    #[arg(long, default_value_t = millis(REDIRECT_CHECK_DELAY))]
    pub redirect_delay_ms: u64,

    /// Delay between page crawls in milliseconds
    #[arg(long, default_value_t = millis(CRAWL_DELAY))]
    pub crawl_delay_ms: u64,

    /// DNS backend: system|doh
    #[arg(long, value_enum, env = "DOMAIN_TRACE_DNS_BACKEND", default_value_t = DnsBackend::System)]
    pub dns_backend: DnsBackend,

    /// DNS-over-HTTPS endpoint
    #[arg(long, env = "DOMAIN_TRACE_DOH_ENDPOINT", default_value = DEFAULT_DOH_ENDPOINT)]
    pub doh_endpoint: String,

    /// Skip the IP resolution pass
    #[arg(long)]
    pub skip_ips: bool,

    /// Skip the redirect-check pass
    #[arg(long)]
    pub skip_redirects: bool,

    /// Crawl each root (or its redirect target) for third-party domains
    #[arg(long)]
    pub crawl: bool,

    /// Resolve IPs of discovered third-party domains (implies --crawl)
    #[arg(long)]
    pub third_party_ips: bool,

    /// Print enriched entries as JSON
    #[arg(long)]
    pub json: bool,
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            file: opt.file,
            log_level: opt.log_level,
            log_format: opt.log_format,
            user_agent: opt.user_agent,
            redirect_timeout: Duration::from_secs(opt.redirect_timeout_seconds),
            fetch_timeout: Duration::from_secs(opt.fetch_timeout_seconds),
            max_hops: opt.max_hops,
            ip_delay: Duration::from_millis(opt.ip_delay_ms),
            redirect_delay: Duration::from_millis(opt.redirect_delay_ms),
            crawl_delay: Duration::from_millis(opt.crawl_delay_ms),
            dns_backend: opt.dns_backend,
            doh_endpoint: opt.doh_endpoint,
            resolve_ips: !opt.skip_ips,
            check_redirects: !opt.skip_redirects,
            crawl: opt.crawl || opt.third_party_ips,
            resolve_third_party_ips: opt.third_party_ips,
            json: opt.json,
        }
    }
}

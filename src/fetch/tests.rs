//! Fetch module tests.

use super::*;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{MAX_REDIRECT_HOPS, MAX_RESPONSE_BODY_SIZE};
use crate::dns::NameResolver;
use crate::error_handling::{DnsError, FetchError};
use crate::models::RedirectStop;
use crate::testing::{FakeDns, FakeHttp};

fn redirect_resolver(http: FakeHttp, dns: FakeDns) -> (RedirectResolver, Arc<FakeHttp>) {
    let http = Arc::new(http);
    let resolver = NameResolver::new(Arc::new(dns), Duration::from_secs(3));
    let redirects = RedirectResolver::new(
        http.clone(),
        resolver,
        Duration::from_secs(10),
        MAX_REDIRECT_HOPS,
    );
    (redirects, http)
}

#[tokio::test]
async fn test_non_redirecting_url_has_no_result() {
    let (redirects, _) = redirect_resolver(FakeHttp::new().status("https://a.test/", 200), FakeDns::new());
    let check = redirects.check("https://a.test/").await;
    assert_eq!(check.redirect, None);
    assert_eq!(check.stop, RedirectStop::Final);
}

#[tokio::test]
async fn test_single_302_yields_two_hop_chain() {
    let http = FakeHttp::new()
        .redirect("https://a.test/", 302, "https://b.test/")
        .status("https://b.test/", 200);
    let dns = FakeDns::new().with_ip("b.test", [198, 51, 100, 2]);
    let (redirects, _) = redirect_resolver(http, dns);

    let check = redirects.check("https://a.test/").await;
    let result = check.redirect.expect("redirect detected");
    assert_eq!(result.chain, vec!["https://a.test/", "https://b.test/"]);
    assert_eq!(result.final_url(), "https://b.test/");
    assert_eq!(result.status_code, Some(200));
    assert_eq!(result.final_ip, Some(Ipv4Addr::new(198, 51, 100, 2)));
    assert_eq!(check.stop, RedirectStop::Final);
}

#[tokio::test]
async fn test_relative_location_is_resolved_against_current_url() {
    let http = FakeHttp::new()
        .redirect("https://a.test/old/page", 301, "../new/page")
        .status("https://a.test/new/page", 200);
    let (redirects, _) = redirect_resolver(http, FakeDns::new().with_ip("a.test", [1, 1, 1, 1]));

    let result = redirects.check("https://a.test/old/page").await.redirect.unwrap();
    assert_eq!(result.chain, vec!["https://a.test/old/page", "https://a.test/new/page"]);
}

#[tokio::test]
async fn test_loop_terminates_with_chain_before_repeat() {
    let http = FakeHttp::new()
        .redirect("https://a.test/", 302, "https://b.test/")
        .redirect("https://b.test/", 302, "https://c.test/")
        .redirect("https://c.test/", 302, "https://a.test/");
    let (redirects, http) = redirect_resolver(http, FakeDns::new());

    let check = redirects.check("https://a.test/").await;
    assert_eq!(check.stop, RedirectStop::LoopDetected);
    let result = check.redirect.unwrap();
    assert_eq!(
        result.chain,
        vec!["https://a.test/", "https://b.test/", "https://c.test/"]
    );
    assert_eq!(http.requests().len(), 3);
    // The final host had no A record in the fake; detection still stands
    assert_eq!(result.final_ip_error, Some(DnsError::NoRecord));
}

#[tokio::test]
async fn test_self_redirect_is_not_a_redirect() {
    let http = FakeHttp::new().redirect("https://a.test/", 301, "https://a.test/");
    let (redirects, _) = redirect_resolver(http, FakeDns::new());

    let check = redirects.check("https://a.test/").await;
    assert_eq!(check.redirect, None);
    assert_eq!(check.stop, RedirectStop::LoopDetected);
}

#[tokio::test]
async fn test_fifteen_hop_chain_stops_at_hop_limit() {
    let mut http = FakeHttp::new();
    for i in 0..15 {
        http = http.redirect(
            &format!("https://hop{i}.test/"),
            302,
            &format!("https://hop{}.test/", i + 1),
        );
    }
    http = http.status("https://hop15.test/", 200);
    let (redirects, http) = redirect_resolver(http, FakeDns::new());

    let check = redirects.check("https://hop0.test/").await;
    assert_eq!(check.stop, RedirectStop::HopLimitExceeded);
    let result = check.redirect.expect("partial chain is still a redirect");
    assert_eq!(result.chain.len(), MAX_REDIRECT_HOPS + 1);
    assert_eq!(result.hop_count(), MAX_REDIRECT_HOPS);
    assert_eq!(result.final_url(), "https://hop10.test/");
    assert_eq!(result.status_code, Some(302));
    assert_eq!(http.requests().len(), MAX_REDIRECT_HOPS + 1);
}

#[tokio::test]
async fn test_missing_location_is_surfaced_as_diagnostic() {
    let http = FakeHttp::new().status("https://a.test/", 302);
    let (redirects, _) = redirect_resolver(http, FakeDns::new());

    let check = redirects.check("https://a.test/").await;
    assert_eq!(check.redirect, None);
    assert_eq!(check.stop, RedirectStop::MissingLocation);
}

#[tokio::test]
async fn test_missing_location_mid_chain_keeps_chain() {
    let http = FakeHttp::new()
        .redirect("https://a.test/", 301, "https://b.test/")
        .status("https://b.test/", 307);
    let (redirects, _) = redirect_resolver(http, FakeDns::new());

    let check = redirects.check("https://a.test/").await;
    assert_eq!(check.stop, RedirectStop::MissingLocation);
    assert_eq!(check.redirect.unwrap().final_url(), "https://b.test/");
}

#[tokio::test]
async fn test_non_http_location_is_invalid() {
    let http = FakeHttp::new().redirect("https://a.test/", 302, "javascript:alert(1)");
    let (redirects, _) = redirect_resolver(http, FakeDns::new());

    let check = redirects.check("https://a.test/").await;
    assert_eq!(check.redirect, None);
    assert_eq!(check.stop, RedirectStop::InvalidLocation);
}

#[tokio::test]
async fn test_transport_failure_mid_chain_keeps_last_probed_hop() {
    let http = FakeHttp::new()
        .redirect("https://a.test/", 302, "https://b.test/")
        .probe_error("https://b.test/", FetchError::Blocked("cross-origin".into()));
    let (redirects, _) = redirect_resolver(http, FakeDns::new().with_ip("b.test", [2, 2, 2, 2]));

    let check = redirects.check("https://a.test/").await;
    assert_eq!(
        check.stop,
        RedirectStop::ProbeFailed(FetchError::Blocked("cross-origin".into()))
    );
    let result = check.redirect.unwrap();
    assert_eq!(result.final_url(), "https://b.test/");
    assert_eq!(result.status_code, Some(302));
}

#[tokio::test]
async fn test_transport_failure_on_first_probe_is_no_redirect() {
    let (redirects, _) = redirect_resolver(FakeHttp::new(), FakeDns::new());
    let check = redirects.check("https://unreachable.test/").await;
    assert_eq!(check.redirect, None);
    assert!(matches!(
        check.stop,
        RedirectStop::ProbeFailed(FetchError::Transport(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_hanging_probe_times_out() {
    let http = FakeHttp::new().hang("https://slow.test/");
    let (redirects, _) = redirect_resolver(http, FakeDns::new());

    let check = redirects.check("https://slow.test/").await;
    assert_eq!(check.redirect, None);
    assert_eq!(check.stop, RedirectStop::ProbeFailed(FetchError::Timeout));
}

#[tokio::test]
async fn test_invalid_start_url() {
    let (redirects, http) = redirect_resolver(FakeHttp::new(), FakeDns::new());
    let check = redirects.check("no scheme here").await;
    assert_eq!(check.redirect, None);
    assert!(http.requests().is_empty());
}

fn page_fetcher(http: FakeHttp) -> (PageFetcher, Arc<FakeHttp>) {
    let http = Arc::new(http);
    (PageFetcher::new(http.clone(), Duration::from_secs(15)), http)
}

#[tokio::test]
async fn test_fetch_prefers_final_url() {
    let (fetcher, http) = page_fetcher(FakeHttp::new().page("https://b.test/", 200, "<html></html>"));
    let page = fetcher
        .fetch("https://a.test/", Some("https://b.test/"))
        .await
        .unwrap();
    assert_eq!(page.url.as_str(), "https://b.test/");
    assert_eq!(http.requests(), vec!["GET https://b.test/".to_string()]);
}

#[tokio::test]
async fn test_fetch_falls_back_to_root() {
    let (fetcher, _) = page_fetcher(FakeHttp::new().page("https://a.test/", 200, "hello"));
    let page = fetcher.fetch("https://a.test/", None).await.unwrap();
    assert_eq!(page.content, "hello");
    assert_eq!(page.status, 200);
}

#[tokio::test]
async fn test_fetch_non_2xx_is_transport() {
    let (fetcher, _) = page_fetcher(FakeHttp::new().page("https://a.test/", 404, "missing"));
    assert_eq!(
        fetcher.fetch("https://a.test/", None).await.unwrap_err(),
        FetchError::Transport("HTTP 404".into())
    );
}

#[tokio::test]
async fn test_fetch_passes_blocked_through() {
    let (fetcher, _) = page_fetcher(
        FakeHttp::new().page_error("https://a.test/", FetchError::Blocked("denied".into())),
    );
    assert_eq!(
        fetcher.fetch("https://a.test/", None).await.unwrap_err(),
        FetchError::Blocked("denied".into())
    );
}

#[tokio::test(start_paused = true)]
async fn test_fetch_timeout_yields_timeout() {
    let (fetcher, _) = page_fetcher(FakeHttp::new().hang("https://slow.test/"));
    let started = tokio::time::Instant::now();
    let err = fetcher.fetch("https://slow.test/", None).await.unwrap_err();
    assert_eq!(err, FetchError::Timeout);
    assert!(started.elapsed() >= Duration::from_secs(15));
}

#[tokio::test]
async fn test_reqwest_probe_does_not_follow_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/next"))
        .mount(&server)
        .await;

    let probe_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let transport = ReqwestTransport::new(Arc::new(probe_client), Arc::new(reqwest::Client::new()));
    let url = url::Url::parse(&format!("{}/start", server.uri())).unwrap();

    let response = transport.head(&url, Duration::from_secs(5)).await.unwrap();
    assert_eq!(response.status, 301);
    assert_eq!(response.location.as_deref(), Some("/next"));
}

#[tokio::test]
async fn test_reqwest_redirect_chain_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/b"))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let probe_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let transport = Arc::new(ReqwestTransport::new(
        Arc::new(probe_client),
        Arc::new(reqwest::Client::new()),
    ));
    let resolver = NameResolver::new(Arc::new(FakeDns::new()), Duration::from_secs(3));
    let redirects = RedirectResolver::new(transport, resolver, Duration::from_secs(5), 10);

    let start = format!("{}/a", server.uri());
    let result = redirects.check(&start).await.redirect.unwrap();
    assert_eq!(result.chain, vec![start.clone(), format!("{}/b", server.uri())]);
    // Mock server listens on 127.0.0.1, an IPv4 literal
    assert_eq!(result.final_ip, Some(Ipv4Addr::LOCALHOST));
}

#[tokio::test]
async fn test_reqwest_get_truncates_large_bodies() {
    let server = MockServer::start().await;
    let big = "a".repeat(MAX_RESPONSE_BODY_SIZE + 1024);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(big))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(
        Arc::new(reqwest::Client::new()),
        Arc::new(reqwest::Client::new()),
    );
    let url = url::Url::parse(&server.uri()).unwrap();
    let response = transport.get(&url, Duration::from_secs(5)).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body.len(), MAX_RESPONSE_BODY_SIZE);
}

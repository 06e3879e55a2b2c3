//! Third-party root extraction from fetched pages.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::domain::{clean_trailing, is_same_site, CanonicalRoot};

/// Selector and the attribute holding the URL for every link-bearing element.
const LINK_ATTRIBUTES: &[(&str, &str)] = &[
    ("a[href]", "href"),
    ("area[href]", "href"),
    ("link[href]", "href"),
    ("base[href]", "href"),
    ("script[src]", "src"),
    ("img[src]", "src"),
    ("iframe[src]", "src"),
    ("frame[src]", "src"),
    ("embed[src]", "src"),
    ("source[src]", "src"),
    ("track[src]", "src"),
    ("video[src]", "src"),
    ("audio[src]", "src"),
    ("input[src]", "src"),
    ("object[data]", "data"),
    ("form[action]", "action"),
];

const BASE_SELECTOR_STR: &str = "base[href]";
const STYLE_ELEMENT_SELECTOR_STR: &str = "style";
const STYLE_ATTRIBUTE_SELECTOR_STR: &str = "[style]";

// Regex patterns
const CSS_URL_PATTERN: &str = r#"(?i)url\(\s*['"]?([^'")\s]+)['"]?\s*\)"#;
const BARE_URL_PATTERN: &str = r#"(?i)https?://[^\s<>"'{}|\\^`\[\]()]+"#;

static LINK_SELECTORS: LazyLock<Vec<(Selector, &'static str)>> = LazyLock::new(|| {
    LINK_ATTRIBUTES
        .iter()
        .map(|(selector, attr)| {
            let selector = Selector::parse(selector)
                .expect("Failed to parse link selector - this is a bug");
            (selector, *attr)
        })
        .collect()
});

static BASE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(BASE_SELECTOR_STR).expect("Failed to parse base selector - this is a bug")
});

static STYLE_ELEMENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(STYLE_ELEMENT_SELECTOR_STR)
        .expect("Failed to parse style selector - this is a bug")
});

static STYLE_ATTRIBUTE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(STYLE_ATTRIBUTE_SELECTOR_STR)
        .expect("Failed to parse style attribute selector - this is a bug")
});

static CSS_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CSS_URL_PATTERN).expect("CSS url() pattern is a valid regex"));

static BARE_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BARE_URL_PATTERN).expect("bare URL pattern is a valid regex"));

/// Extracts the distinct third-party roots referenced by `content`.
///
/// Relative references are resolved against `fetched_url`, or against the
/// document's `<base href>` when one is present. Non-HTTP(S) references
/// (`mailto:`, `javascript:`, `data:`...) are discarded, as is every root that
/// is same-site with `fetched_url`'s host.
///
/// # Arguments
///
/// * `content` - Page body, usually HTML (any text works for the bare-URL scan)
/// * `fetched_url` - URL the content was actually fetched from
///
/// # Returns
///
/// Third-party roots without duplicates, in discovery order.
pub fn extract_third_party(content: &str, fetched_url: &Url) -> Vec<CanonicalRoot> {
    let document = Html::parse_document(content);

    let base = document
        .select(&BASE_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| fetched_url.join(href.trim()).ok())
        .unwrap_or_else(|| fetched_url.clone());

    let mut collector = RootCollector::new(fetched_url.host_str().unwrap_or_default());

    for (selector, attr) in LINK_SELECTORS.iter() {
        for element in document.select(selector) {
            if let Some(value) = element.value().attr(attr) {
                collector.offer(&base, value);
            }
        }
    }

    for element in document.select(&STYLE_ELEMENT_SELECTOR) {
        let css: String = element.text().collect();
        collector.offer_css(&base, &css);
    }
    for element in document.select(&STYLE_ATTRIBUTE_SELECTOR) {
        if let Some(css) = element.value().attr("style") {
            collector.offer_css(&base, css);
        }
    }

    for found in BARE_URL_REGEX.find_iter(content) {
        collector.offer(&base, clean_trailing(found.as_str()));
    }

    log::debug!(
        "Extracted {} third-party root(s) from {}",
        collector.roots.len(),
        fetched_url
    );
    collector.roots
}

/// Accumulates third-party roots, dropping duplicates and same-site hosts.
struct RootCollector<'a> {
    site_host: &'a str,
    seen: HashSet<CanonicalRoot>,
    roots: Vec<CanonicalRoot>,
}

impl<'a> RootCollector<'a> {
    fn new(site_host: &'a str) -> Self {
        Self {
            site_host,
            seen: HashSet::new(),
            roots: Vec::new(),
        }
    }

    fn offer(&mut self, base: &Url, reference: &str) {
        let reference = reference.trim();
        if reference.is_empty() || reference.starts_with('#') {
            return;
        }
        let Ok(resolved) = base.join(reference) else {
            return;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            return;
        }
        let Ok(root) = CanonicalRoot::from_url(&resolved) else {
            return;
        };
        if is_same_site(root.host(), self.site_host) {
            return;
        }
        if self.seen.insert(root.clone()) {
            self.roots.push(root);
        }
    }

    fn offer_css(&mut self, base: &Url, css: &str) {
        for captures in CSS_URL_REGEX.captures_iter(css) {
            if let Some(reference) = captures.get(1) {
                self.offer(base, reference.as_str());
            }
        }
    }
}

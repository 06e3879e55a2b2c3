//! Root-domain canonicalization.
//!
//! A *canonical root* is the `scheme://host` identity of a URL. It is the key used
//! to group URLs found in free text and to deduplicate third-party domains.
//!
//! Key functions:
//! - `clean_trailing()` - Strips sentence punctuation glued onto a URL
//! - `canonical_root()` - Parses a URL and returns its root identity
//! - `is_same_site()` - Equal hosts or a subdomain relationship

use std::fmt;

use serde::{Serialize, Serializer};
use url::Url;

use crate::error_handling::UrlError;

/// Characters that end a sentence but almost never end a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

/// The scheme + host identity of a URL.
///
/// The host is stored lowercased; port, path, query and fragment are dropped, so
/// `https://Example.com:443/a` and `https://example.com/b` share a root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalRoot {
    scheme: String,
    host: String,
}

impl CanonicalRoot {
    /// URL scheme, e.g. `https`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Lowercased host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// True for `http` and `https` roots.
    pub fn is_web(&self) -> bool {
        matches!(self.scheme.as_str(), "http" | "https")
    }

    /// The root as an absolute URL (`https://example.com/`).
    pub fn to_url(&self) -> Result<Url, UrlError> {
        let text = self.to_string();
        Url::parse(&text).map_err(|e| UrlError::new(text, e.to_string()))
    }

    /// Builds the root of an already parsed URL.
    pub fn from_url(url: &Url) -> Result<Self, UrlError> {
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| UrlError::new(url.as_str(), "URL has no host"))?;
        Ok(Self {
            scheme: url.scheme().to_string(),
            host: host.to_ascii_lowercase(),
        })
    }
}

impl fmt::Display for CanonicalRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)
    }
}

impl Serialize for CanonicalRoot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Strips one trailing sentence punctuation character (`. , ; : ! ? )`) from a URL
/// found in prose.
///
/// Only the last character is removed, so `https://a.test/x).` becomes
/// `https://a.test/x)`.
pub fn clean_trailing(url: &str) -> &str {
    url.strip_suffix(TRAILING_PUNCTUATION).unwrap_or(url)
}

/// Cleans and parses a raw URL string into its absolute form.
///
/// # Errors
///
/// Returns `UrlError` if the cleaned string is not a valid absolute URL or has no
/// host.
pub fn clean_url(raw: &str) -> Result<Url, UrlError> {
    let cleaned = clean_trailing(raw.trim());
    let parsed = Url::parse(cleaned).map_err(|e| UrlError::new(raw, e.to_string()))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::new(raw, "URL has no host"));
    }
    Ok(parsed)
}

/// Returns the canonical root (`scheme://host`) of a raw URL string.
///
/// Trailing sentence punctuation is removed before parsing, so
/// `https://example.com/page.` and `https://example.com/page` share a root.
///
/// # Errors
///
/// Returns `UrlError` if the input does not parse as an absolute URL with a host.
/// Callers must treat such input as non-extractable.
pub fn canonical_root(raw: &str) -> Result<CanonicalRoot, UrlError> {
    let parsed = clean_url(raw)?;
    CanonicalRoot::from_url(&parsed)
}

/// Same-site test used to drop first-party links.
///
/// Two hosts are same-site when they are equal (ignoring case) or when one is a
/// strict subdomain of the other.
pub fn is_same_site(a: &str, b: &str) -> bool {
    let a = a.trim_end_matches('.').to_ascii_lowercase();
    let b = b.trim_end_matches('.').to_ascii_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || is_subdomain_of(&a, &b) || is_subdomain_of(&b, &a)
}

fn is_subdomain_of(candidate: &str, parent: &str) -> bool {
    candidate.len() > parent.len()
        && candidate.ends_with(parent)
        && candidate.as_bytes()[candidate.len() - parent.len() - 1] == b'.'
}

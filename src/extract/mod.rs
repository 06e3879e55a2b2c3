//! Free-text URL scanning and root grouping.
//!
//! This is the producer of the working set: it finds URL-shaped substrings in
//! arbitrary text, canonicalizes them, and folds them into one `RootEntry` per
//! distinct root.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use crate::domain::{canonical_root, clean_trailing, CanonicalRoot};
use crate::models::RootEntry;

const URL_PATTERN: &str = r#"(?i)https?://[^\s<>"{}|\\^`\[\]]+"#;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(URL_PATTERN).expect("URL pattern is a valid regex"));

/// A URL found in free text together with its canonical root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    /// The matched string with trailing punctuation removed.
    pub original: String,
    /// Canonical root of `original`.
    pub root: CanonicalRoot,
}

/// Returns every URL occurrence in `text`, in order of appearance.
///
/// Matches that do not canonicalize are skipped with a warning; they never enter
/// the working set.
pub fn scan_text(text: &str) -> Vec<SourceUrl> {
    URL_REGEX
        .find_iter(text)
        .filter_map(|m| {
            let cleaned = clean_trailing(m.as_str());
            match canonical_root(cleaned) {
                Ok(root) => Some(SourceUrl {
                    original: cleaned.to_string(),
                    root,
                }),
                Err(e) => {
                    warn!("Skipping {e}");
                    None
                }
            }
        })
        .collect()
}

/// Returns one `SourceUrl` per distinct root, keeping the first-seen original.
pub fn extract_urls(text: &str) -> Vec<SourceUrl> {
    let mut seen = HashSet::new();
    scan_text(text)
        .into_iter()
        .filter(|source| seen.insert(source.root.clone()))
        .collect()
}

/// Folds URL occurrences into exactly one `RootEntry` per distinct root.
///
/// Entries are ordered by the first appearance of their root; each entry lists
/// the distinct original strings in first-seen order.
pub fn group_entries(sources: impl IntoIterator<Item = SourceUrl>) -> Vec<RootEntry> {
    let mut index: HashMap<CanonicalRoot, usize> = HashMap::new();
    let mut entries: Vec<RootEntry> = Vec::new();

    for SourceUrl { original, root } in sources {
        match index.get(&root) {
            Some(&i) => {
                let entry = &mut entries[i];
                if !entry.originals.contains(&original) {
                    entry.originals.push(original);
                }
            }
            None => {
                index.insert(root.clone(), entries.len());
                entries.push(RootEntry::new(root, original));
            }
        }
    }

    debug!("Grouped URLs into {} root entries", entries.len());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_text_finds_urls_in_prose() {
        let text = "See https://example.com/page. Also (http://b.test/x) and <https://c.test>";
        let found: Vec<String> = scan_text(text).into_iter().map(|s| s.original).collect();
        assert_eq!(
            found,
            vec!["https://example.com/page", "http://b.test/x", "https://c.test"]
        );
    }

    #[test]
    fn test_scan_text_stops_at_quotes() {
        let text = r#"<a href="https://a.test/x">link</a>"#;
        let found = scan_text(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].original, "https://a.test/x");
    }

    #[test]
    fn test_scan_text_keeps_very_long_urls() {
        let long = format!("https://tracker.test/{}", "a".repeat(2100));
        let text = format!("see {long} and https://b.test/x");
        let entries = group_entries(scan_text(&text));
        let roots: Vec<String> = entries.iter().map(|e| e.root().to_string()).collect();
        assert_eq!(roots, vec!["https://tracker.test", "https://b.test"]);
        assert_eq!(entries[0].originals, vec![long]);
    }

    #[test]
    fn test_scan_text_strips_only_last_punctuation() {
        let found = scan_text("link (https://a.test/x).");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].original, "https://a.test/x)");
        assert_eq!(found[0].root.to_string(), "https://a.test");
    }

    #[test]
    fn test_scan_text_skips_hostless_matches() {
        assert!(scan_text("broken https:// link").is_empty());
    }

    #[test]
    fn test_extract_urls_dedups_by_root_first_seen() {
        let text = "https://a.test/one https://b.test https://A.test/two";
        let found = extract_urls(text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].original, "https://a.test/one");
        assert_eq!(found[0].root.to_string(), "https://a.test");
        assert_eq!(found[1].root.to_string(), "https://b.test");
    }

    #[test]
    fn test_group_entries_one_per_root_in_first_seen_order() {
        let text = "https://b.test/1 https://a.test/ https://b.test/2 https://b.test/1 https://c.test";
        let entries = group_entries(scan_text(text));
        let roots: Vec<String> = entries.iter().map(|e| e.root().to_string()).collect();
        assert_eq!(roots, vec!["https://b.test", "https://a.test", "https://c.test"]);
        assert_eq!(entries[0].originals, vec!["https://b.test/1", "https://b.test/2"]);
    }

    #[test]
    fn test_group_entries_port_variants_share_root() {
        let entries = group_entries(scan_text("https://a.test:443/x https://a.test/y"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].originals.len(), 2);
    }

    #[test]
    fn test_group_entries_empty_input() {
        assert!(group_entries(scan_text("no links here")).is_empty());
    }
}

//! HTML link extraction.
//!
//! This module finds the third-party domains a page references:
//! - Link-bearing attributes (`href`, `src`, `data`, `action`)
//! - CSS `url(...)` references in `<style>` elements and `style` attributes
//! - Bare absolute URLs anywhere in the content (inline scripts, comments, JSON)
//!
//! All structured parsing is done using CSS selectors via the `scraper` crate.

mod links;

// Re-export public API
pub use links::extract_third_party;

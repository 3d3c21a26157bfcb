//! Shared test utilities for the chronicle test suite.
//!
//! Provides item builders, lookup helpers that panic with the available
//! choices on a miss, and bulk extractors for asserting on order.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let items = vec![
//!     post("2024-01-15", "hello").with("tags", "Rust"),
//!     draft(post("2024-01-16", "wip")),
//!     page_item("about"),
//! ];
//! let refs: Vec<&ContentItem> = items.iter().collect();
//! let groups = group(&refs, &Extractor::field("tags"), None).groups;
//!
//! assert_eq!(urls(&find_group(&groups, "rust").items), vec!["/blog/hello/"]);
//! ```

use chrono::NaiveDate;

use crate::content::{ContentSet, ContentSource};
use crate::types::{ContentItem, Page, TaxonomyGroup, keys};

// =========================================================================
// Item builders
// =========================================================================

/// A blog post at `blog/{slug}.md`, served at `/blog/{slug}/`.
///
/// `date` is `YYYY-MM-DD`; panics otherwise.
pub fn post(date: &str, slug: &str) -> ContentItem {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("bad test date '{date}': {e}"));
    ContentItem::new(format!("blog/{slug}.md"), format!("/blog/{slug}/"), date)
}

/// A top-level page at `{name}.md` with `page: true`.
pub fn page_item(name: &str) -> ContentItem {
    let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    ContentItem::new(format!("{name}.md"), format!("/{name}/"), date).with("page", true)
}

/// Mark an item as a draft.
pub fn draft(item: ContentItem) -> ContentItem {
    item.with(keys::DRAFT, true)
}

// =========================================================================
// Lookups: panic with the available choices on a miss
// =========================================================================

/// Find a group by slug. Panics if not found.
pub fn find_group<'g, 'a>(groups: &'g [TaxonomyGroup<'a>], slug: &str) -> &'g TaxonomyGroup<'a> {
    groups.iter().find(|g| g.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = groups.iter().map(|g| g.slug.as_str()).collect();
        panic!("group '{slug}' not found. Available: {slugs:?}")
    })
}

/// Find a host item by URL. Panics if not found.
pub fn find_item<'a>(set: &'a ContentSet, url: &str) -> &'a ContentItem {
    set.items().iter().find(|i| i.url == url).unwrap_or_else(|| {
        let urls: Vec<&str> = set.items().iter().map(|i| i.url.as_str()).collect();
        panic!("item '{url}' not found. Available: {urls:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Item URLs in order.
pub fn urls<'a>(items: &[&'a ContentItem]) -> Vec<&'a str> {
    items.iter().map(|i| i.url.as_str()).collect()
}

/// Page URLs in order.
pub fn page_urls<'p>(pages: &'p [Page<'_>]) -> Vec<&'p str> {
    pages.iter().map(|p| p.url.as_str()).collect()
}

/// Number of items on each page, in order.
pub fn page_sizes(pages: &[Page<'_>]) -> Vec<usize> {
    pages.iter().map(|p| p.items.len()).collect()
}

//! Cross-collection index and breadcrumb trails.
//!
//! Breadcrumbs follow `blog.parent` links upwards from a target URL:
//!
//! ```text
//! blog/hello/  ──parent──▶  blog/2024/01  ──parent──▶  blog/2024  ──parent──▶  blog
//! ```
//!
//! The walk runs over a pool built by [`flatten`]: every collection merged,
//! one entry per URL (first occurrence wins), sorted by URL. A URL that is
//! missing from the pool ends the trail, and so does a URL already on the
//! trail, so a malformed parent chain that loops back on itself terminates.

use crate::types::{ContentItem, Page, keys};
use serde_json::Value;
use std::collections::HashSet;

/// Anything with a URL and an optional parent URL.
pub trait Addressable {
    fn url(&self) -> Option<&str>;

    fn parent_url(&self) -> Option<&str>;
}

impl Addressable for ContentItem {
    fn url(&self) -> Option<&str> {
        Some(&self.url)
    }

    fn parent_url(&self) -> Option<&str> {
        self.blog_parent()
    }
}

impl Addressable for Page<'_> {
    fn url(&self) -> Option<&str> {
        Some(&self.url)
    }

    fn parent_url(&self) -> Option<&str> {
        self.blog_parent()
    }
}

/// Serialized items and pages, as templates see them.
///
/// The parent is read from `data.blog.parent` (items) or `blog.parent` (pages).
impl Addressable for Value {
    fn url(&self) -> Option<&str> {
        self.get("url")?.as_str()
    }

    fn parent_url(&self) -> Option<&str> {
        let blog = self
            .get("data")
            .and_then(|data| data.get(keys::BLOG))
            .or_else(|| self.get(keys::BLOG))?;
        blog.get(keys::PARENT)?.as_str()
    }
}

/// Merge `lists` one level deep, keep the first entry per URL, sort by URL.
///
/// Entries without a URL are dropped.
pub fn flatten<'a, T: Addressable>(lists: &[&'a [T]]) -> Vec<&'a T> {
    let mut seen: HashSet<&'a str> = HashSet::new();
    let mut pool: Vec<&'a T> = Vec::new();
    for &list in lists {
        for entry in list {
            if let Some(url) = entry.url() {
                if seen.insert(url) {
                    pool.push(entry);
                }
            }
        }
    }
    pool.sort_by(|a, b| a.url().cmp(&b.url()));
    pool
}

/// Trail of URLs from `target` up to the root, following parent links.
///
/// Returns an empty trail when `target` is not in any collection.
pub fn breadcrumbs<T: Addressable>(collections: &[&[T]], target: &str) -> Vec<String> {
    let pool = flatten(collections);
    walk(&pool, target)
}

/// Follow parent links through a URL-sorted pool.
pub fn walk<T: Addressable>(pool: &[&T], target: &str) -> Vec<String> {
    let mut trail: Vec<String> = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut search_for = target;

    while !search_for.is_empty() {
        let Ok(pos) = pool.binary_search_by(|entry| entry.url().cmp(&Some(search_for))) else {
            break;
        };
        let entry = pool[pos];
        let Some(url) = entry.url() else { break };
        if !visited.insert(url) {
            break;
        }
        trail.push(url.to_string());
        search_for = entry.parent_url().unwrap_or("");
    }
    trail
}

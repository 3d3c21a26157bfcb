//! Fixed-size pagination with navigation slugs.
//!
//! A sequence of 23 items under slug `tag/rust` with 10 items per page:
//!
//! ```text
//! pagenumber  slug               url                     items
//! 0           tag/rust           blog/tag/rust           0..10
//! 1           tag/rust/page-2    blog/tag/rust/page-2    10..20
//! 2           tag/rust/page-3    blog/tag/rust/page-3    20..23
//! ```
//!
//! Every page carries `count = 23`, `total = 3`, and `slugs.first`/`slugs.last`
//! pointing at the first and last slug. `slugs.previous` is `None` on the
//! first page and `slugs.next` is `None` on the last. An empty sequence
//! yields no pages.

use crate::types::{ContentItem, Metadata, Page, PageSlugs, RESERVED_PAGE_KEYS, TaxonomyGroup};

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Everything about a sequence except its items.
#[derive(Debug, Clone, Default)]
pub struct PageSpec<'a> {
    pub slug: String,
    /// URL prefix, joined to each page slug with `/`.
    pub prefix: String,
    pub title: String,
    /// `0` means [`DEFAULT_ITEMS_PER_PAGE`].
    pub page_size: usize,
    pub meta: Metadata,
    pub children: Vec<&'a ContentItem>,
}

impl<'a> PageSpec<'a> {
    pub fn new(slug: impl Into<String>, prefix: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            prefix: prefix.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Join a URL prefix and a slug with exactly one `/`.
pub fn join_url(prefix: &str, slug: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let slug = slug.trim_start_matches('/');
    match (prefix.is_empty(), slug.is_empty()) {
        (true, _) => slug.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}/{slug}"),
    }
}

/// Slug of page `index` (0-based) in a sequence rooted at `slug`.
pub fn page_slug(slug: &str, index: usize) -> String {
    if index == 0 {
        slug.to_string()
    } else {
        format!("{slug}/page-{}", index + 1)
    }
}

/// Split `items` into pages described by `spec`.
pub fn paginate<'a>(items: &[&'a ContentItem], spec: PageSpec<'a>) -> Vec<Page<'a>> {
    let page_size = if spec.page_size == 0 {
        DEFAULT_ITEMS_PER_PAGE
    } else {
        spec.page_size
    };
    let chunks: Vec<&[&'a ContentItem]> = items.chunks(page_size).collect();
    let all: Vec<String> = (0..chunks.len()).map(|i| page_slug(&spec.slug, i)).collect();

    let mut meta = spec.meta;
    meta.retain(|key, _| !RESERVED_PAGE_KEYS.contains(&key.as_str()));

    let mut children = Some(spec.children);
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| Page {
            title: spec.title.clone(),
            slug: all[i].clone(),
            url: join_url(&spec.prefix, &all[i]),
            pagenumber: i,
            count: items.len(),
            total: all.len(),
            slugs: PageSlugs {
                all: all.clone(),
                next: all.get(i + 1).cloned(),
                previous: i.checked_sub(1).map(|p| all[p].clone()),
                first: all.first().cloned(),
                last: all.last().cloned(),
            },
            items: chunk.to_vec(),
            children: children.take().unwrap_or_default(),
            meta: meta.clone(),
        })
        .collect()
}

/// Paginate each group under `prefix` and concatenate, keeping group order.
pub fn paginate_groups<'a>(
    groups: Vec<TaxonomyGroup<'a>>,
    prefix: &str,
    page_size: usize,
) -> Vec<Page<'a>> {
    let mut pages = Vec::new();
    for group in groups {
        let spec = PageSpec {
            slug: group.slug,
            prefix: prefix.to_string(),
            title: group.title,
            page_size,
            meta: group.meta,
            children: group.children,
        };
        pages.extend(paginate(&group.items, spec));
    }
    pages
}

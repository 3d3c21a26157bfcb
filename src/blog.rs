//! The paginated blog feed.
//!
//! Building the feed is a two-step pass over the host's items:
//!
//! 1. **Annotate** (mutating): select the blog items, drop drafts, flip host
//!    order so the most recent post comes first, then write computed fields
//!    into each post's metadata:
//!    - `layout`: the configured post layout, if any
//!    - `categories`: `[default_category]` when the post has none
//!    - `blog.parent`: the URL of the calendar month page the effective date
//!      lands on, `{blog_root}/YYYY/MM`. Posts whose date gets no calendar
//!      page get no parent.
//!    - `siblings`: `{previous, next}` link summaries of the neighbouring
//!      posts in feed order, `null` at either end
//! 2. **Paginate** (borrowing): page the annotated posts under the blog root.
//!
//! The annotations stay on the host's items after the build. Other
//! collections and templates read them, so any snapshot of an item taken
//! before [`annotate`] runs is stale.

use crate::calendar;
use crate::content::{ContentSource, PatternSet, resolve, select_published};
use crate::paginate::{PageSpec, join_url, paginate};
use crate::types::{Page, SiblingLink, keys};
use serde_json::Value;

/// Settings for one blog feed.
#[derive(Debug, Clone)]
pub struct BlogOptions {
    pub patterns: PatternSet,
    pub page_size: usize,
    pub blog_root: String,
    pub post_layout: Option<String>,
    pub default_category: Option<String>,
    pub title: String,
}

/// Positions of the published posts in feed order (newest first).
pub fn feed_order(source: &dyn ContentSource, patterns: &PatternSet) -> Vec<usize> {
    let mut positions = select_published(source, patterns);
    positions.reverse();
    positions
}

/// Write layout, category, parent and sibling fields onto the feed's posts.
///
/// Returns the feed positions in order.
pub fn annotate(source: &mut dyn ContentSource, options: &BlogOptions) -> Vec<usize> {
    let order = feed_order(source, &options.patterns);

    let links: Vec<SiblingLink> = {
        let items = source.items();
        order.iter().map(|&i| SiblingLink::of(&items[i])).collect()
    };

    let items = source.items_mut();
    for (pos, &i) in order.iter().enumerate() {
        let item = &mut items[i];

        if let Some(layout) = &options.post_layout {
            item.set_layout(layout);
        }
        if let Some(category) = &options.default_category {
            if item.field(keys::CATEGORIES).is_none() {
                item.data.insert(
                    keys::CATEGORIES.to_string(),
                    Value::Array(vec![Value::String(category.clone())]),
                );
            }
        }

        if let Some(parent) = month_url(&options.blog_root, &item.effective_date()) {
            item.set_blog_parent(&parent);
        }

        let previous = pos.checked_sub(1).map(|p| links[p].clone());
        let next = links.get(pos + 1).cloned();
        item.set_siblings(previous, next);
    }
    order
}

/// Annotate, then paginate the feed under the blog root.
pub fn build<'a>(source: &'a mut dyn ContentSource, options: &BlogOptions) -> Vec<Page<'a>> {
    let order = annotate(source, options);
    let source: &'a dyn ContentSource = source;
    let posts = resolve(source, &order);
    let spec = PageSpec::new(options.blog_root.clone(), "", options.title.clone())
        .page_size(options.page_size);
    paginate(&posts, spec)
}

/// URL of the calendar month page for an effective date string.
fn month_url(blog_root: &str, date: &str) -> Option<String> {
    calendar::month_slug(date).map(|slug| join_url(blog_root, &slug))
}

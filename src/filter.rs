//! Flat collections of items with a boolean flag set.
//!
//! `pages: true` in front matter puts an item into the `pages` collection.
//! Drafts never qualify. When a layout is configured it is written onto every
//! selected item, the same in-place side effect the blog feed has.

use crate::content::{ContentSource, PatternSet, resolve, select_published};
use crate::types::ContentItem;

/// Positions of published items matching `patterns` whose `field` is truthy.
pub fn flagged(source: &dyn ContentSource, patterns: &PatternSet, field: &str) -> Vec<usize> {
    let items = source.items();
    select_published(source, patterns)
        .into_iter()
        .filter(|&i| items[i].is_truthy(field))
        .collect()
}

/// Select flagged items in host order, applying `layout` when given.
pub fn filter<'a>(
    source: &'a mut dyn ContentSource,
    patterns: &PatternSet,
    field: &str,
    layout: Option<&str>,
) -> Vec<&'a ContentItem> {
    let positions = flagged(source, patterns, field);
    if let Some(layout) = layout {
        let items = source.items_mut();
        for &i in &positions {
            items[i].set_layout(layout);
        }
    }
    let source: &'a dyn ContentSource = source;
    resolve(source, &positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSet;
    use crate::test_helpers::*;

    fn patterns() -> PatternSet {
        PatternSet::new(&["*.md", "blog/*.md"]).unwrap()
    }

    #[test]
    fn keeps_only_truthy_flags() {
        let mut set = ContentSet::new(vec![
            page_item("about"),
            post("2024-01-01", "a"),
            page_item("contact").with("page", false),
            page_item("legal").with("page", ""),
            post("2024-01-02", "b").with("page", "yes"),
        ]);
        let selected = filter(&mut set, &patterns(), "page", None);
        assert_eq!(urls(&selected), vec!["/about/", "/blog/b/"]);
    }

    #[test]
    fn drafts_never_qualify() {
        let mut set = ContentSet::new(vec![draft(page_item("about")), page_item("contact")]);
        let selected = filter(&mut set, &patterns(), "page", None);
        assert_eq!(urls(&selected), vec!["/contact/"]);
    }

    #[test]
    fn layout_is_written_onto_selected_items_only() {
        let mut set = ContentSet::new(vec![page_item("about"), post("2024-01-01", "a")]);
        let selected = filter(&mut set, &patterns(), "page", Some("page.njk"));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].data["layout"], "page.njk");

        assert!(find_item(&set, "/blog/a/").field("layout").is_none());
    }

    #[test]
    fn items_outside_patterns_are_ignored() {
        let mut set = ContentSet::new(vec![page_item("about")]);
        let blog_only = PatternSet::new(&["blog/*.md"]).unwrap();
        assert!(filter(&mut set, &blog_only, "page", None).is_empty());
    }
}

//! CLI output formatting for builds, checks and breadcrumb lookups.
//!
//! # Information-First Display
//!
//! Every entry leads with its positional index and title. URLs and source
//! details are secondary context, shown after an arrow or on indented lines.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Collections
//! 001 blog (2 pages)
//!     001 Blog → blog
//!     002 Blog → blog/page-2
//! 002 blog_flat (12 items)
//!     001 Hello → /blog/hello/
//! ```
//!
//! ## Events
//!
//! ```text
//! tag: 4 groups
//! Skipped calendar entry /blog/vague/
//!     Slug: someday
//!     Reason: 'someday' does not start with YYYY-MM-DD
//! calendar (3 entries)
//! ```
//!
//! ## Breadcrumbs
//!
//! ```text
//! blog
//!     blog/2024
//!         blog/2024/01
//!             /blog/hello/
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::BlogConfig;
use crate::registry::{BuildEvent, Views};
use serde_json::Value;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Positional index + title, with optional detail in parens.
///
/// ```text
/// 001 blog (2 pages)
/// 001 Hello
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// `"1 entry"`, `"3 entries"`.
fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Display title of a serialized page or item, falling back to its URL.
fn entry_title(entry: &Value) -> &str {
    entry
        .get("title")
        .or_else(|| entry.get("data").and_then(|d| d.get("title")))
        .and_then(Value::as_str)
        .or_else(|| entry.get("url").and_then(Value::as_str))
        .unwrap_or("(untitled)")
}

/// Pages carry a `pagenumber`; plain items do not.
fn is_page(entry: &Value) -> bool {
    entry.get("pagenumber").is_some()
}

// ============================================================================
// Build events
// ============================================================================

/// Format one build event.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::CollectionBuilt { name, pages } => {
            vec![format!("{} ({})", name, plural(*pages, "entry", "entries"))]
        }
        BuildEvent::TaxonomyGrouped { field, groups } => {
            vec![format!("{}: {}", field, plural(*groups, "group", "groups"))]
        }
        BuildEvent::CalendarSkipped { url, slug, reason } => vec![
            format!("Skipped calendar entry {}", url),
            format!("{}Slug: {}", indent(1), slug),
            format!("{}Reason: {}", indent(1), reason),
        ],
        BuildEvent::LabelSkipped { url, field, label } => vec![
            format!("Skipped {} label {:?}: empty slug", field, label),
            format!("{}Source: {}", indent(1), url),
        ],
        BuildEvent::FlattenRejected { reason } => {
            vec![format!("blog_flatten returned null: {}", reason)]
        }
    }
}

// ============================================================================
// Build summary
// ============================================================================

/// Format every view: a header per collection, then one line per entry.
pub fn format_build_output(views: &Views) -> Vec<String> {
    let mut lines = vec!["Collections".to_string()];

    for (i, (name, view)) in views.iter().enumerate() {
        let entries = view.as_array().map(Vec::as_slice).unwrap_or_default();
        let detail = if entries.first().is_some_and(is_page) {
            plural(entries.len(), "page", "pages")
        } else {
            plural(entries.len(), "item", "items")
        };
        lines.push(entity_header(i + 1, name, Some(&detail)));

        for (j, entry) in entries.iter().enumerate() {
            let header = entity_header(j + 1, entry_title(entry), None);
            match entry.get("url").and_then(Value::as_str) {
                Some(url) => lines.push(format!("{}{} → {}", indent(1), header, url)),
                None => lines.push(format!("{}{}", indent(1), header)),
            }
        }
    }

    lines
}

/// Print the build summary to stdout.
pub fn print_build_output(views: &Views) {
    for line in format_build_output(views) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the effective configuration and per-collection entry counts.
pub fn format_check_output(config: &BlogConfig, views: &Views) -> Vec<String> {
    let mut lines = vec!["Config".to_string()];
    lines.push(format!("{}Blog root: {}", indent(1), config.blog_root));
    lines.push(format!("{}Items per page: {}", indent(1), config.items_per_page));
    lines.push(format!("{}Blog patterns:", indent(1)));
    for pattern in config.blog_patterns() {
        lines.push(format!("{}{}", indent(2), pattern));
    }
    lines.push(format!("{}All patterns:", indent(1)));
    for pattern in config.all_patterns() {
        lines.push(format!("{}{}", indent(2), pattern));
    }

    lines.push(String::new());
    lines.push("Collections".to_string());
    for (i, (name, view)) in views.iter().enumerate() {
        let count = view.as_array().map_or(0, Vec::len);
        let detail = plural(count, "entry", "entries");
        lines.push(format!("{}{}", indent(1), entity_header(i + 1, name, Some(&detail))));
    }
    lines
}

pub fn print_check_output(config: &BlogConfig, views: &Views) {
    for line in format_check_output(config, views) {
        println!("{}", line);
    }
}

// ============================================================================
// Breadcrumbs
// ============================================================================

/// Format a trail root first, one level of indentation per step down.
pub fn format_breadcrumbs(trail: &[String]) -> Vec<String> {
    if trail.is_empty() {
        return vec!["No breadcrumb trail".to_string()];
    }
    trail
        .iter()
        .rev()
        .enumerate()
        .map(|(depth, url)| format!("{}{}", indent(depth), url))
        .collect()
}

pub fn print_breadcrumbs(trail: &[String]) {
    for line in format_breadcrumbs(trail) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSet;
    use crate::registry::Registry;
    use crate::test_helpers::*;

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(123), "123");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn entity_header_with_and_without_detail() {
        assert_eq!(entity_header(1, "blog", Some("2 pages")), "001 blog (2 pages)");
        assert_eq!(entity_header(3, "Hello", None), "003 Hello");
    }

    #[test]
    fn entry_title_falls_back_to_url() {
        let page = serde_json::json!({ "title": "Blog", "url": "blog" });
        let item = serde_json::json!({ "url": "/a/", "data": { "title": "A" } });
        let bare = serde_json::json!({ "url": "/b/" });
        assert_eq!(entry_title(&page), "Blog");
        assert_eq!(entry_title(&item), "A");
        assert_eq!(entry_title(&bare), "/b/");
    }

    // =========================================================================
    // Events
    // =========================================================================

    #[test]
    fn collection_built_line() {
        let lines = format_build_event(&BuildEvent::CollectionBuilt {
            name: "calendar".into(),
            pages: 3,
        });
        assert_eq!(lines, vec!["calendar (3 entries)"]);

        let lines = format_build_event(&BuildEvent::CollectionBuilt {
            name: "blog".into(),
            pages: 1,
        });
        assert_eq!(lines, vec!["blog (1 entry)"]);
    }

    #[test]
    fn calendar_skip_shows_context_lines() {
        let lines = format_build_event(&BuildEvent::CalendarSkipped {
            url: "/blog/vague/".into(),
            slug: "someday".into(),
            reason: "not a date".into(),
        });
        assert_eq!(
            lines,
            vec![
                "Skipped calendar entry /blog/vague/",
                "    Slug: someday",
                "    Reason: not a date",
            ]
        );
    }

    #[test]
    fn label_skip_names_field_and_source() {
        let lines = format_build_event(&BuildEvent::LabelSkipped {
            url: "/blog/a/".into(),
            field: "tags".into(),
            label: "&".into(),
        });
        assert_eq!(lines[0], "Skipped tags label \"&\": empty slug");
        assert_eq!(lines[1], "    Source: /blog/a/");
    }

    // =========================================================================
    // Build summary
    // =========================================================================

    fn built_views() -> Views {
        let config = crate::config::parse_config(
            r#"
blog = ["blog/*.md"]
all = ["**/*.md"]
taxonomies = []
flags = []
"#,
        )
        .unwrap();
        let registry = Registry::with_defaults(&config).unwrap();
        let mut set = ContentSet::new(vec![post("2024-01-15", "hello").with("title", "Hello")]);
        registry.build(&mut set, None).unwrap()
    }

    #[test]
    fn build_output_lists_collections_and_entries() {
        let lines = format_build_output(&built_views());
        assert_eq!(
            lines,
            vec![
                "Collections",
                "001 all (1 item)",
                "    001 Hello → /blog/hello/",
                "002 blog (1 page)",
                "    001 Blog → blog",
                "003 blog_flat (1 item)",
                "    001 Hello → /blog/hello/",
                "004 calendar (2 pages)",
                "    001 2024 → blog/2024",
                "    002 January 2024 → blog/2024/01",
            ]
        );
    }

    #[test]
    fn check_output_shows_config_and_counts() {
        let config = BlogConfig::default();
        let lines = format_check_output(&config, &built_views());
        assert_eq!(lines[0], "Config");
        assert!(lines.contains(&"    Blog root: blog".to_string()));
        assert!(lines.contains(&"        ./*.md".to_string()));
        assert!(lines.contains(&"    004 calendar (2 entries)".to_string()));
    }

    // =========================================================================
    // Breadcrumbs
    // =========================================================================

    #[test]
    fn breadcrumbs_print_root_first() {
        let trail = vec![
            "/blog/hello/".to_string(),
            "blog/2024/01".to_string(),
            "blog".to_string(),
        ];
        assert_eq!(
            format_breadcrumbs(&trail),
            vec!["blog", "    blog/2024/01", "        /blog/hello/"]
        );
    }

    #[test]
    fn empty_trail_says_so() {
        assert_eq!(format_breadcrumbs(&[]), vec!["No breadcrumb trail"]);
    }
}

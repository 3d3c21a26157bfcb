//! Year and month archive pages.
//!
//! Posts are grouped by effective date (`2024-01-15`), then folded into a
//! two-level hierarchy:
//!
//! ```text
//! slug      title          type   items
//! 2023      2023           year   every 2023 post
//! 2023/01   January 2023   month  every January 2023 post
//! 2023/02   February 2023  month
//! 2024      2024           year
//! 2024/01   January 2024   month
//! ```
//!
//! The flattened list is sorted by slug. Zero-padded `YYYY` and `YYYY/MM`
//! slugs sort correctly as plain strings, with each year directly before its
//! months. Month nodes also pass their posts as page children, so the first
//! page of a month can list every post inline. Buckets fill oldest day
//! first, in host order within a day.
//!
//! ## Page Meta
//!
//! | Key | Year | Month |
//! |-----|------|-------|
//! | `type` | `"year"` | `"month"` |
//! | `year` | `"2024"` | `"2024"` |
//! | `month` |  | `"01"` |
//! | `shortTitle` |  | `"January"` |
//! | `blog.parent` | `{blog_root}` | `{blog_root}/{year}` |
//!
//! ## Skips
//!
//! A date key that does not parse as `YYYY-MM-DD` with a real month (for
//! example `created: someday`) drops only that post from the calendar. Each
//! skip is returned as a [`CalendarSkip`] so callers can count or report it.

use crate::group::{Extractor, group};
use crate::paginate::{join_url, paginate_groups};
use crate::slug::slugify;
use crate::types::{ContentItem, Metadata, Page, TaxonomyGroup};
use chrono::Month;
use regex::Regex;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static DATE_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)-(\d+)").expect("date slug pattern is valid"));

/// A post left out of the calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarSkip {
    pub url: String,
    pub slug: String,
    pub reason: String,
}

/// Calendar pages plus the posts that could not be placed.
#[derive(Debug, Clone)]
pub struct Calendar<'a> {
    pub pages: Vec<Page<'a>>,
    pub skipped: Vec<CalendarSkip>,
}

/// Build the paginated calendar for `posts` under `blog_root`.
pub fn build<'a>(posts: &[&'a ContentItem], blog_root: &str, page_size: usize) -> Calendar<'a> {
    let (nodes, skipped) = nodes(posts, blog_root);
    Calendar {
        pages: paginate_groups(nodes, blog_root, page_size),
        skipped,
    }
}

/// Year and month nodes sorted by slug, before pagination.
pub fn nodes<'a>(
    posts: &[&'a ContentItem],
    blog_root: &str,
) -> (Vec<TaxonomyGroup<'a>>, Vec<CalendarSkip>) {
    let by_date = Extractor::function(|item| vec![item.effective_date()]);
    let days = group(posts, &by_date, None).groups;

    let mut buckets: BTreeMap<String, TaxonomyGroup<'a>> = BTreeMap::new();
    let mut skipped = Vec::new();

    for day in days {
        let (year, month) = match parse_day_slug(&day.slug) {
            Ok(parts) => parts,
            Err(reason) => {
                skipped.extend(day.items.iter().map(|item| CalendarSkip {
                    url: item.url.clone(),
                    slug: day.slug.clone(),
                    reason: reason.clone(),
                }));
                continue;
            }
        };

        let year_node = buckets
            .entry(year.clone())
            .or_insert_with(|| year_group(&year, blog_root));
        for &item in &day.items {
            year_node.push(item);
        }

        let month_slug = month.slug(&year);
        let month_node = buckets
            .entry(month_slug.clone())
            .or_insert_with(|| month_group(&month_slug, &year, &month, blog_root));
        // Children repeat the items, so page 0 of a month serializes every
        // post twice.
        for &item in &day.items {
            month_node.push(item);
            month_node.children.push(item);
        }
    }

    // BTreeMap order is the byte-wise slug order the hierarchy relies on.
    (buckets.into_values().collect(), skipped)
}

pub(crate) struct MonthKey {
    /// As written in the slug, e.g. `"01"`.
    pub(crate) number: String,
    pub(crate) name: &'static str,
}

impl MonthKey {
    fn slug(&self, year: &str) -> String {
        format!("{year}/{}", self.number)
    }
}

/// Slug of the month node a date lands in, e.g. `2024/01`.
///
/// `None` when the date gets no calendar page.
pub(crate) fn month_slug(date: &str) -> Option<String> {
    let (year, month) = parse_day_slug(&slugify(&date.to_lowercase())).ok()?;
    Some(month.slug(&year))
}

pub(crate) fn parse_day_slug(slug: &str) -> Result<(String, MonthKey), String> {
    let caps = DATE_SLUG
        .captures(slug)
        .ok_or_else(|| format!("'{slug}' does not start with YYYY-MM-DD"))?;
    let year = caps[1].to_string();
    let number = caps[2].to_string();
    let month = number
        .parse::<u8>()
        .ok()
        .and_then(|n| Month::try_from(n).ok())
        .ok_or_else(|| format!("'{number}' is not a month"))?;
    Ok((
        year,
        MonthKey {
            number,
            name: month.name(),
        },
    ))
}

fn year_group<'a>(year: &str, blog_root: &str) -> TaxonomyGroup<'a> {
    let mut node = TaxonomyGroup::new(year, year);
    node.meta = calendar_meta(json!({
        "type": "year",
        "year": year,
        "blog": { "parent": join_url(blog_root, "") },
    }));
    node
}

fn month_group<'a>(slug: &str, year: &str, month: &MonthKey, blog_root: &str) -> TaxonomyGroup<'a> {
    let mut node = TaxonomyGroup::new(slug, format!("{} {year}", month.name));
    node.meta = calendar_meta(json!({
        "type": "month",
        "year": year,
        "month": month.number,
        "shortTitle": month.name,
        "blog": { "parent": join_url(blog_root, year) },
    }));
    node
}

fn calendar_meta(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        _ => Metadata::new(),
    }
}

/// Node type (`"year"` or `"month"`) of a calendar page.
pub fn node_type<'p>(page: &'p Page<'_>) -> Option<&'p str> {
    page.meta.get("type").and_then(Value::as_str)
}

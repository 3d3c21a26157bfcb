//! Grouping items by extracted label values.
//!
//! Each item contributes zero or more labels. Labels are normalized with
//! [`slugify`], and every distinct slug becomes one [`TaxonomyGroup`]:
//!
//! ```text
//! post A  tags: ["Rust", "Web Design"]     rust        → [A, B]  "Rust"
//! post B  tags: ["rust"]               →   web-design  → [A, C]  "Web Design"
//! post C  tags: "web design."
//! ```
//!
//! The group title is the first label seen for that slug, verbatim. Groups
//! come back sorted by slug, case-insensitively.
//!
//! ## Label Resolution
//!
//! | Metadata value | Labels |
//! |----------------|--------|
//! | `"Rust"` | `["Rust"]` |
//! | `["Rust", "Web"]` | `["Rust", "Web"]` (non-string entries skipped) |
//! | missing, `null`, `[]`, number, object | none → default value, if configured |
//!
//! An item that resolves to no labels and has no default is left out of
//! that one grouping. That is not an error.
//!
//! Labels of one item that normalize to the same slug count once: `["Rust",
//! "rust"]` adds the item to `rust` a single time with a count of 1. This
//! departs from plain per-value counting: a repeated label neither appends
//! the item again nor increments the count.

use crate::slug::slugify;
use crate::types::{ContentItem, TaxonomyGroup};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// How labels are pulled out of an item.
pub enum Extractor {
    /// Read `data[name]`.
    Field(String),
    /// Compute labels from the whole item.
    Function(Box<dyn Fn(&ContentItem) -> Vec<String>>),
}

impl Extractor {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn function(f: impl Fn(&ContentItem) -> Vec<String> + 'static) -> Self {
        Self::Function(Box::new(f))
    }

    /// Short description used in build events.
    pub fn describe(&self) -> &str {
        match self {
            Self::Field(name) => name,
            Self::Function(_) => "<computed>",
        }
    }

    fn labels(&self, item: &ContentItem) -> Vec<String> {
        match self {
            Self::Field(name) => item.field(name).map(labels_from_value).unwrap_or_default(),
            Self::Function(f) => f(item),
        }
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

fn labels_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(values) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// A label dropped because nothing of it survived slug normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLabel {
    pub url: String,
    pub label: String,
}

/// Result of one grouping pass.
#[derive(Debug, Clone)]
pub struct Grouping<'a> {
    pub groups: Vec<TaxonomyGroup<'a>>,
    pub skipped: Vec<SkippedLabel>,
}

/// Group `items` by the labels `extractor` yields, falling back to `default`
/// for items that yield none.
pub fn group<'a>(
    items: &[&'a ContentItem],
    extractor: &Extractor,
    default: Option<&str>,
) -> Grouping<'a> {
    let mut groups: Vec<TaxonomyGroup<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped = Vec::new();

    for &item in items {
        let mut labels = extractor.labels(item);
        if labels.is_empty() {
            match default {
                Some(default) => labels.push(default.to_string()),
                None => continue,
            }
        }

        let mut seen: Vec<String> = Vec::with_capacity(labels.len());
        for label in labels {
            let slug = slugify(&label.to_lowercase());
            if slug.is_empty() {
                skipped.push(SkippedLabel {
                    url: item.url.clone(),
                    label,
                });
                continue;
            }
            if seen.contains(&slug) {
                continue;
            }
            seen.push(slug.clone());
            let pos = *index.entry(slug.clone()).or_insert_with(|| {
                groups.push(TaxonomyGroup::new(slug, label));
                groups.len() - 1
            });
            groups[pos].push(item);
        }
    }

    groups.sort_by(|a, b| compare_slugs(&a.slug, &b.slug));
    Grouping { groups, skipped }
}

/// Case- and accent-insensitive slug ordering, with a byte-wise tie break so
/// the order is total.
pub fn compare_slugs(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

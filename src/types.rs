//! Shared types used by every collection builder.
//!
//! [`ContentItem`] is owned by the host; builders only borrow it, except for
//! the annotation pass in [`crate::blog`] which writes computed links into
//! the item's metadata bag. [`TaxonomyGroup`] and [`Page`] borrow items and
//! live only for one build.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata attached to a content item (front matter, plus the
/// fields builders compute).
pub type Metadata = Map<String, Value>;

/// Metadata keys written by the build.
pub mod keys {
    pub const TAGS: &str = "tags";
    pub const CATEGORIES: &str = "categories";
    pub const CREATED: &str = "created";
    pub const DRAFT: &str = "draft";
    pub const LAYOUT: &str = "layout";
    pub const TITLE: &str = "title";
    pub const SIBLINGS: &str = "siblings";
    pub const BLOG: &str = "blog";
    pub const PARENT: &str = "parent";
}

/// One unit of site content, as handed over by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Source path the host matches patterns against (e.g. `blog/2024-01-15-hello.md`).
    pub input_path: String,
    pub url: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub data: Metadata,
}

impl ContentItem {
    pub fn new(input_path: impl Into<String>, url: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            input_path: input_path.into(),
            url: url.into(),
            date,
            data: Metadata::new(),
        }
    }

    /// Builder-style metadata insert, mostly for hosts and tests.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Whether `data[name]` is set to a truthy value.
    ///
    /// Follows front-matter conventions: `null`, `false`, `0`, and `""` are
    /// falsy; everything else, including empty lists, is truthy.
    pub fn is_truthy(&self, name: &str) -> bool {
        self.field(name).is_some_and(is_truthy)
    }

    pub fn is_draft(&self) -> bool {
        self.is_truthy(keys::DRAFT)
    }

    pub fn title(&self) -> Option<&str> {
        self.field(keys::TITLE).and_then(Value::as_str)
    }

    /// Effective date as `YYYY-MM-DD`.
    ///
    /// A truthy `created` field wins over the item date. String values are
    /// truncated to 10 characters without further validation, so a malformed
    /// `created` surfaces later as a calendar skip.
    pub fn effective_date(&self) -> String {
        match self.field(keys::CREATED).filter(|v| is_truthy(v)) {
            Some(Value::String(s)) => s.chars().take(10).collect(),
            Some(other) => other.to_string().chars().take(10).collect(),
            None => self.date.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn set_layout(&mut self, layout: &str) {
        self.data
            .insert(keys::LAYOUT.to_string(), Value::String(layout.to_string()));
    }

    pub fn set_siblings(&mut self, previous: Option<SiblingLink>, next: Option<SiblingLink>) {
        let siblings = serde_json::json!({ "previous": previous, "next": next });
        self.data.insert(keys::SIBLINGS.to_string(), siblings);
    }

    /// Parent URL under `data.blog.parent`, if any.
    pub fn blog_parent(&self) -> Option<&str> {
        self.field(keys::BLOG)?.get(keys::PARENT)?.as_str()
    }

    /// Set `data.blog.parent`, keeping other keys of an existing `blog` object.
    pub fn set_blog_parent(&mut self, parent: &str) {
        let blog = self
            .data
            .entry(keys::BLOG)
            .or_insert_with(|| Value::Object(Map::new()));
        if !blog.is_object() {
            *blog = Value::Object(Map::new());
        }
        if let Value::Object(blog) = blog {
            blog.insert(keys::PARENT.to_string(), Value::String(parent.to_string()));
        }
    }
}

/// Front-matter truthiness of a metadata value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Summary of a neighbouring item in the feed.
///
/// Stored instead of the full item so serialized views never nest items
/// inside items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiblingLink {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub date: String,
}

impl SiblingLink {
    pub fn of(item: &ContentItem) -> Self {
        Self {
            url: item.url.clone(),
            title: item.title().map(str::to_string),
            date: item.effective_date(),
        }
    }
}

/// All items that share one normalized label.
#[derive(Debug, Clone)]
pub struct TaxonomyGroup<'a> {
    pub slug: String,
    /// First label seen for this slug, verbatim.
    pub title: String,
    pub count: usize,
    pub items: Vec<&'a ContentItem>,
    /// Merged into every page paginated from this group.
    pub meta: Metadata,
    /// Attached to the first page only.
    pub children: Vec<&'a ContentItem>,
}

impl<'a> TaxonomyGroup<'a> {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            count: 0,
            items: Vec::new(),
            meta: Metadata::new(),
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, item: &'a ContentItem) {
        self.items.push(item);
        self.count += 1;
    }
}

/// Navigation slugs shared by all pages of one paginated sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSlugs {
    pub all: Vec<String>,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
}

/// One chunk of a paginated sequence.
#[derive(Debug, Clone, Serialize)]
pub struct Page<'a> {
    pub title: String,
    pub slug: String,
    pub url: String,
    /// 0-based.
    pub pagenumber: usize,
    /// Items across all pages of the sequence.
    pub count: usize,
    /// Number of pages in the sequence.
    pub total: usize,
    pub slugs: PageSlugs,
    pub items: Vec<&'a ContentItem>,
    pub children: Vec<&'a ContentItem>,
    /// Extra fields merged into the serialized page at top level.
    #[serde(flatten)]
    pub meta: Metadata,
}

/// Field names a [`Page`] serializes itself; meta entries with these names are dropped.
pub const RESERVED_PAGE_KEYS: &[&str] = &[
    "title",
    "slug",
    "url",
    "pagenumber",
    "count",
    "total",
    "slugs",
    "items",
    "children",
];

impl Page<'_> {
    /// Parent URL under `blog.parent` in the page meta, if any.
    pub fn blog_parent(&self) -> Option<&str> {
        self.meta.get(keys::BLOG)?.get(keys::PARENT)?.as_str()
    }
}

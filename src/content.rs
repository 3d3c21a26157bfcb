//! Host-side content access.
//!
//! Builders never load content themselves. They ask a [`ContentSource`] for
//! the items matching a [`PatternSet`] and get back positions into the
//! host's item list, in host order. Positions (rather than references) let
//! the blog pipeline annotate items in place before anything borrows them.
//!
//! [`ContentSet`] is the in-crate host: a plain `Vec<ContentItem>` loaded
//! from a JSON manifest.
//!
//! ## Manifest Format
//!
//! ```json
//! [
//!   {
//!     "input_path": "blog/2024-01-15-hello.md",
//!     "url": "/blog/hello/",
//!     "date": "2024-01-15",
//!     "data": { "title": "Hello", "tags": ["Rust", "Web"] }
//!   }
//! ]
//! ```
//!
//! ## Pattern Matching
//!
//! Patterns are globs matched against `input_path`. `*` stays within one
//! path segment and `**` crosses segments. A leading `./` is ignored on both
//! the pattern and the path, so the default `./*.md` matches `hello.md`.

use crate::config::ConfigError;
use crate::types::ContentItem;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Manifest parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Compiled set of content patterns.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl PatternSet {
    /// Compile `patterns`. An empty list or an invalid glob is a configuration error.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Err(ConfigError::Validation(
                "content pattern list must not be empty".into(),
            ));
        }
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(strip_dot_slash(pattern))
                .literal_separator(true)
                .build()?;
            builder.add(glob);
            kept.push(pattern.to_string());
        }
        Ok(Self {
            patterns: kept,
            set: builder.build()?,
        })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.set.is_match(strip_dot_slash(path))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn strip_dot_slash(path: &str) -> &str {
    let mut path = path;
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path
}

/// Content selection capability the host provides to builders.
pub trait ContentSource {
    fn items(&self) -> &[ContentItem];

    fn items_mut(&mut self) -> &mut [ContentItem];

    /// Positions of the items matching `patterns`, in host order.
    fn select_by_pattern(&self, patterns: &PatternSet) -> Vec<usize>;
}

/// Owned content collection, the reference host implementation.
#[derive(Debug, Clone, Default)]
pub struct ContentSet {
    items: Vec<ContentItem>,
}

impl ContentSet {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    /// Load items from a JSON manifest file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let items: Vec<ContentItem> = serde_json::from_str(json)?;
        Ok(Self::new(items))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<ContentItem> {
        self.items
    }
}

impl ContentSource for ContentSet {
    fn items(&self) -> &[ContentItem] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut [ContentItem] {
        &mut self.items
    }

    fn select_by_pattern(&self, patterns: &PatternSet) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| patterns.is_match(&item.input_path))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Non-draft items matching `patterns`, in host order.
pub fn select_published(source: &dyn ContentSource, patterns: &PatternSet) -> Vec<usize> {
    let items = source.items();
    source
        .select_by_pattern(patterns)
        .into_iter()
        .filter(|&i| !items[i].is_draft())
        .collect()
}

/// Resolve positions into item references.
pub fn resolve<'a>(source: &'a dyn ContentSource, positions: &[usize]) -> Vec<&'a ContentItem> {
    let items = source.items();
    positions.iter().map(|&i| &items[i]).collect()
}

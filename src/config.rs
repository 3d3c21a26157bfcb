//! Build configuration.
//!
//! Handles loading, validating, and resolving `chronicle.toml`. Every
//! collection registration receives a [`BlogConfig`] value explicitly; there
//! is no shared "last configured" state between registrations.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content = "."               # Content root used to derive default patterns
//! extensions = ["html", "md", "11ty.js", "liquid", "njk", "hbs",
//!               "mustache", "ejs", "haml", "pug", "jstl"]
//! # blog = ["./*.md"]         # Blog patterns (default: {content}/*.{ext})
//! # all = ["./**/*.md"]       # All-content patterns (default: {content}/**/*.{ext})
//! items_per_page = 10
//! blog_root = "blog"
//! # post_layout = "post.njk"  # Layout written onto every blog post
//! # default_category = "latest"
//!
//! [[taxonomies]]
//! field = "tags"
//! name = "tag"
//!
//! [[taxonomies]]
//! field = "categories"
//! name = "category"
//! # default = "uncategorized"  # Value for posts without this field
//!
//! [[flags]]
//! field = "page"
//! name = "pages"
//! # layout = "page.njk"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Setting `taxonomies` or
//! `flags` replaces the default list rather than extending it.

use crate::blog::BlogOptions;
use crate::content::PatternSet;
use crate::paginate::DEFAULT_ITEMS_PER_PAGE;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the config directory.
pub const CONFIG_FILE: &str = "chronicle.toml";

/// Template extensions recognized when deriving default patterns.
pub const TEMPLATE_EXTENSIONS: &[&str] = &[
    "html", "md", "11ty.js", "liquid", "njk", "hbs", "mustache", "ejs", "haml", "pug", "jstl",
];

/// Collection names registered regardless of configuration.
pub const BUILTIN_COLLECTIONS: &[&str] = &["blog", "blog_flat", "all", "calendar"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid content pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `chronicle.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Content root path, used to derive default patterns.
    pub content: String,
    /// Template extensions recognized in default patterns.
    pub extensions: Vec<String>,
    /// Patterns selecting blog posts. Derived from `content` and `extensions` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<Vec<String>>,
    /// Patterns selecting all content. Derived from `content` and `extensions` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<String>>,
    pub items_per_page: usize,
    /// Slug of the blog feed and URL prefix of every derived collection.
    pub blog_root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_category: Option<String>,
    pub taxonomies: Vec<TaxonomyConfig>,
    pub flags: Vec<FlagConfig>,
}

/// One taxonomy: a metadata field grouped into `{blog_root}/{name}/{slug}` pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxonomyConfig {
    pub field: String,
    pub name: String,
    /// Value assigned to posts that have no value for `field`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// One boolean collection: items whose `field` is truthy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagConfig {
    pub field: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            content: ".".to_string(),
            extensions: TEMPLATE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            blog: None,
            all: None,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            blog_root: "blog".to_string(),
            post_layout: None,
            default_category: None,
            taxonomies: vec![
                TaxonomyConfig {
                    field: "tags".to_string(),
                    name: "tag".to_string(),
                    default: None,
                },
                TaxonomyConfig {
                    field: "categories".to_string(),
                    name: "category".to_string(),
                    default: None,
                },
            ],
            flags: vec![FlagConfig {
                field: "page".to_string(),
                name: "pages".to_string(),
                layout: None,
            }],
        }
    }
}

impl BlogConfig {
    /// Blog patterns, explicit or derived as `{content}/*.{ext}`.
    pub fn blog_patterns(&self) -> Vec<String> {
        self.blog
            .clone()
            .unwrap_or_else(|| self.derived_patterns("*"))
    }

    /// All-content patterns, explicit or derived as `{content}/**/*.{ext}`.
    pub fn all_patterns(&self) -> Vec<String> {
        self.all
            .clone()
            .unwrap_or_else(|| self.derived_patterns("**/*"))
    }

    fn derived_patterns(&self, stem: &str) -> Vec<String> {
        let content = self.content.trim_end_matches('/');
        self.extensions
            .iter()
            .map(|ext| format!("{content}/{stem}.{ext}"))
            .collect()
    }

    pub fn blog_pattern_set(&self) -> Result<PatternSet, ConfigError> {
        PatternSet::new(&self.blog_patterns())
    }

    pub fn all_pattern_set(&self) -> Result<PatternSet, ConfigError> {
        PatternSet::new(&self.all_patterns())
    }

    /// Options for the blog feed built from this config.
    pub fn blog_options(&self) -> Result<BlogOptions, ConfigError> {
        Ok(BlogOptions {
            patterns: self.blog_pattern_set()?,
            page_size: self.items_per_page,
            blog_root: self.blog_root.clone(),
            post_layout: self.post_layout.clone(),
            default_category: self.default_category.clone(),
            title: "Blog".to_string(),
        })
    }

    /// Validate config values. Runs before any collection is registered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items_per_page == 0 {
            return Err(ConfigError::Validation(
                "items_per_page must be greater than 0".into(),
            ));
        }
        if self.blog_root.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation("blog_root must not be empty".into()));
        }
        if self.blog.is_none() && self.all.is_none() && self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "extensions must not be empty when blog/all patterns are derived".into(),
            ));
        }
        self.blog_pattern_set()?;
        self.all_pattern_set()?;

        let mut names: HashSet<&str> = BUILTIN_COLLECTIONS.iter().copied().collect();
        let configured = self
            .taxonomies
            .iter()
            .map(|t| (t.name.as_str(), t.field.as_str()))
            .chain(self.flags.iter().map(|f| (f.name.as_str(), f.field.as_str())));
        for (name, field) in configured {
            if name.is_empty() || field.is_empty() {
                return Err(ConfigError::Validation(
                    "taxonomy and flag entries need a non-empty name and field".into(),
                ));
            }
            if !names.insert(name) {
                return Err(ConfigError::Validation(format!(
                    "collection name '{name}' is used more than once"
                )));
            }
        }
        Ok(())
    }
}

/// Parse and validate config from TOML text.
pub fn parse_config(text: &str) -> Result<BlogConfig, ConfigError> {
    let config: BlogConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `chronicle.toml` in the given directory.
///
/// Returns validated stock defaults when no file exists.
pub fn load_config(dir: &Path) -> Result<BlogConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        let config = BlogConfig::default();
        config.validate()?;
        return Ok(config);
    }
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `chronicle.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Chronicle Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Content root, used to derive the default blog and all-content patterns.
content = "."

# Template extensions recognized in derived patterns.
extensions = ["html", "md", "11ty.js", "liquid", "njk", "hbs", "mustache", "ejs", "haml", "pug", "jstl"]

# Glob patterns selecting blog posts, matched against each item's input path.
# `*` stays within one directory, `**` crosses directories.
# Default: one "{content}/*.{ext}" pattern per extension.
# blog = ["./posts/*.md"]

# Glob patterns selecting all content for the "all" collection.
# Default: one "{content}/**/*.{ext}" pattern per extension.
# all = ["./**/*.md"]

# Items per page for the blog feed, taxonomies and the calendar.
items_per_page = 10

# Slug of the blog feed. Taxonomy and calendar pages live under it:
#   blog, blog/page-2, blog/tag/rust, blog/2024/01
blog_root = "blog"

# Layout written onto every blog post.
# post_layout = "post.njk"

# Category assigned to posts that have no `categories`.
# default_category = "latest"

# ---------------------------------------------------------------------------
# Taxonomies: one paginated collection per distinct value of a field.
# Setting this list replaces the defaults below.
# ---------------------------------------------------------------------------
[[taxonomies]]
field = "tags"
name = "tag"

[[taxonomies]]
field = "categories"
name = "category"
# Value used for posts without the field; omit to leave them out.
# default = "uncategorized"

# ---------------------------------------------------------------------------
# Flags: flat collections of blog items whose field is truthy.
# ---------------------------------------------------------------------------
[[flags]]
field = "page"
name = "pages"
# layout = "page.njk"
"##
}

//! Collection and filter registration.
//!
//! A [`Registry`] holds named collection builders and named helper filters.
//! [`Registry::build`] runs every builder in registration order against the
//! host's content and collects the results into [`Views`], one JSON value
//! per collection name.
//!
//! ## Default Registrations
//!
//! [`Registry::with_defaults`] wires up the standard blog collections from a
//! [`BlogConfig`]:
//!
//! | Name | Contents |
//! |------|----------|
//! | `blog_flat` | annotated blog posts, newest first, unpaginated |
//! | `all` | every published item matching the `all` patterns, reversed |
//! | one per `[[flags]]` | blog-pattern items whose flag field is truthy |
//! | `blog` | the paginated feed under `blog_root` |
//! | one per `[[taxonomies]]` | pages under `{blog_root}/{name}/{slug}` |
//! | `calendar` | year and month pages under `blog_root` |
//!
//! Order matters: the blog feed annotates posts in place, so every builder
//! registered after it sees default categories and parent links.
//!
//! Only the feed views are reversed. Taxonomies and the calendar group posts
//! in host order, so a group's title is the first label the host lists.
//!
//! ## Events
//!
//! Builders report progress and non-fatal skips as [`BuildEvent`]s over an
//! optional channel. Passing `None` silences them; nothing else changes.

use crate::blog;
use crate::calendar;
use crate::config::{BlogConfig, ConfigError};
use crate::content::{ContentSource, resolve, select_published};
use crate::filter;
use crate::group::{Extractor, group};
use crate::helpers::{self, FilterError, FilterResult};
use crate::nav;
use crate::paginate::{join_url, paginate_groups};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Progress and diagnostics emitted while building collections.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// A collection finished; `pages` is the length of its view.
    CollectionBuilt { name: String, pages: usize },
    TaxonomyGrouped { field: String, groups: usize },
    /// A post left out of the calendar because its date key did not parse.
    CalendarSkipped {
        url: String,
        slug: String,
        reason: String,
    },
    /// A label that normalized to an empty slug.
    LabelSkipped {
        url: String,
        field: String,
        label: String,
    },
    /// `blog_flatten` received input that is not a list of lists.
    FlattenRejected { reason: String },
}

/// Send `event` if a channel is attached. A closed receiver is ignored.
pub fn emit(events: Option<&Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        tx.send(event).ok();
    }
}

type Builder =
    Box<dyn Fn(&mut dyn ContentSource, Option<&Sender<BuildEvent>>) -> Result<Value, BuildError>>;

type FilterFn = Box<dyn Fn(&[Value], Option<&Sender<BuildEvent>>) -> FilterResult>;

/// Named collection builders and helper filters.
#[derive(Default)]
pub struct Registry {
    collections: Vec<(String, Builder)>,
    filters: BTreeMap<String, FilterFn>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collection builder. A later registration under the same name
    /// replaces the earlier one but keeps its position.
    pub fn register_collection(
        &mut self,
        name: impl Into<String>,
        builder: impl Fn(&mut dyn ContentSource, Option<&Sender<BuildEvent>>) -> Result<Value, BuildError>
        + 'static,
    ) {
        let name = name.into();
        let builder: Builder = Box::new(builder);
        match self.collections.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = builder,
            None => self.collections.push((name, builder)),
        }
    }

    pub fn register_filter(
        &mut self,
        name: impl Into<String>,
        filter: impl Fn(&[Value], Option<&Sender<BuildEvent>>) -> FilterResult + 'static,
    ) {
        self.filters.insert(name.into(), Box::new(filter));
    }

    /// Collection names in build order.
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.keys().map(String::as_str).collect()
    }

    /// Call a registered filter by name.
    pub fn apply_filter(
        &self,
        name: &str,
        args: &[Value],
        events: Option<&Sender<BuildEvent>>,
    ) -> FilterResult {
        let filter = self
            .filters
            .get(name)
            .ok_or_else(|| FilterError::UnknownFilter(name.to_string()))?;
        filter(args, events)
    }

    /// Run every builder in registration order.
    ///
    /// The first failing builder aborts the run; no views are returned.
    pub fn build(
        &self,
        source: &mut dyn ContentSource,
        events: Option<&Sender<BuildEvent>>,
    ) -> Result<Views, BuildError> {
        let mut views = BTreeMap::new();
        for (name, builder) in &self.collections {
            let view = builder(&mut *source, events)?;
            let pages = view.as_array().map_or(0, Vec::len);
            emit(
                events,
                BuildEvent::CollectionBuilt {
                    name: name.clone(),
                    pages,
                },
            );
            views.insert(name.clone(), view);
        }
        Ok(Views(views))
    }

    /// The standard blog collections and helper filters for `config`.
    ///
    /// Validates `config` and compiles every pattern set up front, so a bad
    /// configuration fails here rather than halfway through a build.
    pub fn with_defaults(config: &BlogConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut registry = Self::new();

        let options = config.blog_options()?;
        let feed = options.clone();
        registry.register_collection("blog_flat", move |source, _events| {
            let order = blog::annotate(source, &feed);
            let source = &*source;
            Ok(serde_json::to_value(resolve(source, &order))?)
        });

        let all = config.all_pattern_set()?;
        registry.register_collection("all", move |source, _events| {
            let source = &*source;
            let mut positions = select_published(source, &all);
            positions.reverse();
            Ok(serde_json::to_value(resolve(source, &positions))?)
        });

        for flag in &config.flags {
            let patterns = options.patterns.clone();
            let field = flag.field.clone();
            let layout = flag.layout.clone();
            registry.register_collection(flag.name.clone(), move |source, _events| {
                let items = filter::filter(source, &patterns, &field, layout.as_deref());
                Ok(serde_json::to_value(items)?)
            });
        }

        let feed = options.clone();
        registry.register_collection("blog", move |source, _events| {
            let pages = blog::build(source, &feed);
            Ok(serde_json::to_value(pages)?)
        });

        for taxonomy in &config.taxonomies {
            let patterns = options.patterns.clone();
            let extractor = Extractor::field(taxonomy.field.as_str());
            let default = taxonomy.default.clone();
            let prefix = join_url(&config.blog_root, &taxonomy.name);
            let page_size = config.items_per_page;
            registry.register_collection(taxonomy.name.clone(), move |source, events| {
                let source = &*source;
                let posts = resolve(source, &select_published(source, &patterns));
                let grouping = group(&posts, &extractor, default.as_deref());
                for skip in grouping.skipped {
                    emit(
                        events,
                        BuildEvent::LabelSkipped {
                            url: skip.url,
                            field: extractor.describe().to_string(),
                            label: skip.label,
                        },
                    );
                }
                emit(
                    events,
                    BuildEvent::TaxonomyGrouped {
                        field: extractor.describe().to_string(),
                        groups: grouping.groups.len(),
                    },
                );
                let pages = paginate_groups(grouping.groups, &prefix, page_size);
                Ok(serde_json::to_value(pages)?)
            });
        }

        let patterns = options.patterns.clone();
        let blog_root = config.blog_root.clone();
        let page_size = config.items_per_page;
        registry.register_collection("calendar", move |source, events| {
            let source = &*source;
            let posts = resolve(source, &select_published(source, &patterns));
            let calendar = calendar::build(&posts, &blog_root, page_size);
            for skip in calendar.skipped {
                emit(
                    events,
                    BuildEvent::CalendarSkipped {
                        url: skip.url,
                        slug: skip.slug,
                        reason: skip.reason,
                    },
                );
            }
            Ok(serde_json::to_value(calendar.pages)?)
        });

        registry.register_filter("blog_top", helpers::top);
        registry.register_filter("blog_slug", helpers::slug);
        registry.register_filter("blog_dateformat", helpers::dateformat);
        registry.register_filter("blog_first", helpers::first);
        registry.register_filter("blog_breadcrumbs", helpers::breadcrumbs);
        registry.register_filter("blog_flatten", helpers::flatten);
        registry.register_filter("blog_keys", helpers::keys);
        registry.register_filter("blog_field", helpers::field);

        Ok(registry)
    }
}

/// Built collections by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Views(BTreeMap<String, Value>);

impl Views {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// URLs of the entries in one view, in view order.
    pub fn urls(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(|e| e["url"].as_str()).collect())
            .unwrap_or_default()
    }

    /// Breadcrumb trail for `url` across every list-shaped view.
    pub fn breadcrumbs(&self, url: &str) -> Vec<String> {
        let lists: Vec<&[Value]> = self
            .0
            .values()
            .filter_map(|view| view.as_array().map(Vec::as_slice))
            .collect();
        nav::breadcrumbs(&lists, url)
    }
}

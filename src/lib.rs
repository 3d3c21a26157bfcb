//! # Chronicle
//!
//! Taxonomy, calendar and pagination collections for static blog builds.
//! The host pipeline owns the content items; Chronicle selects, groups and
//! pages them into named views that templates render.
//!
//! # Architecture: Collections Over Host Content
//!
//! ```text
//! host items ──select──▶ blog posts ──annotate──▶ feed ──paginate──▶ blog, blog/page-2, …
//!                              │
//!                              ├──group by field──▶ blog/tag/rust, blog/category/notes, …
//!                              └──group by date───▶ blog/2024, blog/2024/01, …
//! ```
//!
//! Each collection is a builder registered on a [`registry::Registry`]. A
//! build runs the builders in order over one [`content::ContentSource`] and
//! returns [`registry::Views`]: one JSON value per collection name, the shape
//! templates receive.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`slug`] | Label → URL-safe slug normalization |
//! | [`types`] | `ContentItem`, `TaxonomyGroup`, `Page` and metadata accessors |
//! | [`content`] | Host content access: `ContentSource`, glob `PatternSet`, JSON manifests |
//! | [`group`] | Group items by a field or extractor into sorted taxonomy groups |
//! | [`paginate`] | Split sequences into pages with navigation slugs |
//! | [`blog`] | The blog feed: ordering, sibling and parent links, pagination |
//! | [`calendar`] | Year and month archive pages |
//! | [`filter`] | Flat collections of items with a boolean flag |
//! | [`nav`] | Cross-collection URL index and breadcrumb trails |
//! | [`helpers`] | Template helper transforms over built views |
//! | [`registry`] | Collection and filter registration, build runs, build events |
//! | [`config`] | `chronicle.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Annotations Live on Host Items
//!
//! The blog feed writes `layout`, `categories`, `blog.parent` and `siblings`
//! into each post's metadata in place. Collections hold references to host
//! items, never copies, so every view built after the feed sees the same
//! annotated post. Selection works on positions into the host's item list;
//! a mutating pass runs first, then the positions are resolved into
//! borrowed items for grouping and pagination.
//!
//! ## Configuration Is Passed, Not Remembered
//!
//! Every collection builder captures the [`config::BlogConfig`] values it
//! needs when it is registered. There is no process-wide "last options"
//! record; two registries with different configs never affect each other.
//!
//! ## URL Layout
//!
//! URLs carry no leading slash and are joined with exactly one `/`:
//!
//! ```text
//! blog                 feed, page 1
//! blog/page-2          feed, page 2
//! blog/tag/rust        taxonomy "tag", group "rust"
//! blog/2024            calendar year
//! blog/2024/01         calendar month
//! ```
//!
//! A post's `blog.parent` is its month page, a month's parent is its year,
//! and a year's parent is the feed, so breadcrumb walks climb
//! post → month → year → feed.
//!
//! ## Skips Are Reported, Not Fatal
//!
//! A post whose date key does not parse is left out of the calendar; a label
//! with nothing left after slug normalization is left out of its taxonomy.
//! Both surface as [`registry::BuildEvent`]s. Only configuration errors and
//! serialization failures abort a build.

pub mod blog;
pub mod calendar;
pub mod config;
pub mod content;
pub mod filter;
pub mod group;
pub mod helpers;
pub mod nav;
pub mod output;
pub mod paginate;
pub mod registry;
pub mod slug;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

//! End-to-end build over a manifest on disk, through the default registry.

use chronicle::config::{CONFIG_FILE, load_config};
use chronicle::content::ContentSet;
use chronicle::registry::{BuildEvent, Registry};
use serde_json::{Value, json};
use std::fs;
use std::sync::mpsc;
use tempfile::TempDir;

const MANIFEST: &str = r#"[
  { "input_path": "blog/first.md", "url": "/blog/first/", "date": "2023-11-02",
    "data": { "title": "First", "tags": ["Rust", "Web Design"] } },
  { "input_path": "blog/second.md", "url": "/blog/second/", "date": "2023-12-24",
    "data": { "title": "Second", "tags": "rust", "categories": ["Notes"], "featured": true } },
  { "input_path": "blog/third.md", "url": "/blog/third/", "date": "2024-01-15",
    "data": { "title": "Third", "tags": ["web-design"], "created": "2024-01-10T09:00:00Z" } },
  { "input_path": "blog/hidden.md", "url": "/blog/hidden/", "date": "2024-01-20",
    "data": { "title": "Hidden", "tags": ["Rust"], "draft": true } },
  { "input_path": "about.md", "url": "/about/", "date": "2020-01-01",
    "data": { "title": "About", "page": true } }
]"#;

const CONFIG: &str = r#"
blog = ["blog/*.md"]
all = ["**/*.md"]
items_per_page = 2
post_layout = "post.njk"
default_category = "misc"

[[taxonomies]]
field = "tags"
name = "tag"

[[taxonomies]]
field = "categories"
name = "category"

[[flags]]
field = "page"
name = "pages"
layout = "page.njk"

[[flags]]
field = "featured"
name = "featured"
"#;

fn setup() -> (TempDir, ContentSet) {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(CONFIG_FILE), CONFIG).unwrap();
    let manifest = tmp.path().join("manifest.json");
    fs::write(&manifest, MANIFEST).unwrap();
    let content = ContentSet::load(&manifest).unwrap();
    (tmp, content)
}

fn urls(view: &Value) -> Vec<&str> {
    view.as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["url"].as_str().unwrap())
        .collect()
}

#[test]
fn full_build_produces_linked_collections() {
    let (tmp, mut content) = setup();
    let config = load_config(tmp.path()).unwrap();
    let registry = Registry::with_defaults(&config).unwrap();

    let (tx, rx) = mpsc::channel();
    let views = registry.build(&mut content, Some(&tx)).unwrap();
    drop(tx);
    let events: Vec<BuildEvent> = rx.iter().collect();

    // Feed: newest first, two per page, drafts excluded.
    let blog = views.get("blog").unwrap();
    assert_eq!(urls(blog), vec!["blog", "blog/page-2"]);
    assert_eq!(blog[0]["count"], 3);
    assert_eq!(blog[0]["total"], 2);
    assert_eq!(blog[0]["slugs"]["next"], "blog/page-2");
    assert_eq!(blog[1]["slugs"]["previous"], "blog");
    assert_eq!(blog[0]["items"][0]["url"], "/blog/third/");
    assert_eq!(blog[1]["items"][0]["url"], "/blog/first/");

    // Post annotations.
    let third = &blog[0]["items"][0]["data"];
    assert_eq!(third["layout"], "post.njk");
    assert_eq!(third["categories"], json!(["misc"]));
    assert_eq!(third["blog"]["parent"], "blog/2024/01");
    assert_eq!(third["siblings"]["previous"], Value::Null);
    assert_eq!(third["siblings"]["next"]["url"], "/blog/second/");

    // Taxonomies in host order, with labels collapsed by slug.
    let tags = views.get("tag").unwrap();
    assert_eq!(urls(tags), vec!["blog/tag/rust", "blog/tag/web-design"]);
    assert_eq!(tags[0]["title"], "Rust");
    assert_eq!(tags[0]["items"][0]["url"], "/blog/first/");
    assert_eq!(tags[1]["title"], "Web Design");
    assert_eq!(tags[0]["count"], 2);
    assert_eq!(tags[1]["count"], 2);

    let categories = views.get("category").unwrap();
    assert_eq!(urls(categories), vec!["blog/category/misc", "blog/category/notes"]);

    // Calendar: years before their months.
    let calendar = views.get("calendar").unwrap();
    assert_eq!(
        urls(calendar),
        vec!["blog/2023", "blog/2023/11", "blog/2023/12", "blog/2024", "blog/2024/01"]
    );
    assert_eq!(calendar[0]["count"], 2);
    assert_eq!(calendar[4]["type"], "month");
    assert_eq!(calendar[4]["shortTitle"], "January");
    assert_eq!(calendar[4]["title"], "January 2024");

    // Flags select from the blog patterns only.
    assert!(urls(views.get("pages").unwrap()).is_empty());
    assert_eq!(urls(views.get("featured").unwrap()), vec!["/blog/second/"]);

    assert!(events.contains(&BuildEvent::TaxonomyGrouped {
        field: "tags".into(),
        groups: 2,
    }));
    assert!(events.contains(&BuildEvent::CollectionBuilt {
        name: "calendar".into(),
        pages: 5,
    }));
}

#[test]
fn breadcrumbs_climb_post_month_year_feed() {
    let (tmp, mut content) = setup();
    let config = load_config(tmp.path()).unwrap();
    let registry = Registry::with_defaults(&config).unwrap();
    let views = registry.build(&mut content, None).unwrap();

    assert_eq!(
        views.breadcrumbs("/blog/second/"),
        vec!["/blog/second/", "blog/2023/12", "blog/2023", "blog"]
    );

    let trail = registry
        .apply_filter(
            "blog_breadcrumbs",
            &[
                views.get("blog_flat").unwrap().clone(),
                views.get("calendar").unwrap().clone(),
                views.get("blog").unwrap().clone(),
                json!("/blog/first/"),
            ],
            None,
        )
        .unwrap();
    assert_eq!(
        trail,
        json!(["/blog/first/", "blog/2023/11", "blog/2023", "blog"])
    );
}

#[test]
fn helpers_work_on_built_views() {
    let (tmp, mut content) = setup();
    let config = load_config(tmp.path()).unwrap();
    let registry = Registry::with_defaults(&config).unwrap();
    let views = registry.build(&mut content, None).unwrap();

    let top = registry
        .apply_filter("blog_top", &[views.get("blog").unwrap().clone(), json!(1)], None)
        .unwrap();
    assert_eq!(top[0]["url"], "/blog/third/");
    assert_eq!(top.as_array().unwrap().len(), 1);

    let firsts = registry
        .apply_filter("blog_first", &[views.get("tag").unwrap().clone()], None)
        .unwrap();
    assert_eq!(firsts.as_array().unwrap().len(), 2);

    let date = registry
        .apply_filter("blog_dateformat", &[json!("2024-01-10T09:00:00Z"), json!("%d %b %Y")], None)
        .unwrap();
    assert_eq!(date, json!("10 Jan 2024"));

    let flattened = registry
        .apply_filter(
            "blog_flatten",
            &[json!([
                views.get("blog_flat").unwrap().clone(),
                views.get("all").unwrap().clone(),
            ])],
            None,
        )
        .unwrap();
    assert_eq!(
        urls(&flattened),
        vec!["/about/", "/blog/first/", "/blog/second/", "/blog/third/"]
    );
}

#[test]
fn drafts_stay_out_of_every_collection() {
    let (tmp, mut content) = setup();
    let config = load_config(tmp.path()).unwrap();
    let registry = Registry::with_defaults(&config).unwrap();
    let views = registry.build(&mut content, None).unwrap();

    let serialized = serde_json::to_string(&views).unwrap();
    assert!(!serialized.contains("/blog/hidden/"));
}

#[test]
fn views_serialize_as_a_name_keyed_object() {
    let (tmp, mut content) = setup();
    let config = load_config(tmp.path()).unwrap();
    let registry = Registry::with_defaults(&config).unwrap();
    let views = registry.build(&mut content, None).unwrap();

    let value = serde_json::to_value(&views).unwrap();
    let mut names: Vec<&String> = value.as_object().unwrap().keys().collect();
    names.sort();
    assert_eq!(
        names,
        vec!["all", "blog", "blog_flat", "calendar", "category", "featured", "pages", "tag"]
    );
}

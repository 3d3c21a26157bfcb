//! Template helper transforms.
//!
//! Helpers work on the JSON views a build produces, the same shape templates
//! receive. They are registered under these names by
//! [`Registry::with_defaults`](crate::registry::Registry::with_defaults):
//!
//! | Name | Arguments | Result |
//! |------|-----------|--------|
//! | `blog_top` | pages, limit | first `limit` items of the first page |
//! | `blog_first` | pages | pages with `pagenumber == 0` |
//! | `blog_slug` | label | slug |
//! | `blog_dateformat` | date, strftime format | formatted date |
//! | `blog_breadcrumbs` | collection..., url | URL trail up to the root |
//! | `blog_flatten` | list of lists | URL-deduplicated, URL-sorted list |
//! | `blog_keys` | object | its keys |
//! | `blog_field` | value, dotted path | nested value or `null` |
//!
//! A malformed argument to `blog_flatten` yields `null` and a
//! [`BuildEvent::FlattenRejected`] rather than an error, so one bad template
//! call does not fail a render.

use crate::nav;
use crate::registry::{BuildEvent, emit};
use crate::slug::slugify;
use chrono::{NaiveDate, NaiveTime};
use chrono::format::{Item, StrftimeItems};
use serde_json::Value;
use std::fmt::Write;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),
    #[error("Filter {name} expects {expected} argument(s), got {got}")]
    Arity {
        name: &'static str,
        expected: &'static str,
        got: usize,
    },
    #[error("Filter {name}: {message}")]
    Argument { name: &'static str, message: String },
}

pub type FilterResult = Result<Value, FilterError>;

fn arity(name: &'static str, args: &[Value], expected: usize) -> Result<(), FilterError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(FilterError::Arity {
            name,
            expected: match expected {
                1 => "1",
                2 => "2",
                _ => "more",
            },
            got: args.len(),
        })
    }
}

fn string_arg<'v>(name: &'static str, value: &'v Value) -> Result<&'v str, FilterError> {
    value.as_str().ok_or_else(|| FilterError::Argument {
        name,
        message: format!("expected a string, got {value}"),
    })
}

/// First `limit` items of the first page, `null` when there is no first page.
pub fn top(args: &[Value], _events: Option<&Sender<BuildEvent>>) -> FilterResult {
    arity("blog_top", args, 2)?;
    let limit = args[1].as_u64().ok_or_else(|| FilterError::Argument {
        name: "blog_top",
        message: format!("limit must be a non-negative integer, got {}", args[1]),
    })? as usize;
    let items = args[0]
        .get(0)
        .and_then(|page| page.get("items"))
        .and_then(Value::as_array);
    Ok(match items {
        Some(items) => Value::Array(items.iter().take(limit).cloned().collect()),
        None => Value::Null,
    })
}

/// Only the first page of every paginated sequence.
pub fn first(args: &[Value], _events: Option<&Sender<BuildEvent>>) -> FilterResult {
    arity("blog_first", args, 1)?;
    let pages = args[0].as_array().ok_or_else(|| FilterError::Argument {
        name: "blog_first",
        message: "expected a list of pages".into(),
    })?;
    Ok(Value::Array(
        pages
            .iter()
            .filter(|page| page.get("pagenumber").and_then(Value::as_u64) == Some(0))
            .cloned()
            .collect(),
    ))
}

pub fn slug(args: &[Value], _events: Option<&Sender<BuildEvent>>) -> FilterResult {
    arity("blog_slug", args, 1)?;
    Ok(Value::String(slugify(string_arg("blog_slug", &args[0])?)))
}

/// Format a `YYYY-MM-DD...` date with a chrono strftime string.
pub fn dateformat(args: &[Value], _events: Option<&Sender<BuildEvent>>) -> FilterResult {
    arity("blog_dateformat", args, 2)?;
    let raw = string_arg("blog_dateformat", &args[0])?;
    let format = string_arg("blog_dateformat", &args[1])?;

    let head: String = raw.chars().take(10).collect();
    let date = NaiveDate::parse_from_str(&head, "%Y-%m-%d").map_err(|e| FilterError::Argument {
        name: "blog_dateformat",
        message: format!("invalid date '{raw}': {e}"),
    })?;

    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(FilterError::Argument {
            name: "blog_dateformat",
            message: format!("invalid format '{format}'"),
        });
    }
    let mut formatted = String::new();
    write!(
        formatted,
        "{}",
        date.and_time(NaiveTime::MIN).format_with_items(items.into_iter())
    )
    .map_err(|_| FilterError::Argument {
        name: "blog_dateformat",
        message: format!("format '{format}' needs more than a date and time"),
    })?;
    Ok(Value::String(formatted))
}

/// Breadcrumb trail: every argument but the last is a collection, the last is the URL.
pub fn breadcrumbs(args: &[Value], _events: Option<&Sender<BuildEvent>>) -> FilterResult {
    let Some((target, collections)) = args.split_last() else {
        return Err(FilterError::Arity {
            name: "blog_breadcrumbs",
            expected: "more",
            got: 0,
        });
    };
    let target = string_arg("blog_breadcrumbs", target)?;
    let lists: Vec<&[Value]> = collections
        .iter()
        .filter_map(|c| c.as_array().map(Vec::as_slice))
        .collect();
    let trail = nav::breadcrumbs(&lists, target);
    Ok(Value::Array(trail.into_iter().map(Value::String).collect()))
}

/// Merge a list of lists into one URL-deduplicated, URL-sorted list.
pub fn flatten(args: &[Value], events: Option<&Sender<BuildEvent>>) -> FilterResult {
    arity("blog_flatten", args, 1)?;
    match flatten_lists(&args[0]) {
        Ok(merged) => Ok(merged),
        Err(reason) => {
            emit(events, BuildEvent::FlattenRejected { reason });
            Ok(Value::Null)
        }
    }
}

fn flatten_lists(value: &Value) -> Result<Value, String> {
    let outer = value
        .as_array()
        .ok_or_else(|| format!("expected a list of lists, got {}", kind(value)))?;
    let mut lists: Vec<&[Value]> = Vec::with_capacity(outer.len());
    for (i, inner) in outer.iter().enumerate() {
        let inner = inner
            .as_array()
            .ok_or_else(|| format!("entry {i} is {}, not a list", kind(inner)))?;
        lists.push(inner);
    }
    let pool = nav::flatten(&lists);
    Ok(Value::Array(pool.into_iter().cloned().collect()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

pub fn keys(args: &[Value], _events: Option<&Sender<BuildEvent>>) -> FilterResult {
    arity("blog_keys", args, 1)?;
    Ok(match &args[0] {
        Value::Object(map) => Value::Array(map.keys().cloned().map(Value::String).collect()),
        _ => Value::Array(Vec::new()),
    })
}

/// `value.a.b` lookup for a dotted path; `null` when any step is missing.
pub fn field(args: &[Value], _events: Option<&Sender<BuildEvent>>) -> FilterResult {
    arity("blog_field", args, 2)?;
    let path = string_arg("blog_field", &args[1])?;
    let found = path
        .split('.')
        .filter(|step| !step.is_empty())
        .try_fold(&args[0], |value, step| match value {
            Value::Array(list) => step.parse::<usize>().ok().and_then(|i| list.get(i)),
            _ => value.get(step),
        });
    Ok(found.cloned().unwrap_or(Value::Null))
}

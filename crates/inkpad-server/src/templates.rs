//! Embedded Tera templates and the filters registered on them.
//!
//! Templates are compiled into the binary with `include_str!` and parsed
//! once at startup, so a missing or malformed template stops the server
//! before it binds instead of failing a request later.

use crate::api::ApiError;
use axum::response::Html;
use chrono::{DateTime, NaiveDateTime};
use std::collections::HashMap;
use std::fmt::Write as _;
use tera::{Context, Tera, Value};
use thiserror::Error;

/// Pattern used by `deformat` when no `format` argument is given.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%d-%m %H:%M";

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("blog_detail.html", include_str!("../templates/blog_detail.html")),
    ("class1.html", include_str!("../templates/class1.html")),
    ("filter.html", include_str!("../templates/filter.html")),
    ("control.html", include_str!("../templates/control.html")),
    ("child1.html", include_str!("../templates/child1.html")),
    ("child2.html", include_str!("../templates/child2.html")),
    ("static.html", include_str!("../templates/static.html")),
    ("register.html", include_str!("../templates/register.html")),
];

/// Errors raised while preparing the template set.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to load templates: {0}")]
    Load(#[from] tera::Error),
}

/// Parses every embedded template and registers the custom filters.
///
/// # Errors
///
/// Returns `TemplateError::Load` if a template fails to parse or extends a
/// template that does not exist.
pub fn load_templates() -> Result<Tera, TemplateError> {
    let mut tera = Tera::default();
    // Added together so `{% extends %}` chains resolve in one pass.
    tera.add_raw_templates(TEMPLATES.iter().copied())?;
    tera.register_filter("deformat", datetime_format);
    tracing::debug!(count = TEMPLATES.len(), "templates loaded");
    Ok(tera)
}

/// Renders `name` with `context` into an HTML response body.
pub fn render(tera: &Tera, name: &str, context: &Context) -> Result<Html<String>, ApiError> {
    tera.render(name, context)
        .map(Html)
        .map_err(|e| ApiError::InternalServerError(format!("failed to render {name}: {e}")))
}

fn parse_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.naive_local())
            .ok()
            .or_else(|| s.parse::<NaiveDateTime>().ok())
            .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}

/// Tera filter `deformat`: formats a datetime with a strftime pattern.
///
/// Accepts RFC 3339 strings, naive ISO 8601 strings (the serde form of
/// `NaiveDateTime`), `YYYY-MM-DD HH:MM:SS` strings, and Unix timestamps in
/// seconds. The pattern comes from the `format` argument and defaults to
/// [`DEFAULT_DATETIME_FORMAT`].
///
/// ```tera
/// {{ mytime | deformat }}
/// {{ mytime | deformat(format="%H:%M") }}
/// ```
pub fn datetime_format(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let datetime = parse_datetime(value)
        .ok_or_else(|| tera::Error::msg(format!("deformat cannot read {value} as a datetime")))?;

    let pattern = match args.get("format") {
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(tera::Error::msg(format!(
                "deformat expects a string `format`, got {other}"
            )))
        }
        None => DEFAULT_DATETIME_FORMAT,
    };

    let mut out = String::new();
    write!(out, "{}", datetime.format(pattern))
        .map_err(|_| tera::Error::msg(format!("invalid datetime format: {pattern}")))?;
    Ok(Value::String(out))
}

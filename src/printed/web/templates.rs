//! # Web Templates
//!
//! Pages are minijinja templates compiled into the binary. Each page has a
//! full template (`<page>.html`) that extends `base.html`, and may have
//! fragments named `<page>.<target>.html`. When a request carries an
//! `HX-Target` header and a matching fragment exists, only the fragment is
//! rendered.
//!
//! Formatting lives in filters so templates receive raw numbers and ISO text:
//!
//! - `cost`: `2.5` -> `$2.50`, using the configured symbol
//! - `weight`: one decimal
//! - `duration`: ISO duration without the `PT` marker, empty for zero
//! - `title`: `tall_vase` -> `Tall Vase`
//! - `relative_datetime`: `3 days ago`, `N/A` when missing
//! - `format_datetime`: the timestamp in the configured timezone

use crate::config::DisplayConfig;
use crate::format::{
    format_cost, format_datetime, format_duration, format_title, format_weight,
    parse_iso_duration, parse_timestamp, relative_datetime,
};
use minijinja::Environment;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("templates/base.html")),
    ("index.html", include_str!("templates/index.html")),
    ("index.prints.html", include_str!("templates/index.prints.html")),
    ("material.html", include_str!("templates/material.html")),
    ("print.html", include_str!("templates/print.html")),
    ("print.history.html", include_str!("templates/print.history.html")),
];

pub fn environment(display: &DisplayConfig) -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    for &(name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }

    let symbol = display.cost_symbol.clone();
    env.add_filter("cost", move |value: f64| format_cost(value, &symbol));
    env.add_filter("weight", format_weight);
    env.add_filter("duration", |value: String| {
        parse_iso_duration(&value)
            .map(|d| format_duration(&d))
            .unwrap_or(value)
    });
    env.add_filter("title", |value: String| format_title(&value));
    env.add_filter("relative_datetime", |value: Option<String>| {
        let parsed = value.as_deref().and_then(|v| parse_timestamp(v).ok());
        relative_datetime(parsed.as_ref())
    });
    let timezone = display.timezone;
    env.add_filter("format_datetime", move |value: Option<String>| {
        let parsed = value.as_deref().and_then(|v| parse_timestamp(v).ok());
        format_datetime(parsed.as_ref(), &timezone)
    });

    Ok(env)
}

/// `page.html`, or `page.<target>.html` when that fragment exists.
pub fn template_name(env: &Environment<'_>, page: &str, target: Option<&str>) -> String {
    if let Some(target) = target.filter(|t| !t.is_empty()) {
        let fragment = format!("{}.{}.html", page, target);
        if env.get_template(&fragment).is_ok() {
            return fragment;
        }
    }
    format!("{}.html", page)
}

//! Named extraction strategies tried in priority order for each field

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::page::Page;

static OUT_OF_FIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*out\s*of\s*5").unwrap()
});

/// How specific a strategy is. Earlier tiers are more trustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// JSON-LD and script-embedded state
    Structured,
    /// Platform specific ids and classes
    Landmark,
    /// Title tag and generic meta tags
    Metadata,
}

/// Which strategies an extraction pass may consult
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Full,
    MetadataOnly,
}

impl Pass {
    pub fn admits(self, tier: Tier) -> bool {
        match self {
            Self::Full => true,
            Self::MetadataOnly => tier == Tier::Metadata,
        }
    }
}

/// Product fields readable from JSON-LD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLdField {
    Name,
    Description,
    Image,
    Brand,
    Price,
    Rating,
}

impl JsonLdField {
    fn read(self, product: &Value) -> Option<String> {
        match self {
            Self::Name => scalar(product.get("name")?),
            Self::Description => scalar(product.get("description")?),
            Self::Image => match product.get("image")? {
                Value::Array(images) => images.iter().find_map(image_url),
                image => image_url(image),
            },
            Self::Brand => match product.get("brand")? {
                Value::Object(brand) => scalar(brand.get("name")?),
                brand => scalar(brand),
            },
            Self::Price => match product.get("offers")? {
                Value::Array(offers) => offers.iter().find_map(offer_price),
                offer => offer_price(offer),
            },
            Self::Rating => scalar(product.get("aggregateRating")?.get("ratingValue")?),
        }
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::Object(image) => scalar(image.get("url")?),
        other => scalar(other),
    }
}

fn offer_price(offer: &Value) -> Option<String> {
    ["price", "lowPrice"]
        .iter()
        .find_map(|key| offer.get(*key).and_then(scalar))
}

/// One heuristic for pulling a raw field value out of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    JsonLd(JsonLdField),
    /// Key inside `window.runParams` / `window.pageData`
    ScriptState(&'static str),
    /// Text of the first matching element
    Text(&'static str),
    /// Attribute of the first matching element
    Attr(&'static str, &'static str),
    /// `<meta>` content by property or name
    Meta(&'static str),
    TitleTag,
    /// "4.5 out of 5" anywhere in the markup
    OutOfFive,
}

impl Strategy {
    pub const fn tier(self) -> Tier {
        match self {
            Self::JsonLd(_) | Self::ScriptState(_) => Tier::Structured,
            Self::Text(_) | Self::Attr(..) | Self::OutOfFive => Tier::Landmark,
            Self::Meta(_) | Self::TitleTag => Tier::Metadata,
        }
    }

    /// Raw, unnormalized value, if this strategy finds one
    pub fn attempt(self, page: &Page<'_>) -> Option<String> {
        match self {
            Self::JsonLd(field) => page.json_ld_products().iter().find_map(|p| field.read(p)),
            Self::ScriptState(key) => page.script_state(key),
            Self::Text(css) => page.text_of(css),
            Self::Attr(css, attr) => page.attr_of(css, attr),
            Self::Meta(key) => page.meta(key),
            Self::TitleTag => page.title(),
            Self::OutOfFive => OUT_OF_FIVE
                .captures(page.raw())
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonLd(field) => write!(f, "json-ld {field:?}"),
            Self::ScriptState(key) => write!(f, "script state \"{key}\""),
            Self::Text(css) => write!(f, "text {css}"),
            Self::Attr(css, attr) => write!(f, "{css}[{attr}]"),
            Self::Meta(key) => write!(f, "meta {key}"),
            Self::TitleTag => f.write_str("title tag"),
            Self::OutOfFive => f.write_str("\"out of 5\" phrase"),
        }
    }
}

/// A candidate value paired with the strategy that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionAttempt<T> {
    pub value: T,
    pub strategy: Strategy,
}

/// Tries `strategies` in order and keeps the first raw value that `accept`
/// turns into a usable one. Later strategies are never consulted.
pub fn first_accepted<T>(
    strategies: &[Strategy],
    page: &Page<'_>,
    pass: Pass,
    accept: impl Fn(&str) -> Option<T>,
) -> Option<ExtractionAttempt<T>> {
    strategies
        .iter()
        .filter(|strategy| pass.admits(strategy.tier()))
        .find_map(|&strategy| {
            let raw = strategy.attempt(page)?;
            accept(&raw).map(|value| ExtractionAttempt { value, strategy })
        })
}

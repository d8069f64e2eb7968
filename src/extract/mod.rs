//! Field extraction from fetched product pages

pub mod normalize;
mod page;
pub mod profile;
pub mod strategy;

use std::fmt::Debug;

use tracing::debug;
use url::Url;

use crate::models::{Platform, ProductRecord};
use normalize::{clean_description, clean_text, parse_price, parse_rating};
use profile::{PLACEHOLDER_IMAGE, PlatformProfile, profile, tidy_brand};
use strategy::{ExtractionAttempt, Pass, first_accepted};

pub use page::Page;

/// Builds a record from `html` using the strategies `pass` allows.
///
/// Fields that no strategy can read get the platform's placeholder values;
/// a missing name or description therefore yields a record the validator
/// rejects. A missing price is replaced by a synthetic one, and the page's
/// original price is then dropped so no discount is derived from it. The
/// discount is left for the caller to derive.
pub fn extract_record(html: &str, page_url: &Url, platform: Platform, pass: Pass) -> ProductRecord {
    let page = Page::parse(html);
    let profile = profile(platform);

    let name = first_accepted(profile.name, &page, pass, |raw| accept_name(profile, raw));
    let price = first_accepted(profile.price, &page, pass, parse_price);
    let original_price = first_accepted(profile.original_price, &page, pass, parse_price);
    let image = first_accepted(profile.image, &page, pass, |raw| resolve_image(page_url, raw));
    let description = first_accepted(profile.description, &page, pass, accept_description);
    let brand = first_accepted(profile.brand, &page, pass, accept_brand);
    let rating = first_accepted(profile.rating, &page, pass, parse_rating);

    trace_field("name", &name);
    trace_field("price", &price);
    trace_field("original price", &original_price);
    trace_field("image", &image);
    trace_field("description", &description);
    trace_field("brand", &brand);
    trace_field("rating", &rating);

    let (price, original_price) = match price {
        Some(attempt) => (attempt.value, original_price.map(|a| a.value)),
        None => (profile.synthetic_price(), None),
    };

    ProductRecord {
        name: name.map_or_else(|| profile.placeholder_name.to_string(), |a| a.value),
        price,
        original_price,
        image_url: image.map_or_else(|| PLACEHOLDER_IMAGE.to_string(), |a| a.value),
        description: description
            .map_or_else(|| profile.placeholder_description.to_string(), |a| a.value),
        category: profile.category.to_string(),
        platform,
        rating: rating.map(|a| a.value),
        brand: brand.map(|a| a.value),
        discount: None,
    }
}

fn trace_field<T: Debug>(field: &str, attempt: &Option<ExtractionAttempt<T>>) {
    match attempt {
        Some(attempt) => debug!("{} = {:?} via {}", field, attempt.value, attempt.strategy),
        None => debug!("{} not found", field),
    }
}

fn accept_name(profile: &PlatformProfile, raw: &str) -> Option<String> {
    let name = profile.tidy_name(&clean_text(raw));
    (!name.is_empty()).then_some(name)
}

fn accept_description(raw: &str) -> Option<String> {
    let description = clean_description(raw);
    (!description.is_empty()).then_some(description)
}

fn accept_brand(raw: &str) -> Option<String> {
    let brand = tidy_brand(&clean_text(raw));
    (!brand.is_empty()).then_some(brand)
}

/// Resolves protocol-relative and relative image paths against the page
fn resolve_image(page_url: &Url, raw: &str) -> Option<String> {
    let resolved = page_url.join(raw.trim()).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

//! Detection of templated or placeholder extraction results

use crate::extract::profile::{
    ALIEXPRESS_PLACEHOLDER_DESCRIPTION, ALIEXPRESS_PLACEHOLDER_NAME,
    AMAZON_PLACEHOLDER_DESCRIPTION, AMAZON_PLACEHOLDER_NAME, EBAY_PLACEHOLDER_DESCRIPTION,
    EBAY_PLACEHOLDER_NAME,
};
use crate::models::ProductRecord;

/// Names that never belong to a real product page
const GENERIC_NAMES: &[&str] = &[
    AMAZON_PLACEHOLDER_NAME,
    ALIEXPRESS_PLACEHOLDER_NAME,
    EBAY_PLACEHOLDER_NAME,
    "Amazon Product",
    "eBay Product",
    "Amazon.com",
    "AliExpress",
    "eBay",
    "Robot Check",
    "Access Denied",
    "Page Not Found",
];

/// Lowercase fragments marking a description as boilerplate
const BOILERPLATE_PHRASES: &[&str] = &[
    "enter the characters you see below",
    "make sure you're not a robot",
    "to discuss automated access to amazon data",
    "please slide to verify",
    "the page you requested could not be found",
];

/// Whether `record` looks like a placeholder rather than real page content.
///
/// A literal match against known strings: it misses unfamiliar templates and
/// costs only an extra fallback when it is wrong the other way.
pub fn is_generic(record: &ProductRecord) -> bool {
    let name = record.name.trim();
    if GENERIC_NAMES
        .iter()
        .any(|generic| generic.eq_ignore_ascii_case(name))
    {
        return true;
    }

    let description = record.description.to_lowercase();
    [
        AMAZON_PLACEHOLDER_DESCRIPTION,
        ALIEXPRESS_PLACEHOLDER_DESCRIPTION,
        EBAY_PLACEHOLDER_DESCRIPTION,
    ]
    .iter()
    .any(|placeholder| description == placeholder.to_lowercase())
        || BOILERPLATE_PHRASES
            .iter()
            .any(|phrase| description.contains(phrase))
}

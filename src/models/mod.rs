//! Data models for extracted products and their stored form

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::FetchError;

/// A marketplace an affiliate link can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Amazon,
    AliExpress,
    Ebay,
}

impl Platform {
    /// Every supported platform, in classification priority order
    pub const ALL: [Self; 3] = [Self::Amazon, Self::AliExpress, Self::Ebay];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amazon => "amazon",
            Self::AliExpress => "aliexpress",
            Self::Ebay => "ebay",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

/// A fully populated product candidate produced by the extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub image_url: String,
    pub description: String,
    pub category: String,
    pub platform: Platform,
    pub rating: Option<f64>,
    pub brand: Option<String>,
    pub discount: Option<u8>,
}

impl ProductRecord {
    /// Drops an original price below the current price and derives `discount`.
    #[must_use]
    pub fn with_discount(mut self) -> Self {
        self.original_price = self.original_price.filter(|original| *original >= self.price);
        self.discount = self
            .original_price
            .and_then(|original| discount_percent(self.price, original));
        self
    }
}

/// `round((original - price) / original * 100)`, or `None` when `original`
/// is not a usable reference price.
pub fn discount_percent(price: f64, original: f64) -> Option<u8> {
    if !(original > 0.0) || original < price {
        return None;
    }

    let percent = ((original - price) / original * 100.0).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = percent.clamp(0.0, 100.0) as u8;
    Some(percent)
}

/// Why the pipeline substituted synthetic data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Fetch(FetchError),
    Generic,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "fetch failed: {err}"),
            Self::Generic => f.write_str("extracted data looked generic"),
        }
    }
}

/// Where the values of a returned record came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    /// First pass over the fetched page was accepted
    Extracted,
    /// Only the page metadata pass produced trustworthy data
    MetadataRetry,
    /// The record is synthetic
    Fallback(FallbackReason),
}

impl RecordSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Extracted => "extracted",
            Self::MetadataRetry => "metadata",
            Self::Fallback(_) => "fallback",
        }
    }
}

/// Result of one orchestrator invocation
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: ProductRecord,
    pub source: RecordSource,
}

impl Extraction {
    pub const fn is_synthetic(&self) -> bool {
        matches!(self.source, RecordSource::Fallback(_))
    }
}

/// A product candidate once it has been given an identity for storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProduct {
    pub id: String,
    pub affiliate_link: String,
    pub source_product_id: Option<String>,
    pub data_source: String,
    pub is_new: bool,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: ProductRecord,
}

impl StoredProduct {
    pub fn new(
        record: ProductRecord,
        affiliate_link: &str,
        source_product_id: Option<String>,
        source: &RecordSource,
    ) -> Self {
        Self {
            id: product_id_for(affiliate_link),
            affiliate_link: affiliate_link.to_string(),
            source_product_id,
            data_source: source.as_str().to_string(),
            is_new: true,
            created_at: Utc::now(),
            record,
        }
    }
}

/// Stable identity for an affiliate link
pub fn product_id_for(affiliate_link: &str) -> String {
    format!("{:x}", md5::compute(affiliate_link))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: f64, original_price: Option<f64>) -> ProductRecord {
        ProductRecord {
            name: "Desk Lamp".to_string(),
            price,
            original_price,
            image_url: "https://img.example/lamp.jpg".to_string(),
            description: "A lamp".to_string(),
            category: "Home".to_string(),
            platform: Platform::Amazon,
            rating: None,
            brand: None,
            discount: None,
        }
    }

    #[test]
    fn discount_is_rounded_percentage() {
        assert_eq!(discount_percent(49.90, 79.90), Some(38));
        assert_eq!(discount_percent(89.99, 149.99), Some(40));
        assert_eq!(discount_percent(10.0, 10.0), Some(0));
    }

    #[test]
    fn original_below_price_is_dropped() {
        let product = record(50.0, Some(40.0)).with_discount();
        assert_eq!(product.original_price, None);
        assert_eq!(product.discount, None);

        let product = record(50.0, Some(100.0)).with_discount();
        assert_eq!(product.discount, Some(50));
    }

    #[test]
    fn platform_round_trips_through_strings() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>(), Ok(platform));
        }
        assert!("etsy".parse::<Platform>().is_err());
        assert_eq!(
            serde_json::to_string(&Platform::AliExpress).unwrap(),
            "\"aliexpress\""
        );
    }

    #[test]
    fn stored_product_identity_follows_link() {
        let a = StoredProduct::new(
            record(1.0, None),
            "https://www.amazon.com/dp/B000TEST01",
            None,
            &RecordSource::Extracted,
        );
        assert_eq!(a.id, product_id_for("https://www.amazon.com/dp/B000TEST01"));
        assert_eq!(a.data_source, "extracted");
        assert!(a.is_new);
    }
}

//! Per-platform strategy tables and placeholder values

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use super::normalize::round_price;
use super::strategy::{JsonLdField as Ld, Strategy};
use crate::models::Platform;

pub const AMAZON_PLACEHOLDER_NAME: &str = "Premium Amazon Product";
pub const ALIEXPRESS_PLACEHOLDER_NAME: &str = "AliExpress Product";
pub const EBAY_PLACEHOLDER_NAME: &str = "Quality eBay Product";

pub const AMAZON_PLACEHOLDER_DESCRIPTION: &str =
    "High-quality product from Amazon with excellent features and reliable performance.";
pub const ALIEXPRESS_PLACEHOLDER_DESCRIPTION: &str =
    "Quality AliExpress product with international shipping and buyer protection.";
pub const EBAY_PLACEHOLDER_DESCRIPTION: &str =
    "Quality product from eBay with reliable shipping and great value.";

pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400&h=400&fit=crop";

static AMAZON_TITLE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^amazon(?:\.[a-z]+)+\s*:\s*").unwrap());
static ALIEXPRESS_TITLE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*[-|]\s*aliexpress.*$").unwrap());
static EBAY_TITLE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\|.*ebay.*$").unwrap());
static BRAND_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:brand\s*:\s*|visit\s+the\s+)").unwrap());
static BRAND_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+store$").unwrap());

/// Static extraction configuration for one platform
#[derive(Debug)]
pub struct PlatformProfile {
    pub platform: Platform,
    pub name: &'static [Strategy],
    pub price: &'static [Strategy],
    pub original_price: &'static [Strategy],
    pub image: &'static [Strategy],
    pub description: &'static [Strategy],
    pub brand: &'static [Strategy],
    pub rating: &'static [Strategy],
    /// Used when no name strategy succeeds
    pub placeholder_name: &'static str,
    /// Used when no description strategy succeeds
    pub placeholder_description: &'static str,
    pub category: &'static str,
    /// Bounds for a synthetic price when none can be read
    pub price_band: (f64, f64),
}

static AMAZON: PlatformProfile = PlatformProfile {
    platform: Platform::Amazon,
    name: &[
        Strategy::JsonLd(Ld::Name),
        Strategy::Text("#productTitle"),
        Strategy::Text(r#"h1[data-automation-id="product-title"]"#),
        Strategy::Meta("og:title"),
        Strategy::TitleTag,
    ],
    price: &[
        Strategy::JsonLd(Ld::Price),
        Strategy::Text(".a-price-current .a-offscreen"),
        Strategy::Text(".a-price:not([data-a-strike]) .a-offscreen"),
        Strategy::Text("#priceblock_dealprice"),
        Strategy::Text("#priceblock_ourprice"),
        Strategy::Meta("product:price:amount"),
    ],
    original_price: &[
        Strategy::Text(".a-price[data-a-strike] .a-offscreen"),
        Strategy::Text(".a-text-price .a-offscreen"),
        Strategy::Text("#listPrice"),
        Strategy::Meta("product:original_price:amount"),
    ],
    image: &[
        Strategy::JsonLd(Ld::Image),
        Strategy::Attr("#landingImage", "data-old-hires"),
        Strategy::Attr("#landingImage", "src"),
        Strategy::Attr("#imgBlkFront", "src"),
        Strategy::Meta("og:image"),
    ],
    description: &[
        Strategy::JsonLd(Ld::Description),
        Strategy::Text("#feature-bullets ul"),
        Strategy::Text("#productDescription"),
        Strategy::Meta("og:description"),
        Strategy::Meta("description"),
    ],
    brand: &[
        Strategy::JsonLd(Ld::Brand),
        Strategy::Text("#bylineInfo"),
        Strategy::Meta("product:brand"),
    ],
    rating: &[Strategy::JsonLd(Ld::Rating), Strategy::OutOfFive],
    placeholder_name: AMAZON_PLACEHOLDER_NAME,
    placeholder_description: AMAZON_PLACEHOLDER_DESCRIPTION,
    category: "Electronics",
    price_band: (50.0, 250.0),
};

static ALIEXPRESS: PlatformProfile = PlatformProfile {
    platform: Platform::AliExpress,
    name: &[
        Strategy::JsonLd(Ld::Name),
        Strategy::ScriptState("subject"),
        Strategy::ScriptState("title"),
        Strategy::Text(r#"h1[data-pl="product-title"]"#),
        Strategy::Meta("og:title"),
        Strategy::TitleTag,
    ],
    price: &[
        Strategy::JsonLd(Ld::Price),
        Strategy::ScriptState("minAmount"),
        Strategy::ScriptState("price"),
        Strategy::Text(".product-price-current"),
        Strategy::Meta("product:price:amount"),
    ],
    original_price: &[
        Strategy::ScriptState("originalPrice"),
        Strategy::Text(".product-price-original"),
        Strategy::Meta("product:original_price:amount"),
    ],
    image: &[
        Strategy::JsonLd(Ld::Image),
        Strategy::ScriptState("imageUrl"),
        Strategy::Attr(".magnifier-image", "src"),
        Strategy::Meta("og:image"),
    ],
    description: &[
        Strategy::JsonLd(Ld::Description),
        Strategy::ScriptState("description"),
        Strategy::Meta("og:description"),
        Strategy::Meta("description"),
    ],
    brand: &[
        Strategy::JsonLd(Ld::Brand),
        Strategy::ScriptState("brandName"),
        Strategy::Meta("product:brand"),
    ],
    rating: &[
        Strategy::JsonLd(Ld::Rating),
        Strategy::ScriptState("averageStar"),
    ],
    placeholder_name: ALIEXPRESS_PLACEHOLDER_NAME,
    placeholder_description: ALIEXPRESS_PLACEHOLDER_DESCRIPTION,
    category: "Import",
    price_band: (20.0, 120.0),
};

static EBAY: PlatformProfile = PlatformProfile {
    platform: Platform::Ebay,
    name: &[
        Strategy::JsonLd(Ld::Name),
        Strategy::Text("h1#x-title-label-lbl"),
        Strategy::Text(".x-item-title-label h1"),
        Strategy::Text(".x-item-title__mainTitle"),
        Strategy::Meta("og:title"),
        Strategy::TitleTag,
    ],
    price: &[
        Strategy::JsonLd(Ld::Price),
        Strategy::Text("#prcIsum"),
        Strategy::Text(".x-price-primary"),
        Strategy::Meta("product:price:amount"),
    ],
    original_price: &[
        Strategy::Text(".x-additional-info__textual-display .ux-textspans--STRIKETHROUGH"),
        Strategy::Text("#orgPrc"),
        Strategy::Meta("product:original_price:amount"),
    ],
    image: &[
        Strategy::JsonLd(Ld::Image),
        Strategy::Attr("#icImg", "src"),
        Strategy::Attr(".ux-image-magnify img", "src"),
        Strategy::Meta("og:image"),
    ],
    description: &[
        Strategy::JsonLd(Ld::Description),
        Strategy::Meta("og:description"),
        Strategy::Meta("description"),
    ],
    brand: &[
        Strategy::JsonLd(Ld::Brand),
        Strategy::Text(".ux-labels-values--brand .ux-labels-values__values"),
        Strategy::Meta("product:brand"),
    ],
    rating: &[Strategy::JsonLd(Ld::Rating), Strategy::OutOfFive],
    placeholder_name: EBAY_PLACEHOLDER_NAME,
    placeholder_description: EBAY_PLACEHOLDER_DESCRIPTION,
    category: "General",
    price_band: (30.0, 180.0),
};

/// The read-only profile for `platform`
pub fn profile(platform: Platform) -> &'static PlatformProfile {
    match platform {
        Platform::Amazon => &AMAZON,
        Platform::AliExpress => &ALIEXPRESS,
        Platform::Ebay => &EBAY,
    }
}

impl PlatformProfile {
    /// Removes the storefront's own branding from a page title
    pub fn tidy_name(&self, name: &str) -> String {
        let tidied = match self.platform {
            Platform::Amazon => AMAZON_TITLE_PREFIX.replace(name, ""),
            Platform::AliExpress => ALIEXPRESS_TITLE_SUFFIX.replace(name, ""),
            Platform::Ebay => EBAY_TITLE_SUFFIX.replace(name, ""),
        };
        tidied.trim().to_string()
    }

    /// A plausible price inside this platform's band
    pub fn synthetic_price(&self) -> f64 {
        let (low, high) = self.price_band;
        round_price(rand::thread_rng().gen_range(low..high))
    }
}

/// Strips byline noise such as "Visit the Acme Store" or "Brand: Acme"
pub fn tidy_brand(brand: &str) -> String {
    let without_prefix = BRAND_PREFIX.replace(brand.trim(), "");
    BRAND_SUFFIX.replace(&without_prefix, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::strategy::Tier;

    #[test]
    fn profiles_match_their_platform() {
        for platform in Platform::ALL {
            let profile = profile(platform);
            assert_eq!(profile.platform, platform);
            assert!(profile.price_band.0 > 0.0 && profile.price_band.0 < profile.price_band.1);
        }
    }

    #[test]
    fn every_field_has_a_metadata_or_structured_strategy() {
        for platform in Platform::ALL {
            let p = profile(platform);
            for strategies in [p.name, p.price, p.image, p.description] {
                assert!(strategies.iter().any(|s| s.tier() == Tier::Metadata));
                assert!(strategies.windows(2).all(|w| w[0].tier() <= w[1].tier()));
            }
        }
    }

    #[test]
    fn tidies_storefront_titles() {
        assert_eq!(
            profile(Platform::Amazon).tidy_name("Amazon.com: Sony WH-1000XM4 Headphones"),
            "Sony WH-1000XM4 Headphones"
        );
        assert_eq!(
            profile(Platform::Ebay).tidy_name("Vintage Camera | eBay"),
            "Vintage Camera"
        );
        assert_eq!(
            profile(Platform::AliExpress).tidy_name("Gaming Mouse RGB - AliExpress 44"),
            "Gaming Mouse RGB"
        );
        assert_eq!(
            profile(Platform::Amazon).tidy_name("Amazon.com"),
            "Amazon.com"
        );
    }

    #[test]
    fn tidies_brand_bylines() {
        assert_eq!(tidy_brand("Visit the Sony Store"), "Sony");
        assert_eq!(tidy_brand("Brand: Anker"), "Anker");
        assert_eq!(tidy_brand("LightUp"), "LightUp");
    }

    #[test]
    fn synthetic_prices_stay_in_band() {
        for platform in Platform::ALL {
            let p = profile(platform);
            for _ in 0..50 {
                let price = p.synthetic_price();
                assert!(price >= p.price_band.0 && price <= p.price_band.1);
            }
        }
    }
}

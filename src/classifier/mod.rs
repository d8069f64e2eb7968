//! Platform detection and affiliate link inspection

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::InputError;
use crate::models::Platform;

/// Substrings identifying each platform, in priority order
const PLATFORM_MARKERS: [(Platform, &[&str]); 3] = [
    (Platform::Amazon, &["amazon.", "amzn."]),
    (Platform::AliExpress, &["aliexpress.", "ali.express"]),
    (Platform::Ebay, &["ebay."]),
];

static ASIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/(?:dp|gp/product)/([A-Z0-9]{10})").unwrap());
static ALIEXPRESS_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/item/(\d+)\.html").unwrap());
static EBAY_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/itm/(?:[^/?#]+/)?(\d+)").unwrap());

/// Maps a URL to the platform it most likely belongs to.
///
/// Total: anything that matches no marker is treated as Amazon, so callers
/// must not rely on the result reflecting the true source.
pub fn classify(url: &str) -> Platform {
    let lower = url.to_lowercase();

    PLATFORM_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|marker| lower.contains(marker)))
        .map_or(Platform::Amazon, |(platform, _)| *platform)
}

/// Platform named by the host alone, without the Amazon default
fn platform_for_host(url: &Url) -> Option<Platform> {
    let host = url.host_str()?.to_lowercase();

    PLATFORM_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|marker| host.contains(marker)))
        .map(|(platform, _)| *platform)
}

/// Validates caller input as an absolute http(s) URL.
///
/// # Errors
///
/// Returns an [`InputError`] when the text is not a URL the pipeline can fetch.
pub fn parse_affiliate_url(input: &str) -> Result<Url, InputError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed).map_err(|_| InputError::Malformed(trimmed.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(InputError::UnsupportedScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(InputError::MissingHost(trimmed.to_string()));
    }

    Ok(url)
}

/// Whether the URL points at a product page of a known platform
pub fn is_product_url(url: &Url) -> bool {
    let path = url.path();
    let patterns: &[&str] = match platform_for_host(url) {
        Some(Platform::Amazon) => &["/dp/", "/gp/product/", "/ASIN/"],
        Some(Platform::AliExpress) => &["/item/", "/store/product/"],
        Some(Platform::Ebay) => &["/itm/", "/p/"],
        None => return false,
    };

    patterns.iter().any(|pattern| path.contains(pattern))
}

/// Identifiers carried by an affiliate link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliateInfo {
    pub platform: Platform,
    pub product_id: Option<String>,
    pub affiliate_tag: Option<String>,
}

/// Pulls the marketplace product id and referral tag out of a link
pub fn affiliate_info(url: &Url) -> Option<AffiliateInfo> {
    let platform = platform_for_host(url)?;
    let (pattern, tag_param) = match platform {
        Platform::Amazon => (&ASIN, "tag"),
        Platform::AliExpress => (&ALIEXPRESS_ITEM, "aff_platform"),
        Platform::Ebay => (&EBAY_ITEM, "mkcid"),
    };

    let product_id = pattern
        .captures(url.path())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    let affiliate_tag = url
        .query_pairs()
        .find(|(key, _)| key == tag_param)
        .map(|(_, value)| value.into_owned());

    Some(AffiliateInfo {
        platform,
        product_id,
        affiliate_tag,
    })
}

//! Extraction pipeline entry point: classify, fetch, extract, validate, fall back

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use crate::classifier::classify;
use crate::error::FetchError;
use crate::extract::extract_record;
use crate::extract::strategy::Pass;
use crate::fallback::generate_mock;
use crate::models::{Extraction, FallbackReason, Platform, ProductRecord, RecordSource};
use crate::traits::PageFetcher;
use crate::validator::is_generic;

/// Turns affiliate links into complete product records.
///
/// Stateless between calls and cheap to share. Every call makes one fetch
/// attempt bounded by `fetch_timeout`; any failure is answered with a
/// synthetic record instead of an error. Dropping the returned future aborts
/// the in-flight request.
#[derive(Clone)]
pub struct ProductExtractor {
    fetcher: Arc<dyn PageFetcher>,
    fetch_timeout: Duration,
}

impl ProductExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>, fetch_timeout: Duration) -> Self {
        Self {
            fetcher,
            fetch_timeout,
        }
    }

    /// Runs the whole pipeline and reports where the values came from
    pub async fn extract(&self, url: &Url) -> Extraction {
        let platform = classify(url.as_str());
        info!("Extracting {} product from {}", platform, url);

        let html = match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(url)).await {
            Ok(Ok(html)) => html,
            Ok(Err(err)) => return fallback(platform, FallbackReason::Fetch(err)),
            Err(_) => {
                let err = FetchError::Timeout(self.fetch_timeout);
                return fallback(platform, FallbackReason::Fetch(err));
            }
        };

        info!("Fetched HTML ({} bytes)", html.len());
        extract_from_html(&html, url, platform)
    }

    /// [`Self::extract`] without the provenance
    pub async fn extract_from_url(&self, url: &Url) -> ProductRecord {
        self.extract(url).await.record
    }
}

/// Extraction over markup that has already been fetched
pub fn extract_from_html(html: &str, url: &Url, platform: Platform) -> Extraction {
    let record = extract_record(html, url, platform, Pass::Full);
    if !is_generic(&record) {
        return finish(record, RecordSource::Extracted);
    }

    warn!("Extracted data for {} looks generic, retrying with page metadata", url);
    let retry = extract_record(html, url, platform, Pass::MetadataOnly);
    if !is_generic(&retry) {
        return finish(retry, RecordSource::MetadataRetry);
    }

    fallback(platform, FallbackReason::Generic)
}

fn fallback(platform: Platform, reason: FallbackReason) -> Extraction {
    warn!("Real extraction failed ({}), using fallback data", reason);
    finish(generate_mock(platform), RecordSource::Fallback(reason))
}

fn finish(record: ProductRecord, source: RecordSource) -> Extraction {
    let record = record.with_discount();
    info!(
        "Final {} record: {} at {:.2} ({})",
        record.platform,
        record.name,
        record.price,
        source.as_str()
    );
    Extraction { record, source }
}

//! Seams between the pipeline and the outside world

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

use crate::error::FetchError;
use crate::models::StoredProduct;

/// Retrieves the raw markup of a product page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Performs a single attempt at fetching `url`.
    ///
    /// # Returns
    /// * `Result<String, FetchError>` - The page body, or why it is unavailable
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Persists product candidates handed over by the pipeline
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Affiliate links that already have a stored product
    async fn existing_links(&self) -> Result<HashSet<String>>;

    /// Inserts the product, replacing any earlier version with the same identity
    async fn save_product(&self, product: &StoredProduct) -> Result<()>;
}

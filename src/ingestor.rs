use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};
use url::Url;

use crate::classifier::{affiliate_info, is_product_url, parse_affiliate_url};
use crate::extractor::ProductExtractor;
use crate::models::StoredProduct;
use crate::traits::ProductStore;

/// Adds products to the catalog from affiliate links
#[derive(Clone)]
pub struct ProductIngestor {
    extractor: ProductExtractor,
    store: Arc<dyn ProductStore>,
}

impl ProductIngestor {
    pub fn new(extractor: ProductExtractor, store: Arc<dyn ProductStore>) -> Self {
        Self { extractor, store }
    }

    /// Extracts and stores the product behind one link.
    ///
    /// Only malformed input is an error here; unreachable or unparseable
    /// pages still produce a stored (synthetic) product.
    pub async fn quick_add(&self, input: &str) -> Result<StoredProduct> {
        let url = parse_affiliate_url(input)?;
        self.add(&url).await
    }

    async fn add(&self, url: &Url) -> Result<StoredProduct> {
        if !is_product_url(url) {
            warn!("{} does not look like a product page, extracting anyway", url);
        }

        let source_product_id = affiliate_info(url).and_then(|info| info.product_id);
        let extraction = self.extractor.extract(url).await;

        let product = StoredProduct::new(
            extraction.record,
            url.as_str(),
            source_product_id,
            &extraction.source,
        );
        self.store.save_product(&product).await?;

        info!("Product saved successfully: {} ({})", product.id, product.record.name);
        Ok(product)
    }

    /// Stores every link not already in the catalog, returning how many were added
    pub async fn ingest_all(&self, links: &[String]) -> Result<usize> {
        let mut existing = self.store.existing_links().await?;
        let mut new_products = 0;

        for link in links {
            let url = match parse_affiliate_url(link) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Skipping {}: {}", link, e);
                    continue;
                }
            };

            if !existing.insert(url.to_string()) {
                continue;
            }

            match self.add(&url).await {
                Ok(_) => new_products += 1,
                Err(e) => error!("Error ingesting {}: {}", url, e),
            }
        }

        if new_products > 0 {
            info!("Added {} new products", new_products);
        } else {
            info!("No new products to add");
        }

        Ok(new_products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::database::Database;
    use crate::error::{FetchError, InputError};
    use crate::models::Platform;
    use crate::traits::PageFetcher;

    struct UnavailableFetcher;

    #[async_trait]
    impl PageFetcher for UnavailableFetcher {
        async fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
            Err(FetchError::Status(503))
        }
    }

    async fn ingestor() -> (ProductIngestor, Database) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let extractor =
            ProductExtractor::new(Arc::new(UnavailableFetcher), Duration::from_secs(1));
        (ProductIngestor::new(extractor, Arc::new(db.clone())), db)
    }

    #[tokio::test]
    async fn quick_add_stores_a_complete_product() {
        let (ingestor, db) = ingestor().await;

        let product = ingestor
            .quick_add("https://www.ebay.com/itm/2849361?mkcid=1")
            .await
            .unwrap();

        assert_eq!(product.record.platform, Platform::Ebay);
        assert_eq!(product.source_product_id.as_deref(), Some("2849361"));
        assert_eq!(product.data_source, "fallback");
        assert!(db.find_product(&product.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn quick_add_rejects_malformed_input() {
        let (ingestor, db) = ingestor().await;

        let err = ingestor.quick_add("not a url").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::Malformed(_))
        ));
        assert!(db.get_existing_links().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ingest_all_skips_known_and_invalid_links() {
        let (ingestor, _db) = ingestor().await;
        let links = vec![
            "https://www.amazon.com/dp/B000TEST01".to_string(),
            "https://www.aliexpress.com/item/1005001.html".to_string(),
            "::::".to_string(),
        ];

        assert_eq!(ingestor.ingest_all(&links).await.unwrap(), 2);
        assert_eq!(ingestor.ingest_all(&links).await.unwrap(), 0);
    }
}

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool, migrate::MigrateDatabase};
use tracing::info;

use crate::models::{Platform, ProductRecord, StoredProduct};
use crate::traits::ProductStore;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the sqlite database at `db_url` and
    /// applies pending migrations
    pub async fn connect(db_url: &str) -> Result<Self> {
        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            // Create the parent directory and database file if they don't exist
            let path = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
                info!("Creating database file");
                Sqlite::create_database(db_url).await?;
            }
        }

        // Every connection to an in-memory database sees its own copy
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .connect(db_url)
            .await?;

        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("Database initialized successfully");
        Ok(Self { pool })
    }

    pub async fn get_existing_links(&self) -> Result<HashSet<String>> {
        let rows = sqlx::query("SELECT affiliate_link FROM products")
            .fetch_all(&self.pool)
            .await?;

        let links = rows
            .into_iter()
            .map(|row| row.get::<String, _>("affiliate_link"))
            .collect();

        Ok(links)
    }

    pub async fn save_product(&self, product: &StoredProduct) -> Result<()> {
        let record = &product.record;

        sqlx::query(
            r"
            INSERT INTO products (
                id, name, price, original_price, image_url, description,
                affiliate_link, category, platform, rating, brand, discount,
                source_product_id, is_new, data_source, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                price = excluded.price,
                original_price = excluded.original_price,
                image_url = excluded.image_url,
                description = excluded.description,
                category = excluded.category,
                platform = excluded.platform,
                rating = excluded.rating,
                brand = excluded.brand,
                discount = excluded.discount,
                source_product_id = excluded.source_product_id,
                data_source = excluded.data_source
            ",
        )
        .bind(&product.id)
        .bind(&record.name)
        .bind(record.price)
        .bind(record.original_price)
        .bind(&record.image_url)
        .bind(&record.description)
        .bind(&product.affiliate_link)
        .bind(&record.category)
        .bind(record.platform.as_str())
        .bind(record.rating)
        .bind(&record.brand)
        .bind(record.discount.map(i64::from))
        .bind(&product.source_product_id)
        .bind(product.is_new)
        .bind(&product.data_source)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_product(&self, id: &str) -> Result<Option<StoredProduct>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| product_from_row(&row)).transpose()
    }
}

fn product_from_row(row: &SqliteRow) -> Result<StoredProduct> {
    let platform: String = row.try_get("platform")?;
    let discount: Option<i64> = row.try_get("discount")?;

    let record = ProductRecord {
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        original_price: row.try_get("original_price")?,
        image_url: row.try_get("image_url")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        platform: platform.parse::<Platform>()?,
        rating: row.try_get("rating")?,
        brand: row.try_get("brand")?,
        discount: discount
            .map(u8::try_from)
            .transpose()
            .context("stored discount out of range")?,
    };

    Ok(StoredProduct {
        id: row.try_get("id")?,
        affiliate_link: row.try_get("affiliate_link")?,
        source_product_id: row.try_get("source_product_id")?,
        data_source: row.try_get("data_source")?,
        is_new: row.try_get("is_new")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        record,
    })
}

#[async_trait]
impl ProductStore for Database {
    async fn existing_links(&self) -> Result<HashSet<String>> {
        self.get_existing_links().await
    }

    async fn save_product(&self, product: &StoredProduct) -> Result<()> {
        Database::save_product(self, product).await
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

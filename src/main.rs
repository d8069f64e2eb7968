use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use affiliate_ingest::config::{AppConfig, read_url_list};
use affiliate_ingest::database::Database;
use affiliate_ingest::extractor::ProductExtractor;
use affiliate_ingest::fetcher::HttpFetcher;
use affiliate_ingest::ingestor::ProductIngestor;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting affiliate product ingestion");

    let config = AppConfig::from_env()?;
    let fetcher = HttpFetcher::new(config.fetch_timeout)?;
    let extractor = ProductExtractor::new(Arc::new(fetcher), config.fetch_timeout);
    let database = Database::connect(&config.database_url).await?;
    let ingestor = ProductIngestor::new(extractor, Arc::new(database));

    // Links given on the command line are quick-added first
    for link in std::env::args().skip(1) {
        match ingestor.quick_add(&link).await {
            Ok(product) => println!("{}", serde_json::to_string_pretty(&product)?),
            Err(e) => error!("Rejected {}: {}", link, e),
        }
    }

    let Some(urls_file) = config.ingest_urls_file.clone() else {
        return Ok(());
    };

    if let Err(e) = ingest_from_file(&ingestor, &urls_file).await {
        error!("Error during initial ingestion: {}", e);
    }

    let Some(schedule) = config.ingest_schedule.as_deref() else {
        return Ok(());
    };

    let sched = JobScheduler::new().await?;

    let job_ingestor = ingestor.clone();
    sched
        .add(Job::new_async(schedule, move |_uuid, _l| {
            let ingestor = job_ingestor.clone();
            let urls_file = urls_file.clone();
            Box::pin(async move {
                if let Err(e) = ingest_from_file(&ingestor, &urls_file).await {
                    error!("Error during scheduled ingestion: {}", e);
                }
            })
        })?)
        .await?;

    info!("Scheduler started - ingesting on schedule {}", schedule);
    sched.start().await?;

    // Keep the program running
    loop {
        tokio::time::sleep(tokio::time::Duration::from_secs(30)).await;
    }
}

async fn ingest_from_file(ingestor: &ProductIngestor, path: &Path) -> Result<usize> {
    let contents = tokio::fs::read_to_string(path).await?;
    let links = read_url_list(&contents);
    info!("Ingesting {} links from {}", links.len(), path.display());
    ingestor.ingest_all(&links).await
}

pub mod classifier;
pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod extractor;
pub mod fallback;
pub mod fetcher;
pub mod ingestor;
pub mod models;
pub mod traits;
pub mod validator;

//! Application state

use std::sync::Arc;

use crate::config::Config;
use crate::db::{MemoryOrderStore, OrderStore, PgOrderStore};
use crate::services::{PriceFetcher, SearchClient};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Order persistence
    pub store: Arc<dyn OrderStore>,
    /// Search engine delegate
    pub search: SearchClient,
    /// Product page price scraper
    pub prices: PriceFetcher,
}

impl AppState {
    /// Connect to PostgreSQL (running migrations) or fall back to the
    /// in-memory store when no database is configured
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let store: Arc<dyn OrderStore> = match &config.database_url {
            Some(url) => {
                let store = PgOrderStore::connect(url).await?;
                tracing::info!("Connected to PostgreSQL, migrations applied");
                Arc::new(store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, orders are kept in memory only");
                Arc::new(MemoryOrderStore::new())
            }
        };
        Self::with_store(store, config)
    }

    /// Build state around an existing store
    pub fn with_store(store: Arc<dyn OrderStore>, config: &Config) -> Result<Self, BoxError> {
        Ok(Self {
            store,
            search: SearchClient::new(&config.search)?,
            prices: PriceFetcher::new(&config.price_base_url, config.price_timeout)?,
        })
    }
}

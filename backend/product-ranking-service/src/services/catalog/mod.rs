//! Read access to the storefront's catalog and interaction log.
//!
//! The store owns schema, transactions and durability. Ranking only needs
//! three snapshot reads, expressed by [`CatalogSource`].

mod memory;
mod postgres;

pub use memory::InMemoryCatalogSource;
pub use postgres::PgCatalogSource;

use crate::models::{Category, InteractionFilter, InteractionRecord, Product};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Snapshot reads consumed by the ranking views.
///
/// Each call returns a consistent point-in-time view of one relation; no
/// isolation is promised across calls.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> StoreResult<Vec<Product>>;

    async fn fetch_categories(&self) -> StoreResult<Vec<Category>>;

    async fn fetch_interactions(&self, filter: &InteractionFilter)
        -> StoreResult<Vec<InteractionRecord>>;
}

use super::{CatalogSource, StoreError, StoreResult};
use crate::models::{Category, InteractionFilter, InteractionRecord, Product};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Snapshot {
    products: Vec<Product>,
    categories: Vec<Category>,
    interactions: Vec<InteractionRecord>,
}

/// Catalog and interaction log held in process memory.
///
/// Reads clone out of the lock, so a fetch never observes writes that land
/// after it. Used by tests and for local runs without a database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogSource {
    storage: Arc<RwLock<Snapshot>>,
}

impl InMemoryCatalogSource {
    pub fn new(
        products: Vec<Product>,
        categories: Vec<Category>,
        interactions: Vec<InteractionRecord>,
    ) -> Self {
        Self {
            storage: Arc::new(RwLock::new(Snapshot {
                products,
                categories,
                interactions,
            })),
        }
    }

    /// Append to the interaction log.
    pub fn record_interaction(&self, record: InteractionRecord) -> StoreResult<()> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        storage.interactions.push(record);
        Ok(())
    }

    pub fn upsert_product(&self, product: Product) -> StoreResult<()> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        match storage
            .products
            .iter_mut()
            .find(|p| p.product_code == product.product_code)
        {
            Some(existing) => *existing = product,
            None => storage.products.push(product),
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalogSource {
    async fn fetch_catalog(&self) -> StoreResult<Vec<Product>> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage.products.clone())
    }

    async fn fetch_categories(&self) -> StoreResult<Vec<Category>> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage.categories.clone())
    }

    async fn fetch_interactions(
        &self,
        filter: &InteractionFilter,
    ) -> StoreResult<Vec<InteractionRecord>> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage
            .interactions
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}

//! Query facade over the ranking engine.
//!
//! Validates parameters before touching the store, pulls the snapshots a
//! view needs, and hands them to [`RankingEngine`]. Store failures and
//! timeouts are logged here and surface as
//! [`AppError::DataSourceUnavailable`].

use crate::error::{AppError, Result};
use crate::metrics::RequestTimer;
use crate::models::{
    CartRecommendation, Category, InteractionFilter, InteractionRecord, InteractionType, Product,
    ProductSummary, ProductWithCategory,
};
use crate::services::catalog::{CatalogSource, StoreResult};
use crate::services::ranking::RankingEngine;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

pub struct RecommendationService {
    source: Arc<dyn CatalogSource>,
    engine: RankingEngine,
    affinity_type: InteractionType,
    store_timeout: Duration,
}

impl RecommendationService {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        engine: RankingEngine,
        affinity_type: InteractionType,
        store_timeout: Duration,
    ) -> Self {
        Self {
            source,
            engine,
            affinity_type,
            store_timeout,
        }
    }

    /// Products in the customer's most-interacted category.
    pub async fn recommend_by_category_affinity(
        &self,
        customer_id: Option<&str>,
    ) -> Result<Vec<ProductWithCategory>> {
        observe("category_affinity", async {
            let customer_id = require(customer_id, "customerId")?;
            let filter = InteractionFilter::for_customer(customer_id).with_type(self.affinity_type);

            let interactions = self.interactions(&filter).await?;
            if interactions.is_empty() {
                return Ok(Vec::new());
            }
            let (products, categories) = self.catalog_with_categories().await?;

            Ok(self.engine.category_affinity(
                customer_id,
                self.affinity_type,
                &products,
                &categories,
                &interactions,
            ))
        })
        .await
    }

    /// Global top-K by interaction count.
    pub async fn top_picks(&self) -> Result<Vec<ProductSummary>> {
        observe("top_picks", async {
            let products = self.catalog().await?;
            Ok(self.engine.top_picks(&products))
        })
        .await
    }

    pub async fn list_products_with_category(&self) -> Result<Vec<ProductWithCategory>> {
        observe("list_products", async {
            let (products, categories) = self.catalog_with_categories().await?;
            Ok(self.engine.products_with_category(&products, &categories))
        })
        .await
    }

    /// One best-ordered product per category.
    pub async fn top_mix_picks(&self) -> Result<Vec<ProductWithCategory>> {
        observe("top_mix_picks", async {
            let (products, categories) = self.catalog_with_categories().await?;
            Ok(self.engine.top_mix_picks(&products, &categories))
        })
        .await
    }

    pub async fn cart_based_recommendations(&self) -> Result<Vec<CartRecommendation>> {
        observe("cart_recommendations", async {
            let filter = InteractionFilter::all().with_type(InteractionType::Cart);
            let (products, interactions) =
                tokio::try_join!(self.catalog(), self.interactions(&filter))?;
            Ok(self.engine.cart_based_recommendations(&products, &interactions))
        })
        .await
    }

    /// Products reached through customers with overlapping history.
    pub async fn co_interaction_recommendations(
        &self,
        customer_id: Option<&str>,
    ) -> Result<Vec<ProductSummary>> {
        observe("co_interaction", async {
            let customer_id = require(customer_id, "customerId")?;
            let filter = InteractionFilter::all();
            let (products, interactions) =
                tokio::try_join!(self.catalog(), self.interactions(&filter))?;
            Ok(self.engine.co_interaction(customer_id, &products, &interactions))
        })
        .await
    }

    /// In-stock products the customer has not touched, by popularity.
    pub async fn popular_unseen_recommendations(
        &self,
        customer_id: Option<&str>,
    ) -> Result<Vec<ProductSummary>> {
        observe("popular_unseen", async {
            let customer_id = require(customer_id, "customerId")?;
            let filter = InteractionFilter::all();
            let (products, interactions) =
                tokio::try_join!(self.catalog(), self.interactions(&filter))?;
            Ok(self.engine.popular_unseen(customer_id, &products, &interactions))
        })
        .await
    }

    /// Readiness probe: one small read, kept out of the request metrics.
    pub async fn check_store(&self) -> Result<()> {
        self.fetch("categories", self.source.fetch_categories())
            .await
            .map(|_| ())
    }

    async fn catalog(&self) -> Result<Vec<Product>> {
        self.fetch("catalog", self.source.fetch_catalog()).await
    }

    async fn catalog_with_categories(&self) -> Result<(Vec<Product>, Vec<Category>)> {
        tokio::try_join!(
            self.catalog(),
            self.fetch("categories", self.source.fetch_categories())
        )
    }

    async fn interactions(&self, filter: &InteractionFilter) -> Result<Vec<InteractionRecord>> {
        self.fetch("interactions", self.source.fetch_interactions(filter))
            .await
    }

    /// Bound a store call by the configured timeout and log any failure.
    async fn fetch<T, F>(&self, relation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(Ok(rows)) => Ok(rows),
            Ok(Err(e)) => {
                error!(relation, error = %e, "Store fetch failed");
                Err(AppError::from(e))
            }
            Err(_) => {
                error!(
                    relation,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Store fetch timed out"
                );
                Err(AppError::DataSourceUnavailable(format!(
                    "{} fetch timed out after {:?}",
                    relation, self.store_timeout
                )))
            }
        }
    }
}

/// Reject absent or blank parameters before any fetch. The value itself is
/// passed through untouched.
fn require<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::MissingParameter(name)),
    }
}

/// Record metrics and a debug line for one facade call.
async fn observe<T, F>(operation: &'static str, fut: F) -> Result<Vec<T>>
where
    F: Future<Output = Result<Vec<T>>>,
{
    let timer = RequestTimer::start(operation);
    let result = fut.await;

    let status = match &result {
        Ok(rows) if rows.is_empty() => "empty",
        Ok(_) => "ok",
        Err(AppError::MissingParameter(_)) => "bad_request",
        Err(_) => "error",
    };
    if let Ok(rows) = &result {
        debug!(operation, rows = rows.len(), "Recommendation computed");
    }
    timer.finish(status);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::{InMemoryCatalogSource, StoreError};
    use crate::services::ranking::fixtures::{cart, category, product};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts fetches and fails every one of them.
    #[derive(Default)]
    struct FailingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogSource for FailingSource {
        async fn fetch_catalog(&self) -> StoreResult<Vec<Product>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn fetch_categories(&self) -> StoreResult<Vec<Category>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn fetch_interactions(
            &self,
            _filter: &InteractionFilter,
        ) -> StoreResult<Vec<InteractionRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    struct SlowSource;

    #[async_trait]
    impl CatalogSource for SlowSource {
        async fn fetch_catalog(&self) -> StoreResult<Vec<Product>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Vec::new())
        }

        async fn fetch_categories(&self) -> StoreResult<Vec<Category>> {
            Ok(Vec::new())
        }

        async fn fetch_interactions(
            &self,
            _filter: &InteractionFilter,
        ) -> StoreResult<Vec<InteractionRecord>> {
            Ok(Vec::new())
        }
    }

    fn service(source: Arc<dyn CatalogSource>) -> RecommendationService {
        RecommendationService::new(
            source,
            RankingEngine::default(),
            InteractionType::Cart,
            Duration::from_millis(200),
        )
    }

    fn seeded() -> RecommendationService {
        let source = InMemoryCatalogSource::new(
            vec![
                product("p1", 1, 5, 1),
                product("p1b", 1, 3, 7),
                product("p2", 2, 10, 2),
            ],
            vec![category(1, "Fruit"), category(2, "Dairy")],
            vec![
                cart("x", "p1", 1),
                cart("x", "p1", 1),
                cart("x", "p1", 1),
                cart("x", "p2", 1),
                cart("y", "p2", 4),
            ],
        );
        service(Arc::new(source))
    }

    #[tokio::test]
    async fn test_missing_customer_rejected_before_fetch() {
        let source = Arc::new(FailingSource::default());
        let svc = service(source.clone());

        for input in [None, Some(""), Some("   ")] {
            let err = svc.recommend_by_category_affinity(input).await.unwrap_err();
            assert!(matches!(err, AppError::MissingParameter("customerId")));
        }
        assert!(matches!(
            svc.co_interaction_recommendations(None).await,
            Err(AppError::MissingParameter(_))
        ));
        assert!(matches!(
            svc.popular_unseen_recommendations(Some(" ")).await,
            Err(AppError::MissingParameter(_))
        ));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_unavailable() {
        let svc = service(Arc::new(FailingSource::default()));

        assert!(matches!(
            svc.top_picks().await,
            Err(AppError::DataSourceUnavailable(_))
        ));
        assert!(matches!(
            svc.top_mix_picks().await,
            Err(AppError::DataSourceUnavailable(_))
        ));
        assert!(matches!(
            svc.cart_based_recommendations().await,
            Err(AppError::DataSourceUnavailable(_))
        ));
        assert!(matches!(
            svc.recommend_by_category_affinity(Some("x")).await,
            Err(AppError::DataSourceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_store_timeout_maps_to_unavailable() {
        let svc = service(Arc::new(SlowSource));

        let err = svc.top_picks().await.unwrap_err();
        assert!(matches!(err, AppError::DataSourceUnavailable(msg) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn test_affinity_end_to_end() {
        let svc = seeded();

        let products = svc.recommend_by_category_affinity(Some("x")).await.unwrap();
        let codes: Vec<&str> = products.iter().map(|p| p.product_code.as_str()).collect();
        assert_eq!(codes, vec!["p1", "p1b"]);

        let unknown = svc.recommend_by_category_affinity(Some("nobody")).await.unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_customer_id_is_not_normalized() {
        let svc = seeded();

        // Whitespace only matters for the blank check
        let padded = svc.recommend_by_category_affinity(Some(" x ")).await.unwrap();
        assert!(padded.is_empty());

        // " y" has no history, so p2 is not excluded as seen
        let padded = svc.popular_unseen_recommendations(Some(" y")).await.unwrap();
        let codes: Vec<&str> = padded.iter().map(|p| p.product_code.as_str()).collect();
        assert_eq!(codes, vec!["p1", "p2"]);
    }

    /// Serves categories; any catalog or interaction read fails.
    #[derive(Default)]
    struct CategoriesOnlySource {
        catalog_reads: AtomicUsize,
    }

    #[async_trait]
    impl CatalogSource for CategoriesOnlySource {
        async fn fetch_catalog(&self) -> StoreResult<Vec<Product>> {
            self.catalog_reads.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn fetch_categories(&self) -> StoreResult<Vec<Category>> {
            Ok(vec![category(1, "Fruit")])
        }

        async fn fetch_interactions(
            &self,
            _filter: &InteractionFilter,
        ) -> StoreResult<Vec<InteractionRecord>> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn test_check_store_reads_categories_only() {
        let source = Arc::new(CategoriesOnlySource::default());
        let svc = service(source.clone());

        assert!(svc.check_store().await.is_ok());
        assert_eq!(source.catalog_reads.load(Ordering::SeqCst), 0);

        let failing = service(Arc::new(FailingSource::default()));
        assert!(matches!(
            failing.check_store().await,
            Err(AppError::DataSourceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_views_over_seeded_store() {
        let svc = seeded();

        let picks = svc.top_picks().await.unwrap();
        assert_eq!(picks[0].product_code, "p2");

        let mix = svc.top_mix_picks().await.unwrap();
        let codes: Vec<&str> = mix.iter().map(|p| p.product_code.as_str()).collect();
        assert_eq!(codes, vec!["p1b", "p2"]);

        let listed = svc.list_products_with_category().await.unwrap();
        assert_eq!(listed.len(), 3);

        let carts = svc.cart_based_recommendations().await.unwrap();
        assert_eq!(carts.len(), 4);
        assert_eq!(carts[0].interaction_count, 4);

        let similar = svc.co_interaction_recommendations(Some("y")).await.unwrap();
        let codes: Vec<&str> = similar.iter().map(|p| p.product_code.as_str()).collect();
        assert_eq!(codes, vec!["p1"]);

        let popular = svc.popular_unseen_recommendations(Some("y")).await.unwrap();
        assert_eq!(popular.len(), 1);
        assert_eq!(popular[0].product_code, "p1");
        assert_eq!(popular[0].interaction_count, 3);
    }
}

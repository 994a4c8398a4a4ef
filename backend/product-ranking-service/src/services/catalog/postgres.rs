use super::{CatalogSource, StoreResult};
use crate::models::{Category, InteractionFilter, InteractionRecord, InteractionType, Product};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;

/// PostgreSQL-backed catalog reads
pub struct PgCatalogSource {
    pool: PgPool,
}

impl PgCatalogSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InteractionRow {
    customer_id: String,
    product_code: String,
    interaction_type: String,
    interaction_count: i64,
    created_at: DateTime<Utc>,
}

impl InteractionRow {
    fn into_record(self) -> Option<InteractionRecord> {
        let interaction_type = InteractionType::from_str(&self.interaction_type)?;
        Some(InteractionRecord {
            customer_id: self.customer_id,
            product_code: self.product_code,
            interaction_type,
            interaction_count: self.interaction_count,
            timestamp: self.created_at,
        })
    }
}

#[async_trait]
impl CatalogSource for PgCatalogSource {
    async fn fetch_catalog(&self) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                product_id::int8 AS product_id,
                product_code,
                product_name,
                description,
                price::float8 AS price,
                quantity::int8 AS quantity,
                category_id::int8 AS category_id,
                size,
                expiration_date,
                COALESCE(interaction_count, 0)::int8 AS interaction_count,
                COALESCE(interaction_orders, 0)::int8 AS interaction_orders
            FROM product
            ORDER BY product_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn fetch_categories(&self) -> StoreResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT category_id::int8 AS category_id, category_name
            FROM category
            ORDER BY category_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn fetch_interactions(
        &self,
        filter: &InteractionFilter,
    ) -> StoreResult<Vec<InteractionRecord>> {
        let rows = sqlx::query_as::<_, InteractionRow>(
            r#"
            SELECT
                customer_id::text AS customer_id,
                product_code,
                interaction_type,
                COALESCE(interaction_count, 1)::int8 AS interaction_count,
                created_at
            FROM user_product_interactions
            WHERE ($1::text IS NULL OR customer_id::text = $1)
              AND ($2::text IS NULL OR interaction_type = $2)
            "#,
        )
        .bind(filter.customer_id.as_deref())
        .bind(filter.interaction_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await?;

        let total = rows.len();
        let records: Vec<InteractionRecord> =
            rows.into_iter().filter_map(InteractionRow::into_record).collect();

        if records.len() < total {
            warn!(
                skipped = total - records.len(),
                "Skipped interaction rows with unknown interaction_type"
            );
        }

        Ok(records)
    }
}

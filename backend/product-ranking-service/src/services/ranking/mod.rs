/// Ranking Module
///
/// Pure computations that turn a catalog snapshot and an interaction log
/// snapshot into ranked product lists.
///
/// # Views
/// - **Affinity**: every product in the customer's most-interacted category
/// - **Popularity**: global top-K by `interaction_count`, plus popular
///   products the customer has not touched yet
/// - **Diversity**: one top product per category by `interaction_orders`
/// - **Cart**: per-product windowed top-K over cart records, then a global cut
/// - **Co-interaction**: products reached through customers who share an
///   interaction with the requester
///
/// The engine performs no I/O and keeps no state between calls. Records that
/// reference unknown products, and products in unknown categories, are
/// dropped from any view that joins on them.
mod affinity;
mod cart;
mod co_interaction;
mod diversity;
mod popularity;
pub mod window;

use crate::models::{Category, Product};
use std::collections::HashMap;

pub use window::windowed_top_k;

/// Row caps applied by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingLimits {
    pub top_picks: usize,
    pub cart_per_product_window: usize,
    pub cart_recommendations: usize,
}

impl Default for RankingLimits {
    fn default() -> Self {
        Self {
            top_picks: 4,
            cart_per_product_window: 4,
            cart_recommendations: 4,
        }
    }
}

/// Ranking Engine - 無狀態排序計算
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    limits: RankingLimits,
}

impl RankingEngine {
    pub fn new(limits: RankingLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> RankingLimits {
        self.limits
    }
}

/// Lookup tables over one snapshot, built per call.
pub(crate) struct CatalogIndex<'a> {
    products: HashMap<&'a str, &'a Product>,
    categories: HashMap<i64, &'a Category>,
}

impl<'a> CatalogIndex<'a> {
    pub(crate) fn new(products: &'a [Product], categories: &'a [Category]) -> Self {
        Self {
            products: products
                .iter()
                .map(|p| (p.product_code.as_str(), p))
                .collect(),
            categories: categories.iter().map(|c| (c.category_id, c)).collect(),
        }
    }

    pub(crate) fn product(&self, code: &str) -> Option<&'a Product> {
        self.products.get(code).copied()
    }

    pub(crate) fn category(&self, category_id: i64) -> Option<&'a Category> {
        self.categories.get(&category_id).copied()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{Category, InteractionRecord, InteractionType, Product};
    use chrono::{TimeZone, Utc};

    pub fn product(code: &str, category_id: i64, count: i64, orders: i64) -> Product {
        Product {
            product_id: code.bytes().map(i64::from).sum(),
            product_code: code.to_string(),
            product_name: format!("Product {}", code),
            description: None,
            price: 9.99,
            quantity: 10,
            category_id,
            size: None,
            expiration_date: None,
            interaction_count: count,
            interaction_orders: orders,
        }
    }

    pub fn category(category_id: i64, name: &str) -> Category {
        Category {
            category_id,
            category_name: name.to_string(),
        }
    }

    pub fn interaction(
        customer: &str,
        code: &str,
        interaction_type: InteractionType,
        count: i64,
    ) -> InteractionRecord {
        InteractionRecord {
            customer_id: customer.to_string(),
            product_code: code.to_string(),
            interaction_type,
            interaction_count: count,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    pub fn cart(customer: &str, code: &str, count: i64) -> InteractionRecord {
        interaction(customer, code, InteractionType::Cart, count)
    }
}

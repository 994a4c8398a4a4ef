use super::{CatalogIndex, RankingEngine};
use crate::models::{InteractionRecord, Product, ProductSummary};
use std::collections::{BTreeSet, HashSet};

impl RankingEngine {
    /// Products reached through customers who share at least one product
    /// with `customer_id`, minus what the customer already touched.
    ///
    /// `interactions` is the whole log, any interaction type. Output is
    /// distinct and ordered by product code.
    pub fn co_interaction(
        &self,
        customer_id: &str,
        products: &[Product],
        interactions: &[InteractionRecord],
    ) -> Vec<ProductSummary> {
        let index = CatalogIndex::new(products, &[]);

        let own: HashSet<&str> = interactions
            .iter()
            .filter(|r| r.customer_id == customer_id && index.product(&r.product_code).is_some())
            .map(|r| r.product_code.as_str())
            .collect();
        if own.is_empty() {
            return Vec::new();
        }

        let neighbours: HashSet<&str> = interactions
            .iter()
            .filter(|r| r.customer_id != customer_id && own.contains(r.product_code.as_str()))
            .map(|r| r.customer_id.as_str())
            .collect();
        if neighbours.is_empty() {
            return Vec::new();
        }

        let reached: BTreeSet<&str> = interactions
            .iter()
            .filter(|r| neighbours.contains(r.customer_id.as_str()))
            .map(|r| r.product_code.as_str())
            .filter(|code| !own.contains(code))
            .collect();

        reached
            .into_iter()
            .filter_map(|code| index.product(code).map(ProductSummary::from))
            .collect()
    }
}

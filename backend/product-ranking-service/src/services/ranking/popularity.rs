use super::{CatalogIndex, RankingEngine};
use crate::models::{InteractionRecord, Product, ProductSummary};
use crate::utils::score_desc_then_code;
use std::collections::{HashMap, HashSet};

impl RankingEngine {
    /// Global top-K by the store-maintained `interaction_count`.
    ///
    /// Returns fewer than K when the catalog is smaller; never pads.
    pub fn top_picks(&self, products: &[Product]) -> Vec<ProductSummary> {
        let mut ranked: Vec<&Product> = products.iter().collect();
        ranked.sort_by(|a, b| {
            score_desc_then_code(
                a.interaction_count,
                &a.product_code,
                b.interaction_count,
                &b.product_code,
            )
        });

        ranked
            .into_iter()
            .take(self.limits.top_picks)
            .map(ProductSummary::from)
            .collect()
    }

    /// In-stock products the customer has not interacted with, ordered by
    /// how many interaction records reference them across all customers.
    ///
    /// `interactions` is the whole log. The returned `interaction_count`
    /// is the record count computed here, not the catalog counter.
    pub fn popular_unseen(
        &self,
        customer_id: &str,
        products: &[Product],
        interactions: &[InteractionRecord],
    ) -> Vec<ProductSummary> {
        let index = CatalogIndex::new(products, &[]);

        let seen: HashSet<&str> = interactions
            .iter()
            .filter(|r| r.customer_id == customer_id)
            .map(|r| r.product_code.as_str())
            .collect();

        let mut counts: HashMap<&str, i64> = HashMap::new();
        for record in interactions {
            let Some(product) = index.product(&record.product_code) else {
                continue;
            };
            if seen.contains(product.product_code.as_str()) || product.quantity == 0 {
                continue;
            }
            *counts.entry(product.product_code.as_str()).or_insert(0) += 1;
        }

        let mut ranked: Vec<ProductSummary> = counts
            .into_iter()
            .filter_map(|(code, count)| {
                index.product(code).map(|p| ProductSummary {
                    interaction_count: count,
                    ..ProductSummary::from(p)
                })
            })
            .collect();
        ranked.sort_by(|a, b| {
            score_desc_then_code(
                a.interaction_count,
                &a.product_code,
                b.interaction_count,
                &b.product_code,
            )
        });
        ranked
    }
}

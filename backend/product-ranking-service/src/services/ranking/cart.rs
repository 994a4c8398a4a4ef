use super::{windowed_top_k, CatalogIndex, RankingEngine};
use crate::models::{CartRecommendation, InteractionRecord, InteractionType, Product};
use std::cmp::Ordering;

impl RankingEngine {
    /// Cart-weighted recommendations.
    ///
    /// Two stages: each product keeps at most `cart_per_product_window` of
    /// its cart records (highest count first), then the survivors are merged
    /// and cut to `cart_recommendations` globally. Records for unknown
    /// products never become candidates.
    pub fn cart_based_recommendations(
        &self,
        products: &[Product],
        interactions: &[InteractionRecord],
    ) -> Vec<CartRecommendation> {
        let index = CatalogIndex::new(products, &[]);

        let candidates = windowed_top_k(
            interactions.iter().filter(|r| {
                r.interaction_type == InteractionType::Cart
                    && index.product(&r.product_code).is_some()
            }),
            |r: &InteractionRecord| r.product_code.clone(),
            record_order,
            self.limits.cart_per_product_window,
        );

        let mut merged: Vec<&InteractionRecord> = candidates.into_values().flatten().collect();
        merged.sort_by(|a, b| record_order(a, b));

        merged
            .into_iter()
            .take(self.limits.cart_recommendations)
            .filter_map(|record| {
                index.product(&record.product_code).map(|p| CartRecommendation {
                    product_code: p.product_code.clone(),
                    product_name: p.product_name.clone(),
                    quantity: p.quantity,
                    price: p.price,
                    interaction_count: record.interaction_count,
                    interaction_type: record.interaction_type,
                })
            })
            .collect()
    }
}

/// Count descending, then product code, customer and time ascending.
fn record_order(a: &InteractionRecord, b: &InteractionRecord) -> Ordering {
    b.interaction_count
        .cmp(&a.interaction_count)
        .then_with(|| a.product_code.cmp(&b.product_code))
        .then_with(|| a.customer_id.cmp(&b.customer_id))
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}

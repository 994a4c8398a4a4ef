use super::{windowed_top_k, CatalogIndex, RankingEngine};
use crate::models::{Category, Product, ProductWithCategory};
use crate::utils::score_desc_then_code;

/// Picks kept per category in the mixed slate.
const PICKS_PER_CATEGORY: usize = 1;

impl RankingEngine {
    /// One product per category: the one with the most orders.
    ///
    /// Output has exactly one row per category that has at least one
    /// product, in ascending category id order. Equal order counts within a
    /// category resolve by product code.
    pub fn top_mix_picks(
        &self,
        products: &[Product],
        categories: &[Category],
    ) -> Vec<ProductWithCategory> {
        let index = CatalogIndex::new(products, categories);

        let windows = windowed_top_k(
            products
                .iter()
                .filter(|p| index.category(p.category_id).is_some()),
            |p: &Product| p.category_id,
            |a: &Product, b: &Product| {
                score_desc_then_code(
                    a.interaction_orders,
                    &a.product_code,
                    b.interaction_orders,
                    &b.product_code,
                )
            },
            PICKS_PER_CATEGORY,
        );

        windows
            .into_iter()
            .flat_map(|(category_id, picks)| {
                let category = index.category(category_id);
                picks
                    .into_iter()
                    .filter_map(move |p| category.map(|c| ProductWithCategory::new(p, c)))
            })
            .collect()
    }
}

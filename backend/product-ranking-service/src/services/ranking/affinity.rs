use super::{CatalogIndex, RankingEngine};
use crate::models::{Category, InteractionRecord, InteractionType, Product, ProductWithCategory};
use crate::utils::first_max_by_key;
use std::collections::BTreeMap;

impl RankingEngine {
    /// Products in the customer's affinity category.
    ///
    /// Only records of `affinity_type` for `customer_id` count. The category
    /// with the most records wins; on a tie the lowest category id wins.
    /// A customer with no qualifying records gets an empty list.
    pub fn category_affinity(
        &self,
        customer_id: &str,
        affinity_type: InteractionType,
        products: &[Product],
        categories: &[Category],
        interactions: &[InteractionRecord],
    ) -> Vec<ProductWithCategory> {
        let index = CatalogIndex::new(products, categories);

        let Some(category_id) = affinity_category(&index, customer_id, affinity_type, interactions)
        else {
            return Vec::new();
        };

        let Some(category) = index.category(category_id) else {
            return Vec::new();
        };

        let mut matched: Vec<&Product> = products
            .iter()
            .filter(|p| p.category_id == category_id)
            .collect();
        matched.sort_by(|a, b| a.product_code.cmp(&b.product_code));

        matched
            .into_iter()
            .map(|p| ProductWithCategory::new(p, category))
            .collect()
    }

    /// Every product whose category resolves, joined with the category name.
    pub fn products_with_category(
        &self,
        products: &[Product],
        categories: &[Category],
    ) -> Vec<ProductWithCategory> {
        let index = CatalogIndex::new(products, categories);

        let mut joined: Vec<ProductWithCategory> = products
            .iter()
            .filter_map(|p| {
                index
                    .category(p.category_id)
                    .map(|c| ProductWithCategory::new(p, c))
            })
            .collect();
        joined.sort_by(|a, b| a.product_code.cmp(&b.product_code));
        joined
    }
}

/// Group the customer's records by category and pick the largest group.
fn affinity_category(
    index: &CatalogIndex<'_>,
    customer_id: &str,
    affinity_type: InteractionType,
    interactions: &[InteractionRecord],
) -> Option<i64> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();

    for record in interactions
        .iter()
        .filter(|r| r.customer_id == customer_id && r.interaction_type == affinity_type)
    {
        let Some(product) = index.product(&record.product_code) else {
            continue;
        };
        if index.category(product.category_id).is_none() {
            continue;
        }
        *counts.entry(product.category_id).or_insert(0) += 1;
    }

    // BTreeMap iterates in ascending id order, so the first max is the lowest id
    let grouped: Vec<(i64, usize)> = counts.into_iter().collect();
    first_max_by_key(&grouped, |(_, count)| *count).map(|i| grouped[i].0)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    fn catalog() -> (Vec<Product>, Vec<Category>) {
        (
            vec![
                product("p1", 1, 0, 0),
                product("p1b", 1, 0, 0),
                product("p2", 2, 0, 0),
                product("p3", 3, 0, 0),
            ],
            vec![category(1, "Fruit"), category(2, "Dairy"), category(3, "Bakery")],
        )
    }

    #[test]
    fn test_returns_products_of_dominant_category() {
        let engine = RankingEngine::default();
        let (products, categories) = catalog();
        let interactions = vec![
            cart("x", "p1", 1),
            cart("x", "p1", 1),
            cart("x", "p1", 1),
            cart("x", "p2", 1),
        ];

        let result =
            engine.category_affinity("x", InteractionType::Cart, &products, &categories, &interactions);

        let codes: Vec<&str> = result.iter().map(|p| p.product_code.as_str()).collect();
        assert_eq!(codes, vec!["p1", "p1b"]);
        assert!(result.iter().all(|p| p.category_name == "Fruit"));
    }

    #[test]
    fn test_counts_records_not_weights() {
        let engine = RankingEngine::default();
        let (products, categories) = catalog();
        // 一筆高權重記錄不勝過兩筆記錄
        let interactions = vec![cart("x", "p2", 50), cart("x", "p3", 1), cart("x", "p3", 1)];

        let result =
            engine.category_affinity("x", InteractionType::Cart, &products, &categories, &interactions);

        assert!(result.iter().all(|p| p.category_id == 3));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_tie_prefers_lowest_category_id() {
        let engine = RankingEngine::default();
        let (products, categories) = catalog();
        let interactions = vec![cart("x", "p3", 1), cart("x", "p2", 1)];

        let result =
            engine.category_affinity("x", InteractionType::Cart, &products, &categories, &interactions);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category_id, 2);
    }

    #[test]
    fn test_no_interactions_is_empty() {
        let engine = RankingEngine::default();
        let (products, categories) = catalog();
        let interactions = vec![cart("someone-else", "p1", 1)];

        let result =
            engine.category_affinity("x", InteractionType::Cart, &products, &categories, &interactions);

        assert!(result.is_empty());
    }

    #[test]
    fn test_ignores_other_types_and_orphans() {
        let engine = RankingEngine::default();
        let (products, categories) = catalog();
        let interactions = vec![
            interaction("x", "p2", InteractionType::View, 1),
            interaction("x", "p2", InteractionType::View, 1),
            cart("x", "deleted-product", 1),
            cart("x", "deleted-product", 1),
            cart("x", "p3", 1),
        ];

        let result =
            engine.category_affinity("x", InteractionType::Cart, &products, &categories, &interactions);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].product_code, "p3");
    }

    #[test]
    fn test_products_with_category_drops_unknown_categories() {
        let engine = RankingEngine::default();
        let (mut products, categories) = catalog();
        products.push(product("orphan", 99, 0, 0));

        let listed = engine.products_with_category(&products, &categories);

        assert_eq!(listed.len(), 4);
        assert!(listed.iter().all(|p| p.product_code != "orphan"));
        assert_eq!(listed[0].product_code, "p1");
        assert_eq!(listed[0].category_name, "Fruit");
    }
}

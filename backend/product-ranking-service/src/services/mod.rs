pub mod catalog;
pub mod ranking;
pub mod recommendation;

pub use catalog::{CatalogSource, InMemoryCatalogSource, PgCatalogSource};
pub use ranking::{RankingEngine, RankingLimits};
pub use recommendation::RecommendationService;

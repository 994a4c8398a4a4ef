pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::services::{CatalogSource, RankingEngine, RecommendationService};

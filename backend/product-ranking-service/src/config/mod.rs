use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::models::InteractionType;
use crate::services::ranking::RankingLimits;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // HTTP server config
    pub http_host: String,
    pub http_port: u16,

    // PostgreSQL (catalog + interaction log)
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    // Upper bound on a single store fetch
    pub store_timeout_ms: u64,

    // Ranking
    pub top_picks_limit: usize,
    pub cart_recommendation_limit: usize,
    pub cart_per_product_window: usize,
    pub affinity_interaction_type: String,

    // Observability
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 8012)?
            .set_default("database_url", "")?
            .set_default("db_max_connections", 5)?
            .set_default("db_min_connections", 1)?
            .set_default("db_acquire_timeout_secs", 10)?
            .set_default("store_timeout_ms", 5000)?
            .set_default("top_picks_limit", 4)?
            .set_default("cart_recommendation_limit", 4)?
            .set_default("cart_per_product_window", 4)?
            .set_default("affinity_interaction_type", "cart")?
            .set_default("log_format", "text")?
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow!("HTTP port must be greater than 0"));
        }

        if self.database_url.is_empty() {
            return Err(anyhow!("Database URL is required"));
        }

        if self.db_max_connections == 0 || self.db_min_connections > self.db_max_connections {
            return Err(anyhow!(
                "DB connections must satisfy 0 < min <= max (min={}, max={})",
                self.db_min_connections,
                self.db_max_connections
            ));
        }

        if self.store_timeout_ms == 0 {
            return Err(anyhow!("Store timeout must be greater than 0"));
        }

        if self.top_picks_limit == 0
            || self.cart_recommendation_limit == 0
            || self.cart_per_product_window == 0
        {
            return Err(anyhow!("Ranking limits must be at least 1"));
        }

        self.affinity_type()?;

        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(anyhow!("Log format must be 'text' or 'json'"));
        }

        Ok(())
    }

    pub fn affinity_type(&self) -> Result<InteractionType> {
        InteractionType::from_str(&self.affinity_interaction_type).ok_or_else(|| {
            anyhow!(
                "Unknown affinity interaction type: {}",
                self.affinity_interaction_type
            )
        })
    }

    pub fn ranking_limits(&self) -> RankingLimits {
        RankingLimits {
            top_picks: self.top_picks_limit,
            cart_per_product_window: self.cart_per_product_window,
            cart_recommendations: self.cart_recommendation_limit,
        }
    }
}

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use product_ranking_service::{
    db::{create_pool, DbConfig},
    handlers::{self, RecommendationHandlerState},
    services::{PgCatalogSource, RankingEngine, RecommendationService},
    Config,
};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,product_ranking_service=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    config
        .validate()
        .context("Configuration validation failed")?;
    info!(
        "Starting product-ranking-service v{} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.http_host,
        config.http_port
    );

    let pg_pool = create_pool(&DbConfig::from(&config))
        .await
        .context("Failed to create PostgreSQL pool")?;

    let limits = config.ranking_limits();
    let service = Arc::new(RecommendationService::new(
        Arc::new(PgCatalogSource::new(pg_pool)),
        RankingEngine::new(limits),
        config.affinity_type()?,
        Duration::from_millis(config.store_timeout_ms),
    ));
    info!(?limits, "Recommendation service initialized");

    let state = web::Data::new(RecommendationHandlerState { service });

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind((config.http_host.as_str(), config.http_port))
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")
}

use crate::error::AppError;
use crate::services::RecommendationService;
use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

pub struct RecommendationHandlerState {
    pub service: Arc<RecommendationService>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerQuery {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
}

/// GET /product-user?customerId=
/// Products from the customer's most frequent cart category
#[get("/product-user")]
pub async fn get_products_for_customer(
    state: web::Data<RecommendationHandlerState>,
    query: web::Query<CustomerQuery>,
) -> Result<HttpResponse, AppError> {
    let products = state
        .service
        .recommend_by_category_affinity(query.customer_id.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(products))
}

/// GET /products-top-picks
#[get("/products-top-picks")]
pub async fn get_top_picks(
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse, AppError> {
    let products = state.service.top_picks().await?;
    Ok(HttpResponse::Ok().json(products))
}

/// GET /products
#[get("/products")]
pub async fn get_products(
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse, AppError> {
    let products = state.service.list_products_with_category().await?;
    Ok(HttpResponse::Ok().json(products))
}

/// GET /products-top-mix-picks
/// One top-ordered product from each category
#[get("/products-top-mix-picks")]
pub async fn get_top_mix_picks(
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse, AppError> {
    let products = state.service.top_mix_picks().await?;
    Ok(HttpResponse::Ok().json(products))
}

/// GET /recommend-products
/// Top cart interactions, at most four per product before the global cut
#[get("/recommend-products")]
pub async fn get_cart_recommendations(
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse, AppError> {
    let recommendations = state.service.cart_based_recommendations().await?;
    Ok(HttpResponse::Ok().json(recommendations))
}

/// GET /recommend-products/{customer_id}/similar-customers
#[get("/recommend-products/{customer_id}/similar-customers")]
pub async fn get_similar_customer_recommendations(
    state: web::Data<RecommendationHandlerState>,
    customer_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let products = state
        .service
        .co_interaction_recommendations(Some(customer_id.as_str()))
        .await?;
    Ok(HttpResponse::Ok().json(products))
}

/// GET /recommend-products/{customer_id}/popular
#[get("/recommend-products/{customer_id}/popular")]
pub async fn get_popular_recommendations(
    state: web::Data<RecommendationHandlerState>,
    customer_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let products = state
        .service
        .popular_unseen_recommendations(Some(customer_id.as_str()))
        .await?;
    Ok(HttpResponse::Ok().json(products))
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "product-ranking-service"
    }))
}

pub async fn readiness_check(state: web::Data<RecommendationHandlerState>) -> HttpResponse {
    match state.service.check_store().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ready",
            "service": "product-ranking-service"
        })),
        Err(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unavailable",
            "service": "product-ranking-service"
        })),
    }
}

/// Register every route on an actix `App` or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_products_for_customer)
        .service(get_top_picks)
        .service(get_products)
        .service(get_top_mix_picks)
        .service(get_cart_recommendations)
        .service(get_similar_customer_recommendations)
        .service(get_popular_recommendations)
        .route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check))
        .route("/metrics", web::get().to(crate::metrics::metrics_handler));
}

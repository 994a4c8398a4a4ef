use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Catalog row as read from the store.
///
/// `interaction_count` and `interaction_orders` are maintained by the store;
/// ranking treats them as given inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub category_id: i64,
    pub size: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub interaction_count: i64,
    pub interaction_orders: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    View,
    Cart,
    Purchase,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Cart => "cart",
            Self::Purchase => "purchase",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "view" => Some(Self::View),
            "cart" => Some(Self::Cart),
            "purchase" => Some(Self::Purchase),
            _ => None,
        }
    }
}

/// One customer action on one product. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub customer_id: String,
    pub product_code: String,
    pub interaction_type: InteractionType,
    pub interaction_count: i64,
    pub timestamp: DateTime<Utc>,
}

/// Narrows an interaction fetch. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionFilter {
    pub customer_id: Option<String>,
    pub interaction_type: Option<InteractionType>,
}

impl InteractionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_customer(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
            interaction_type: None,
        }
    }

    pub fn with_type(mut self, interaction_type: InteractionType) -> Self {
        self.interaction_type = Some(interaction_type);
        self
    }

    pub fn matches(&self, record: &InteractionRecord) -> bool {
        self.customer_id
            .as_deref()
            .map_or(true, |id| id == record.customer_id)
            && self
                .interaction_type
                .map_or(true, |t| t == record.interaction_type)
    }
}

// ========================================
// Response records
// ========================================

/// Product joined with its category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithCategory {
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    pub interaction_count: i64,
    pub interaction_orders: i64,
    pub category_id: i64,
    pub category_name: String,
}

impl ProductWithCategory {
    pub fn new(product: &Product, category: &Category) -> Self {
        Self {
            product_id: product.product_id,
            product_code: product.product_code.clone(),
            product_name: product.product_name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity: product.quantity,
            size: product.size.clone(),
            expiration_date: product.expiration_date,
            interaction_count: product.interaction_count,
            interaction_orders: product.interaction_orders,
            category_id: category.category_id,
            category_name: category.category_name.clone(),
        }
    }
}

/// Product without the category join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub interaction_count: i64,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.product_id,
            product_code: product.product_code.clone(),
            product_name: product.product_name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity: product.quantity,
            interaction_count: product.interaction_count,
        }
    }
}

/// A retained cart interaction, flattened with the product it points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartRecommendation {
    pub product_code: String,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub interaction_count: i64,
    pub interaction_type: InteractionType,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub owner_id: String,
    pub branch_id: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub quantity: i64,
    pub unit: Option<String>,
    pub price: Option<f64>,
    #[serde(default = "default_threshold")]
    pub low_stock_threshold: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemRequest {
    pub branch_id: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub low_stock_threshold: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub low_stock_threshold: Option<i64>,
}

/// Signed stock movement: positive restocks, negative consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryListQuery {
    pub branch_id: Option<String>,
}

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    CreateItemRequest, InventoryItem, UpdateItemRequest, DEFAULT_LOW_STOCK_THRESHOLD,
};

pub struct InventoryService {
    supabase: SupabaseClient,
}

fn representation_headers() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        "Prefer",
        reqwest::header::HeaderValue::from_static("return=representation"),
    );
    headers
}

impl InventoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create_item(
        &self,
        owner_id: &str,
        request: CreateItemRequest,
        auth_token: &str,
    ) -> Result<InventoryItem> {
        debug!("Creating inventory item '{}' for owner {}", request.name, owner_id);

        let item_data = json!({
            "id": Uuid::new_v4(),
            "owner_id": owner_id,
            "branch_id": request.branch_id,
            "name": request.name,
            "category": request.category,
            "quantity": request.quantity.unwrap_or(0),
            "unit": request.unit,
            "price": request.price,
            "low_stock_threshold": request.low_stock_threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/inventory",
                Some(auth_token),
                Some(item_data),
                Some(representation_headers()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create inventory item"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn get_item(&self, owner_id: &str, item_id: &str, auth_token: &str) -> Result<InventoryItem> {
        let path = format!(
            "/rest/v1/inventory?id=eq.{}&owner_id=eq.{}",
            item_id, owner_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Inventory item not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn list_items(
        &self,
        owner_id: &str,
        branch_id: Option<&str>,
        auth_token: &str,
    ) -> Result<Vec<InventoryItem>> {
        let mut path = format!("/rest/v1/inventory?owner_id=eq.{}", owner_id);
        if let Some(branch) = branch_id {
            path.push_str(&format!("&branch_id=eq.{}", branch));
        }
        path.push_str("&order=created_at.desc");

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let items: Vec<InventoryItem> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<InventoryItem>, _>>()?;

        Ok(items)
    }

    /// PostgREST cannot compare two columns in a filter, so low-stock
    /// selection happens here over the fetched rows.
    pub async fn list_low_stock(
        &self,
        owner_id: &str,
        branch_id: Option<&str>,
        auth_token: &str,
    ) -> Result<Vec<InventoryItem>> {
        let items = self.list_items(owner_id, branch_id, auth_token).await?;
        Ok(items.into_iter().filter(InventoryItem::is_low_stock).collect())
    }

    pub async fn update_item(
        &self,
        owner_id: &str,
        item_id: &str,
        request: UpdateItemRequest,
        auth_token: &str,
    ) -> Result<InventoryItem> {
        debug!("Updating inventory item: {}", item_id);

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(category) = request.category {
            update_data.insert("category".to_string(), json!(category));
        }
        if let Some(quantity) = request.quantity {
            update_data.insert("quantity".to_string(), json!(quantity));
        }
        if let Some(unit) = request.unit {
            update_data.insert("unit".to_string(), json!(unit));
        }
        if let Some(price) = request.price {
            update_data.insert("price".to_string(), json!(price));
        }
        if let Some(threshold) = request.low_stock_threshold {
            update_data.insert("low_stock_threshold".to_string(), json!(threshold));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!(
            "/rest/v1/inventory?id=eq.{}&owner_id=eq.{}",
            item_id, owner_id
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(Value::Object(update_data)),
                Some(representation_headers()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Inventory item not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    /// Applies a signed stock movement. Read-then-write like the rest of
    /// the backend; the new quantity must not go negative.
    pub async fn adjust_stock(
        &self,
        owner_id: &str,
        item_id: &str,
        delta: i64,
        auth_token: &str,
    ) -> Result<InventoryItem> {
        let item = self.get_item(owner_id, item_id, auth_token).await?;

        let new_quantity = item.quantity + delta;
        if new_quantity < 0 {
            bail!(
                "Cannot remove {} units: only {} in stock",
                delta.unsigned_abs(),
                item.quantity
            );
        }

        debug!(
            "Adjusting stock for '{}': {} -> {}",
            item.name, item.quantity, new_quantity
        );

        let update_data = json!({
            "quantity": new_quantity,
            "updated_at": Utc::now().to_rfc3339()
        });

        let path = format!(
            "/rest/v1/inventory?id=eq.{}&owner_id=eq.{}",
            item_id, owner_id
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(update_data),
                Some(representation_headers()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Inventory item not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn delete_item(&self, owner_id: &str, item_id: &str, auth_token: &str) -> Result<()> {
        debug!("Deleting inventory item: {}", item_id);

        let path = format!(
            "/rest/v1/inventory?id=eq.{}&owner_id=eq.{}",
            item_id, owner_id
        );
        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        Ok(())
    }
}

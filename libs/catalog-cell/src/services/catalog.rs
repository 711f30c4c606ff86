use anyhow::{anyhow, Result};
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    CreateCategoryRequest, CreateServiceRequest, ServiceCategory, ServiceItem,
    UpdateServiceRequest,
};

pub struct CatalogService {
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

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create_category(
        &self,
        owner_id: &str,
        request: CreateCategoryRequest,
        auth_token: &str,
    ) -> Result<ServiceCategory> {
        debug!("Creating category '{}' for owner {}", request.name, owner_id);

        let category_data = json!({
            "id": Uuid::new_v4(),
            "owner_id": owner_id,
            "name": request.name,
            "description": request.description,
            "created_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/service_categories",
                Some(auth_token),
                Some(category_data),
                Some(representation_headers()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create category"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn list_categories(&self, owner_id: &str, auth_token: &str) -> Result<Vec<ServiceCategory>> {
        let path = format!(
            "/rest/v1/service_categories?owner_id=eq.{}&order=created_at.desc",
            owner_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let categories: Vec<ServiceCategory> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<ServiceCategory>, _>>()?;

        Ok(categories)
    }

    pub async fn delete_category(&self, owner_id: &str, category_id: &str, auth_token: &str) -> Result<()> {
        debug!("Deleting category: {}", category_id);

        let path = format!(
            "/rest/v1/service_categories?id=eq.{}&owner_id=eq.{}",
            category_id, owner_id
        );
        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        Ok(())
    }

    pub async fn create_service(
        &self,
        owner_id: &str,
        request: CreateServiceRequest,
        auth_token: &str,
    ) -> Result<ServiceItem> {
        debug!("Creating service '{}' for owner {}", request.name, owner_id);

        let service_data = json!({
            "id": Uuid::new_v4(),
            "owner_id": owner_id,
            "name": request.name,
            "category": request.category,
            "duration": request.duration,
            "price": request.price,
            "description": request.description,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/services",
                Some(auth_token),
                Some(service_data),
                Some(representation_headers()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create service"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn list_services(
        &self,
        owner_id: &str,
        category: Option<&str>,
        auth_token: &str,
    ) -> Result<Vec<ServiceItem>> {
        let mut path = format!("/rest/v1/services?owner_id=eq.{}", owner_id);
        if let Some(category) = category {
            path.push_str(&format!("&category=eq.{}", urlencoding::encode(category)));
        }
        path.push_str("&order=created_at.desc");

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let services: Vec<ServiceItem> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<ServiceItem>, _>>()?;

        Ok(services)
    }

    pub async fn get_service(&self, owner_id: &str, service_id: &str, auth_token: &str) -> Result<ServiceItem> {
        let path = format!(
            "/rest/v1/services?id=eq.{}&owner_id=eq.{}",
            service_id, owner_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Service not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn update_service(
        &self,
        owner_id: &str,
        service_id: &str,
        request: UpdateServiceRequest,
        auth_token: &str,
    ) -> Result<ServiceItem> {
        debug!("Updating service: {}", service_id);

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(category) = request.category {
            update_data.insert("category".to_string(), json!(category));
        }
        if let Some(duration) = request.duration {
            update_data.insert("duration".to_string(), json!(duration));
        }
        if let Some(price) = request.price {
            update_data.insert("price".to_string(), json!(price));
        }
        if let Some(description) = request.description {
            update_data.insert("description".to_string(), json!(description));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!(
            "/rest/v1/services?id=eq.{}&owner_id=eq.{}",
            service_id, owner_id
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
            .ok_or_else(|| anyhow!("Service not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn delete_service(&self, owner_id: &str, service_id: &str, auth_token: &str) -> Result<()> {
        debug!("Deleting service: {}", service_id);

        let path = format!(
            "/rest/v1/services?id=eq.{}&owner_id=eq.{}",
            service_id, owner_id
        );
        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        Ok(())
    }
}

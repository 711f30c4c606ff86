use anyhow::{anyhow, Result};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;
use chrono::Utc;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Branch, CreateBranchRequest, UpdateBranchRequest};

pub struct BranchService {
    supabase: SupabaseClient,
}

impl BranchService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create_branch(
        &self,
        owner_id: &str,
        request: CreateBranchRequest,
        auth_token: &str,
    ) -> Result<Branch> {
        debug!("Creating branch '{}' for owner {}", request.name, owner_id);

        let branch_data = json!({
            "id": Uuid::new_v4(),
            "owner_id": owner_id,
            "name": request.name,
            "address": request.address,
            "phone": request.phone,
            "opening_time": request.opening_time,
            "closing_time": request.closing_time,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/branches",
                Some(auth_token),
                Some(branch_data),
                Some(headers),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create branch"))?;

        let branch: Branch = serde_json::from_value(row)?;
        debug!("Branch created with ID: {}", branch.id);

        Ok(branch)
    }

    pub async fn get_branch(&self, owner_id: &str, branch_id: &str, auth_token: &str) -> Result<Branch> {
        let path = format!(
            "/rest/v1/branches?id=eq.{}&owner_id=eq.{}",
            branch_id, owner_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Branch not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn list_branches(&self, owner_id: &str, auth_token: &str) -> Result<Vec<Branch>> {
        let path = format!(
            "/rest/v1/branches?owner_id=eq.{}&order=created_at.desc",
            owner_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let branches: Vec<Branch> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Branch>, _>>()?;

        Ok(branches)
    }

    pub async fn update_branch(
        &self,
        owner_id: &str,
        branch_id: &str,
        request: UpdateBranchRequest,
        auth_token: &str,
    ) -> Result<Branch> {
        debug!("Updating branch: {}", branch_id);

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(address) = request.address {
            update_data.insert("address".to_string(), json!(address));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(opening_time) = request.opening_time {
            update_data.insert("opening_time".to_string(), json!(opening_time));
        }
        if let Some(closing_time) = request.closing_time {
            update_data.insert("closing_time".to_string(), json!(closing_time));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!(
            "/rest/v1/branches?id=eq.{}&owner_id=eq.{}",
            branch_id, owner_id
        );
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(Value::Object(update_data)),
                Some(headers),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Branch not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn delete_branch(&self, owner_id: &str, branch_id: &str, auth_token: &str) -> Result<()> {
        debug!("Deleting branch: {}", branch_id);

        let path = format!(
            "/rest/v1/branches?id=eq.{}&owner_id=eq.{}",
            branch_id, owner_id
        );
        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        Ok(())
    }
}

use anyhow::{anyhow, Result};
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CreateStaffRequest, Staff, UpdateStaffRequest};

pub struct StaffService {
    supabase: SupabaseClient,
}

impl StaffService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create_staff(
        &self,
        owner_id: &str,
        request: CreateStaffRequest,
        auth_token: &str,
    ) -> Result<Staff> {
        debug!(
            "Creating staff '{}' in branch {} for owner {}",
            request.name, request.branch_id, owner_id
        );

        let staff_data = json!({
            "id": Uuid::new_v4(),
            "owner_id": owner_id,
            "branch_id": request.branch_id,
            "name": request.name,
            "title": request.title,
            "email": request.email,
            "phone": request.phone,
            "working_days": request.working_days,
            "working_hours": request.working_hours,
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
                "/rest/v1/staff",
                Some(auth_token),
                Some(staff_data),
                Some(headers),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create staff member"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn get_staff(&self, owner_id: &str, staff_id: &str, auth_token: &str) -> Result<Staff> {
        let path = format!("/rest/v1/staff?id=eq.{}&owner_id=eq.{}", staff_id, owner_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Staff member not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn list_staff(
        &self,
        owner_id: &str,
        branch_id: Option<&str>,
        auth_token: &str,
    ) -> Result<Vec<Staff>> {
        let mut path = format!("/rest/v1/staff?owner_id=eq.{}", owner_id);
        if let Some(branch) = branch_id {
            path.push_str(&format!("&branch_id=eq.{}", branch));
        }
        path.push_str("&order=created_at.desc");

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let staff: Vec<Staff> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Staff>, _>>()?;

        Ok(staff)
    }

    pub async fn update_staff(
        &self,
        owner_id: &str,
        staff_id: &str,
        request: UpdateStaffRequest,
        auth_token: &str,
    ) -> Result<Staff> {
        debug!("Updating staff member: {}", staff_id);

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(title) = request.title {
            update_data.insert("title".to_string(), json!(title));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(working_days) = request.working_days {
            update_data.insert("working_days".to_string(), json!(working_days));
        }
        if let Some(working_hours) = request.working_hours {
            update_data.insert("working_hours".to_string(), json!(working_hours));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/staff?id=eq.{}&owner_id=eq.{}", staff_id, owner_id);
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
            .ok_or_else(|| anyhow!("Staff member not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn delete_staff(&self, owner_id: &str, staff_id: &str, auth_token: &str) -> Result<()> {
        debug!("Deleting staff member: {}", staff_id);

        let path = format!("/rest/v1/staff?id=eq.{}&owner_id=eq.{}", staff_id, owner_id);
        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        Ok(())
    }
}

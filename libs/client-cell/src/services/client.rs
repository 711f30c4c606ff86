use anyhow::{anyhow, Result};
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Client, CreateClientRequest, UpdateClientRequest};

pub struct ClientService {
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

impl ClientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create_client(
        &self,
        owner_id: &str,
        request: CreateClientRequest,
        auth_token: &str,
    ) -> Result<Client> {
        debug!("Creating client '{}' for owner {}", request.name, owner_id);

        let client_data = json!({
            "id": Uuid::new_v4(),
            "owner_id": owner_id,
            "name": request.name,
            "email": request.email,
            "phone": request.phone,
            "notes": request.notes,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/clients",
                Some(auth_token),
                Some(client_data),
                Some(representation_headers()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create client"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn get_client(&self, owner_id: &str, client_id: &str, auth_token: &str) -> Result<Client> {
        let path = format!(
            "/rest/v1/clients?id=eq.{}&owner_id=eq.{}",
            client_id, owner_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Client not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    /// Lists clients, optionally narrowed by a case-insensitive match on
    /// name, phone or email.
    pub async fn list_clients(
        &self,
        owner_id: &str,
        search: Option<&str>,
        auth_token: &str,
    ) -> Result<Vec<Client>> {
        let mut path = format!("/rest/v1/clients?owner_id=eq.{}", owner_id);
        if let Some(term) = search {
            let pattern = format!("*{}*", term);
            let encoded = urlencoding::encode(&pattern);
            path.push_str(&format!(
                "&or=(name.ilike.{},phone.ilike.{},email.ilike.{})",
                encoded, encoded, encoded
            ));
        }
        path.push_str("&order=created_at.desc");

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let clients: Vec<Client> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Client>, _>>()?;

        Ok(clients)
    }

    pub async fn update_client(
        &self,
        owner_id: &str,
        client_id: &str,
        request: UpdateClientRequest,
        auth_token: &str,
    ) -> Result<Client> {
        debug!("Updating client: {}", client_id);

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(notes) = request.notes {
            update_data.insert("notes".to_string(), json!(notes));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!(
            "/rest/v1/clients?id=eq.{}&owner_id=eq.{}",
            client_id, owner_id
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
            .ok_or_else(|| anyhow!("Client not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn delete_client(&self, owner_id: &str, client_id: &str, auth_token: &str) -> Result<()> {
        debug!("Deleting client: {}", client_id);

        let path = format!(
            "/rest/v1/clients?id=eq.{}&owner_id=eq.{}",
            client_id, owner_id
        );
        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        Ok(())
    }
}

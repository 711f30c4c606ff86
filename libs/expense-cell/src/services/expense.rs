use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CreateExpenseRequest, Expense, UpdateExpenseRequest};

pub struct ExpenseService {
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

impl ExpenseService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create_expense(
        &self,
        owner_id: &str,
        request: CreateExpenseRequest,
        auth_token: &str,
    ) -> Result<Expense> {
        debug!("Creating expense '{}' for owner {}", request.title, owner_id);

        let expense_data = json!({
            "id": Uuid::new_v4(),
            "owner_id": owner_id,
            "branch_id": request.branch_id,
            "title": request.title,
            "category": request.category,
            "amount": request.amount,
            "date": request.date,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/expenses",
                Some(auth_token),
                Some(expense_data),
                Some(representation_headers()),
            )
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create expense"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn get_expense(&self, owner_id: &str, expense_id: &str, auth_token: &str) -> Result<Expense> {
        let path = format!(
            "/rest/v1/expenses?id=eq.{}&owner_id=eq.{}",
            expense_id, owner_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Expense not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn list_expenses(
        &self,
        owner_id: &str,
        branch_id: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        auth_token: &str,
    ) -> Result<Vec<Expense>> {
        let mut path = format!("/rest/v1/expenses?owner_id=eq.{}", owner_id);
        if let Some(branch) = branch_id {
            path.push_str(&format!("&branch_id=eq.{}", branch));
        }
        if let Some(from) = from {
            path.push_str(&format!("&date=gte.{}", from));
        }
        if let Some(to) = to {
            path.push_str(&format!("&date=lte.{}", to));
        }
        path.push_str("&order=date.desc");

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let expenses: Vec<Expense> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Expense>, _>>()?;

        Ok(expenses)
    }

    pub async fn update_expense(
        &self,
        owner_id: &str,
        expense_id: &str,
        request: UpdateExpenseRequest,
        auth_token: &str,
    ) -> Result<Expense> {
        debug!("Updating expense: {}", expense_id);

        let mut update_data = serde_json::Map::new();

        if let Some(title) = request.title {
            update_data.insert("title".to_string(), json!(title));
        }
        if let Some(category) = request.category {
            update_data.insert("category".to_string(), json!(category));
        }
        if let Some(amount) = request.amount {
            update_data.insert("amount".to_string(), json!(amount));
        }
        if let Some(date) = request.date {
            update_data.insert("date".to_string(), json!(date));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!(
            "/rest/v1/expenses?id=eq.{}&owner_id=eq.{}",
            expense_id, owner_id
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
            .ok_or_else(|| anyhow!("Expense not found"))?;

        Ok(serde_json::from_value(row)?)
    }

    pub async fn delete_expense(&self, owner_id: &str, expense_id: &str, auth_token: &str) -> Result<()> {
        debug!("Deleting expense: {}", expense_id);

        let path = format!(
            "/rest/v1/expenses?id=eq.{}&owner_id=eq.{}",
            expense_id, owner_id
        );
        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        Ok(())
    }
}

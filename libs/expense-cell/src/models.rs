use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub owner_id: String,
    pub branch_id: Option<String>,
    pub title: String,
    pub category: Option<String>,
    pub amount: f64,
    pub date: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpenseRequest {
    pub branch_id: Option<String>,
    pub title: String,
    pub category: Option<String>,
    pub amount: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExpenseRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseListQuery {
    pub branch_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub owner_id: String,
    pub branch_id: String,
    pub name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Short weekday names, e.g. ["Mon", "Tue"].
    #[serde(default)]
    pub working_days: Vec<String>,
    pub working_hours: Option<WorkingHours>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStaffRequest {
    pub branch_id: String,
    pub name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub working_days: Vec<String>,
    pub working_hours: Option<WorkingHours>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub working_days: Option<Vec<String>>,
    pub working_hours: Option<WorkingHours>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaffListQuery {
    pub branch_id: Option<String>,
}

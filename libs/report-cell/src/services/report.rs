use std::collections::HashMap;

use anyhow::Result;
use chrono::{Duration, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AppointmentRow, ExpenseRow, ReportPeriod, ReportSummary, ServicePriceRow};
use crate::services::summary::build_summary;

pub struct ReportService {
    supabase: SupabaseClient,
}

impl ReportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Fetches both report windows in one query per table (everything
    /// from the previous window start onward) and aggregates in memory.
    pub async fn summary(
        &self,
        owner_id: &str,
        branch_id: Option<&str>,
        period: ReportPeriod,
        auth_token: &str,
    ) -> Result<ReportSummary> {
        let today = Utc::now().date_naive();
        let fetch_from = today - Duration::days(period.days() * 2);

        debug!(
            "Building {}-day report for owner {} from {}",
            period.days(),
            owner_id,
            fetch_from
        );

        let appointments = self
            .fetch_appointments(owner_id, branch_id, &fetch_from.to_string(), auth_token)
            .await?;
        let expenses = self
            .fetch_expenses(owner_id, branch_id, &fetch_from.to_string(), auth_token)
            .await?;
        let service_prices = self.fetch_service_prices(owner_id, auth_token).await?;

        Ok(build_summary(
            &appointments,
            &expenses,
            &service_prices,
            period,
            today,
        ))
    }

    async fn fetch_appointments(
        &self,
        owner_id: &str,
        branch_id: Option<&str>,
        from: &str,
        auth_token: &str,
    ) -> Result<Vec<AppointmentRow>> {
        let mut path = format!(
            "/rest/v1/appointments?owner_id=eq.{}&date=gte.{}&select=service,price,status,date",
            owner_id, from
        );
        if let Some(branch) = branch_id {
            path.push_str(&format!("&branch_id=eq.{}", branch));
        }

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let appointments: Vec<AppointmentRow> = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<AppointmentRow>, _>>()?;

        Ok(appointments)
    }

    async fn fetch_expenses(
        &self,
        owner_id: &str,
        branch_id: Option<&str>,
        from: &str,
        auth_token: &str,
    ) -> Result<Vec<ExpenseRow>> {
        let mut path = format!(
            "/rest/v1/expenses?owner_id=eq.{}&date=gte.{}&select=category,amount,date",
            owner_id, from
        );
        if let Some(branch) = branch_id {
            path.push_str(&format!("&branch_id=eq.{}", branch));
        }

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let expenses: Vec<ExpenseRow> = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<ExpenseRow>, _>>()?;

        Ok(expenses)
    }

    async fn fetch_service_prices(
        &self,
        owner_id: &str,
        auth_token: &str,
    ) -> Result<HashMap<String, f64>> {
        let path = format!(
            "/rest/v1/services?owner_id=eq.{}&select=name,price",
            owner_id
        );

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let mut prices = HashMap::new();
        for row in rows {
            let service: ServicePriceRow = serde_json::from_value(row)?;
            if let Some(price) = service.price {
                prices.insert(service.name, price);
            }
        }

        Ok(prices)
    }
}

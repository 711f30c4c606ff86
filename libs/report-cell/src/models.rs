use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Week,
    Month,
    Year,
}

impl ReportPeriod {
    /// Unknown or missing keywords fall back to the monthly view.
    pub fn parse(text: Option<&str>) -> Self {
        match text {
            Some("week") => ReportPeriod::Week,
            Some("year") => ReportPeriod::Year,
            _ => ReportPeriod::Month,
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            ReportPeriod::Week => 7,
            ReportPeriod::Month => 30,
            ReportPeriod::Year => 365,
        }
    }
}

/// Appointment fields the report actually reads.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRow {
    pub service: String,
    pub price: Option<f64>,
    pub status: String,
    pub date: NaiveDate,
}

impl AppointmentRow {
    pub fn counts_toward_revenue(&self) -> bool {
        self.status != "Cancelled" && self.status != "Rejected"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseRow {
    pub category: Option<String>,
    pub amount: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServicePriceRow {
    pub name: String,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodMetric {
    pub current: f64,
    pub previous: f64,
    pub trend: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub revenue: PeriodMetric,
    pub expenses: PeriodMetric,
    pub appointments: PeriodMetric,
    pub expense_breakdown: Vec<CategoryTotal>,
    pub revenue_chart: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportQuery {
    pub period: Option<String>,
    pub branch_id: Option<String>,
}

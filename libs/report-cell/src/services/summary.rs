//! Pure aggregation over already-fetched rows. Everything here is
//! deterministic given the reference date, which keeps it unit-testable
//! without a mock server.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{
    AppointmentRow, CategoryTotal, ChartPoint, ExpenseRow, PeriodMetric, ReportPeriod,
    ReportSummary,
};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Percentage change between two window totals, rendered for the
/// dashboard. A flat zero pair is "0%", growth from nothing is capped
/// at "+100%", everything else is a signed one-decimal percentage.
pub fn calculate_trend(current: f64, previous: f64) -> String {
    if previous == 0.0 {
        if current == 0.0 {
            return "0%".to_string();
        }
        return "+100%".to_string();
    }

    let change = (current - previous) / previous * 100.0;
    format!("{:+.1}%", change)
}

fn metric(current: f64, previous: f64) -> PeriodMetric {
    PeriodMetric {
        current,
        previous,
        trend: calculate_trend(current, previous),
    }
}

/// Resolves the amount an appointment contributes to revenue: its own
/// price when set, otherwise the catalog price of its service, zero
/// when neither resolves.
pub fn appointment_revenue(row: &AppointmentRow, service_prices: &HashMap<String, f64>) -> f64 {
    if !row.counts_toward_revenue() {
        return 0.0;
    }
    row.price
        .or_else(|| service_prices.get(&row.service).copied())
        .unwrap_or(0.0)
}

/// Buckets dated revenue points into the chart series: month short
/// names in calendar order for the yearly view, day of month in
/// numeric order otherwise.
pub fn bucket_revenue(points: &[(NaiveDate, f64)], period: ReportPeriod) -> Vec<ChartPoint> {
    let mut buckets: HashMap<u32, f64> = HashMap::new();

    for (date, value) in points {
        let key = match period {
            ReportPeriod::Year => date.month(),
            _ => date.day(),
        };
        *buckets.entry(key).or_insert(0.0) += value;
    }

    let mut keys: Vec<u32> = buckets.keys().copied().collect();
    keys.sort_unstable();

    keys.into_iter()
        .map(|key| {
            let label = match period {
                ReportPeriod::Year => MONTH_LABELS[(key - 1) as usize].to_string(),
                _ => key.to_string(),
            };
            ChartPoint {
                label,
                value: buckets[&key],
            }
        })
        .collect()
}

/// Builds the dashboard summary from pre-fetched rows. The current
/// window is `(today - period, today]`, the previous window the
/// equal-length stretch before it.
pub fn build_summary(
    appointments: &[AppointmentRow],
    expenses: &[ExpenseRow],
    service_prices: &HashMap<String, f64>,
    period: ReportPeriod,
    today: NaiveDate,
) -> ReportSummary {
    let current_start = today - Duration::days(period.days());
    let previous_start = today - Duration::days(period.days() * 2);

    let in_current = |date: NaiveDate| date > current_start && date <= today;
    let in_previous = |date: NaiveDate| date > previous_start && date <= current_start;

    let mut revenue_current = 0.0;
    let mut revenue_previous = 0.0;
    let mut count_current = 0u32;
    let mut count_previous = 0u32;
    let mut chart_points: Vec<(NaiveDate, f64)> = Vec::new();

    for row in appointments {
        let amount = appointment_revenue(row, service_prices);
        if in_current(row.date) {
            revenue_current += amount;
            count_current += 1;
            if row.counts_toward_revenue() {
                chart_points.push((row.date, amount));
            }
        } else if in_previous(row.date) {
            revenue_previous += amount;
            count_previous += 1;
        }
    }

    let mut expense_current = 0.0;
    let mut expense_previous = 0.0;
    let mut breakdown: HashMap<String, f64> = HashMap::new();

    for row in expenses {
        if in_current(row.date) {
            expense_current += row.amount;
            let category = row.category.clone().unwrap_or_else(|| "Other".to_string());
            *breakdown.entry(category).or_insert(0.0) += row.amount;
        } else if in_previous(row.date) {
            expense_previous += row.amount;
        }
    }

    let mut expense_breakdown: Vec<CategoryTotal> = breakdown
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    expense_breakdown.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ReportSummary {
        revenue: metric(revenue_current, revenue_previous),
        expenses: metric(expense_current, expense_previous),
        appointments: metric(count_current as f64, count_previous as f64),
        expense_breakdown,
        revenue_chart: bucket_revenue(&chart_points, period),
    }
}

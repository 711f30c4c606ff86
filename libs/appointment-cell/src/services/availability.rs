use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, BookingError, StaffMember, ANY_STAFF};
use crate::services::schedule::{self, DEFAULT_DURATION_MINUTES};

/// Staff-side booking validation: working days, working hours and overlap
/// against the staff member's existing non-cancelled appointments.
pub struct AvailabilityService {
    supabase: Arc<SupabaseClient>,
}

impl AvailabilityService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Validate a requested interval for the selected staff member.
    ///
    /// The "Any" selector skips every staff-specific check. An unresolvable
    /// selector also passes (with a warning): the booking proceeds
    /// unchecked rather than failing on stale staff references.
    pub async fn check_staff_availability(
        &self,
        owner_id: &str,
        selector: &str,
        branch_id: &str,
        date: NaiveDate,
        start: u32,
        duration: u32,
        auth_token: Option<&str>,
    ) -> Result<(), BookingError> {
        if selector == ANY_STAFF {
            return Ok(());
        }

        let staff = self
            .resolve_staff(owner_id, selector, branch_id, auth_token)
            .await?;

        let Some(staff) = staff else {
            warn!(
                "Staff '{}' could not be resolved in branch {}; skipping availability checks",
                selector, branch_id
            );
            return Ok(());
        };

        let weekday = weekday_label(date);
        if !staff.working_days.is_empty() && !staff.working_days.contains(&weekday) {
            return Err(BookingError::StaffDayOff {
                staff: staff.name,
                weekday,
            });
        }

        let end = start + duration;

        if let Some(hours) = &staff.working_hours {
            let work_start = schedule::parse_clock(&hours.start)?;
            let work_end = schedule::parse_clock(&hours.end)?;

            if start < work_start || end > work_end {
                return Err(BookingError::OutsideWorkingHours {
                    staff: staff.name.clone(),
                    start: hours.start.clone(),
                    end: hours.end.clone(),
                });
            }
        }

        let existing = self
            .fetch_staff_appointments(owner_id, &staff, branch_id, date, auth_token)
            .await?;

        if existing.is_empty() {
            return Ok(());
        }

        debug!(
            "Checking {} existing appointments for {} on {}",
            existing.len(),
            staff.name,
            date
        );

        let durations = self
            .fetch_service_durations(owner_id, &existing, auth_token)
            .await?;

        for appointment in existing {
            // Stored times that no longer parse cannot block a slot.
            let Ok(booked_start) = schedule::parse_clock(&appointment.time) else {
                warn!(
                    "Appointment {} has unparseable time '{}'",
                    appointment.id, appointment.time
                );
                continue;
            };

            let booked_duration = durations
                .get(&appointment.service)
                .copied()
                .unwrap_or(DEFAULT_DURATION_MINUTES);

            if schedule::intervals_overlap(start, end, booked_start, booked_start + booked_duration)
            {
                return Err(BookingError::StaffAlreadyBooked { staff: staff.name });
            }
        }

        Ok(())
    }

    /// Resolve a staff selector: UUID lookup first, then name lookup within
    /// the branch.
    async fn resolve_staff(
        &self,
        owner_id: &str,
        selector: &str,
        branch_id: &str,
        auth_token: Option<&str>,
    ) -> Result<Option<StaffMember>, BookingError> {
        if let Ok(id) = Uuid::parse_str(selector) {
            let path = format!("/rest/v1/staff?id=eq.{}&owner_id=eq.{}", id, owner_id);
            let rows: Vec<Value> = self
                .supabase
                .request(Method::GET, &path, auth_token, None)
                .await
                .map_err(|e| BookingError::Database(e.to_string()))?;

            if let Some(row) = rows.into_iter().next() {
                let staff: StaffMember = serde_json::from_value(row)
                    .map_err(|e| BookingError::Database(format!("Failed to parse staff: {}", e)))?;
                return Ok(Some(staff));
            }
        }

        let path = format!(
            "/rest/v1/staff?owner_id=eq.{}&branch_id=eq.{}&name=eq.{}",
            owner_id,
            branch_id,
            urlencoding::encode(selector)
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        match rows.into_iter().next() {
            Some(row) => {
                let staff: StaffMember = serde_json::from_value(row)
                    .map_err(|e| BookingError::Database(format!("Failed to parse staff: {}", e)))?;
                Ok(Some(staff))
            }
            None => Ok(None),
        }
    }

    /// Same-branch, same-date appointments for this staff member (matched by
    /// id or name), excluding cancelled and rejected ones.
    async fn fetch_staff_appointments(
        &self,
        owner_id: &str,
        staff: &StaffMember,
        branch_id: &str,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> Result<Vec<Appointment>, BookingError> {
        let staff_match = format!(
            "(staff.eq.{},staff.eq.{})",
            urlencoding::encode(&staff.id.to_string()),
            urlencoding::encode(&staff.name)
        );

        let path = format!(
            "/rest/v1/appointments?owner_id=eq.{}&branch_id=eq.{}&date=eq.{}&status=not.in.(Cancelled,Rejected)&or={}&order=time.asc",
            owner_id, branch_id, date, staff_match
        );

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| BookingError::Database(format!("Failed to parse appointments: {}", e)))
    }

    /// One batch fetch of the services referenced by the given appointments,
    /// mapped to their parsed durations.
    async fn fetch_service_durations(
        &self,
        owner_id: &str,
        appointments: &[Appointment],
        auth_token: Option<&str>,
    ) -> Result<HashMap<String, u32>, BookingError> {
        let names: HashSet<&str> = appointments.iter().map(|a| a.service.as_str()).collect();
        if names.is_empty() {
            return Ok(HashMap::new());
        }

        let quoted: Vec<String> = names
            .iter()
            .map(|name| format!("\"{}\"", name.replace('"', "")))
            .collect();
        let path = format!(
            "/rest/v1/services?owner_id=eq.{}&name=in.({})",
            owner_id,
            urlencoding::encode(&quoted.join(","))
        );

        let rows: Vec<crate::models::ServiceRecord> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|service| {
                let minutes = schedule::parse_duration(service.duration.as_deref());
                (service.name, minutes)
            })
            .collect())
    }
}

/// Short weekday label the working-days set stores ("Mon", "Tue", ...).
/// chrono's `%a` is locale-independent English, which pins down the
/// behavior the original left to deployment locale.
pub fn weekday_label(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_labels_are_short_english_names() {
        // 2025-01-06 is a Monday.
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(weekday_label(date), "Mon");
        assert_eq!(weekday_label(date.succ_opt().unwrap()), "Tue");
    }
}

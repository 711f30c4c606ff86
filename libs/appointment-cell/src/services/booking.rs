use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentStatus, AvailableSlotsQuery, BookAppointmentRequest, BookingError,
    BranchHours, ServiceRecord, Slot, ANY_STAFF, DEFAULT_CLOSING_TIME, DEFAULT_OPENING_TIME,
};
use crate::services::availability::AvailabilityService;
use crate::services::schedule;

pub struct BookingService {
    supabase: Arc<SupabaseClient>,
    availability: AvailabilityService,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        Self {
            availability: AvailabilityService::new(supabase.clone()),
            supabase,
        }
    }

    /// Book a new appointment: parse the requested interval, run the staff
    /// availability check and insert a Pending record.
    ///
    /// The check-then-insert is not atomic; two concurrent requests for the
    /// same slot can both pass. See DESIGN.md for the deferred reservation
    /// hardening.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
        auth_token: Option<&str>,
    ) -> Result<Appointment, BookingError> {
        if request.customer_name.trim().is_empty() {
            return Err(BookingError::Validation("Customer name is required".to_string()));
        }
        if request.service.trim().is_empty() {
            return Err(BookingError::Validation("Service is required".to_string()));
        }

        // The branch row pins the booking to its tenant.
        let branch = self.fetch_branch(&request.branch_id, auth_token).await?;

        let start = schedule::parse_clock(&request.time)?;
        let service = self
            .fetch_service(&branch.owner_id, &request.service, auth_token)
            .await?;
        let duration =
            schedule::parse_duration(service.as_ref().and_then(|s| s.duration.as_deref()));

        let staff = request
            .staff
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| ANY_STAFF.to_string());

        self.availability
            .check_staff_availability(
                &branch.owner_id,
                &staff,
                &request.branch_id,
                request.date,
                start,
                duration,
                auth_token,
            )
            .await?;

        let price = request
            .price
            .or_else(|| service.as_ref().and_then(|s| s.price));

        let now = Utc::now();
        let record = json!({
            "id": Uuid::new_v4(),
            "owner_id": branch.owner_id,
            "branch_id": request.branch_id,
            "customer_name": request.customer_name,
            "email": request.email,
            "phone": request.phone,
            "category": request.category,
            "service": request.service,
            "staff": staff,
            "date": request.date,
            "time": request.time,
            "notes": request.notes,
            "price": price,
            "status": AppointmentStatus::Pending,
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339()
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
                "/rest/v1/appointments",
                auth_token,
                Some(record),
                Some(headers),
            )
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| BookingError::Database("Failed to create appointment".to_string()))?;

        let appointment: Appointment = serde_json::from_value(row)
            .map_err(|e| BookingError::Database(format!("Failed to parse appointment: {}", e)))?;

        debug!("Appointment booked with ID: {}", appointment.id);
        Ok(appointment)
    }

    /// Ordered slot listing for a branch day: fixed 30-minute grid between
    /// the branch's opening and closing time, with slots marked unavailable
    /// on an exact time-label match against non-cancelled appointments.
    pub async fn available_slots(
        &self,
        query: AvailableSlotsQuery,
        auth_token: Option<&str>,
    ) -> Result<Vec<Slot>, BookingError> {
        let branch = self.fetch_branch(&query.branch_id, auth_token).await?;

        let opening = schedule::parse_clock(
            branch.opening_time.as_deref().unwrap_or(DEFAULT_OPENING_TIME),
        )?;
        let closing = schedule::parse_clock(
            branch.closing_time.as_deref().unwrap_or(DEFAULT_CLOSING_TIME),
        )?;

        let booked = self
            .fetch_booked_times(
                &branch.owner_id,
                &query.branch_id,
                query.date,
                query.staff.as_deref(),
                auth_token,
            )
            .await?;

        Ok(schedule::build_slots(opening, closing, &booked))
    }

    pub async fn list_appointments(
        &self,
        owner_id: &str,
        branch_id: Option<&str>,
        status: Option<AppointmentStatus>,
        auth_token: Option<&str>,
    ) -> Result<Vec<Appointment>, BookingError> {
        let mut path = format!(
            "/rest/v1/appointments?owner_id=eq.{}&order=created_at.desc",
            owner_id
        );
        if let Some(branch) = branch_id {
            path.push_str(&format!("&branch_id=eq.{}", branch));
        }
        if let Some(status) = status {
            path.push_str(&format!("&status=eq.{}", status));
        }

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

    pub async fn get_appointment(
        &self,
        owner_id: &str,
        appointment_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Appointment, BookingError> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&owner_id=eq.{}",
            appointment_id, owner_id
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        let row = rows.into_iter().next().ok_or(BookingError::NotFound)?;
        serde_json::from_value(row)
            .map_err(|e| BookingError::Database(format!("Failed to parse appointment: {}", e)))
    }

    pub async fn update_status(
        &self,
        owner_id: &str,
        appointment_id: Uuid,
        status: AppointmentStatus,
        auth_token: Option<&str>,
    ) -> Result<Appointment, BookingError> {
        debug!("Updating appointment {} status to {}", appointment_id, status);

        let path = format!(
            "/rest/v1/appointments?id=eq.{}&owner_id=eq.{}",
            appointment_id, owner_id
        );
        let update = json!({
            "status": status,
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, auth_token, Some(update), Some(headers))
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        let row = result.into_iter().next().ok_or(BookingError::NotFound)?;
        serde_json::from_value(row)
            .map_err(|e| BookingError::Database(format!("Failed to parse appointment: {}", e)))
    }

    async fn fetch_branch(
        &self,
        branch_id: &str,
        auth_token: Option<&str>,
    ) -> Result<BranchHours, BookingError> {
        let path = format!("/rest/v1/branches?id=eq.{}", branch_id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        let row = rows.into_iter().next().ok_or(BookingError::BranchNotFound)?;
        serde_json::from_value(row)
            .map_err(|e| BookingError::Database(format!("Failed to parse branch: {}", e)))
    }

    async fn fetch_service(
        &self,
        owner_id: &str,
        name: &str,
        auth_token: Option<&str>,
    ) -> Result<Option<ServiceRecord>, BookingError> {
        let path = format!(
            "/rest/v1/services?owner_id=eq.{}&name=eq.{}",
            owner_id,
            urlencoding::encode(name)
        );
        let rows: Vec<ServiceRecord> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        Ok(rows.into_iter().next())
    }

    async fn fetch_booked_times(
        &self,
        owner_id: &str,
        branch_id: &str,
        date: NaiveDate,
        staff: Option<&str>,
        auth_token: Option<&str>,
    ) -> Result<Vec<String>, BookingError> {
        let mut path = format!(
            "/rest/v1/appointments?owner_id=eq.{}&branch_id=eq.{}&date=eq.{}&status=not.in.(Cancelled,Rejected)",
            owner_id, branch_id, date
        );
        if let Some(staff) = staff.filter(|s| *s != ANY_STAFF && !s.trim().is_empty()) {
            path.push_str(&format!("&staff=eq.{}", urlencoding::encode(staff)));
        }

        let rows: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|a| a.time).collect())
    }
}

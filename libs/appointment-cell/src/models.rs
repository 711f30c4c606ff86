use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff selector meaning "no preference"; skips every staff-specific check.
pub const ANY_STAFF: &str = "Any";

pub const DEFAULT_OPENING_TIME: &str = "9:00 AM";
pub const DEFAULT_CLOSING_TIME: &str = "9:00 PM";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub owner_id: String,
    pub branch_id: String,
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
    pub service: String,
    pub staff: String,
    pub date: NaiveDate,
    pub time: String,
    pub notes: Option<String>,
    pub price: Option<f64>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cancelled and rejected bookings release their slot; everything else
/// participates in overlap checks and slot listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Rejected,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "Pending"),
            AppointmentStatus::Confirmed => write!(f, "Confirmed"),
            AppointmentStatus::Cancelled => write!(f, "Cancelled"),
            AppointmentStatus::Completed => write!(f, "Completed"),
            AppointmentStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
    pub service: String,
    pub staff: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub notes: Option<String>,
    pub branch_id: String,
    pub price: Option<f64>,
}

/// One entry of the fixed-cadence slot listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub time: String,
    pub available: bool,
}

#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    pub branch_id: String,
    pub date: NaiveDate,
    pub staff: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentListQuery {
    pub branch_id: Option<String>,
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

/// Staff row subset the slot engine reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub branch_id: String,
    pub name: String,
    #[serde(default)]
    pub working_days: Vec<String>,
    pub working_hours: Option<WorkingHours>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

/// Service row subset used for duration and price resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub name: String,
    pub duration: Option<String>,
    pub price: Option<f64>,
}

/// Branch row subset used for slot listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchHours {
    pub id: String,
    pub owner_id: String,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("{staff} does not work on {weekday}")]
    StaffDayOff { staff: String, weekday: String },

    #[error("{staff} only works between {start} and {end}")]
    OutsideWorkingHours {
        staff: String,
        start: String,
        end: String,
    },

    #[error("{staff} is already booked at this time")]
    StaffAlreadyBooked { staff: String },

    #[error("Branch not found")]
    BranchNotFound,

    #[error("Appointment not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

//! Pure slot arithmetic: 12-hour clock parsing, duration parsing, the
//! open-interval overlap test and the fixed-cadence slot grid.
//!
//! Everything here works on minute-of-day offsets (0..1440). Crossing
//! midnight is not supported; closing time is expected after opening time.

use std::sync::OnceLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;

use crate::models::{BookingError, Slot};

pub const SLOT_CADENCE_MINUTES: u32 = 30;
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Parse a 12-hour clock label like "9:00 AM" into minutes since midnight.
///
/// "12:00 AM" is midnight (0) and "12:00 PM" is noon (720). Malformed input
/// is a typed error; callers surface it as a 400.
pub fn parse_clock(text: &str) -> Result<u32, BookingError> {
    let time = NaiveTime::parse_from_str(text.trim().to_uppercase().as_str(), "%I:%M %p")
        .map_err(|_| BookingError::InvalidTime(text.to_string()))?;
    Ok(time.hour() * 60 + time.minute())
}

/// Display label for a minute-of-day offset, no zero padding on the hour.
pub fn format_clock(minutes: u32) -> String {
    let hour24 = (minutes / 60) % 24;
    let minute = minutes % 60;
    let meridiem = if hour24 >= 12 { "PM" } else { "AM" };
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour12, minute, meridiem)
}

static DIGITS: OnceLock<Regex> = OnceLock::new();

/// Duration in minutes from a catalog display string like "45 min".
///
/// Takes the first run of digits and defaults to 30 when the text is absent
/// or carries no digits. "1.5 hrs" therefore reads as 1 minute, matching
/// the catalog data already in production.
pub fn parse_duration(text: Option<&str>) -> u32 {
    let re = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("static pattern is valid"));
    text.and_then(|t| re.find(t))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DEFAULT_DURATION_MINUTES)
}

/// The standard open-interval overlap test used to prevent double-booking.
pub fn intervals_overlap(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> bool {
    a_start < b_end && a_end > b_start
}

/// Fixed-cadence slot grid from opening to (exclusive) closing time.
///
/// A slot is unavailable iff its display label exactly matches one of the
/// booked time strings. No duration reasoning happens here.
pub fn build_slots(opening: u32, closing: u32, booked: &[String]) -> Vec<Slot> {
    let mut slots = Vec::new();
    let mut current = opening;

    while current < closing {
        let label = format_clock(current);
        let available = !booked.iter().any(|time| time == &label);
        slots.push(Slot {
            time: label,
            available,
        });
        current += SLOT_CADENCE_MINUTES;
    }

    slots
}

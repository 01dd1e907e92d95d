//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

/// Generate an id for correlating all log lines of one request
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Format an event date the way the API exposes it (YYYY-MM-DD)
pub fn format_event_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format an event time the way the API exposes it (HH:MM:SS)
pub fn format_event_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

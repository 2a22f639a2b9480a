//! Ordering and classification of report and alert feeds.
//!
//! The server returns reports and alerts unordered, with free-form severity
//! strings and timestamps in more than one format. These helpers put feeds in
//! the order each screen shows them.

use std::cmp::Reverse;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::api::alerts::AdminAlert;
use crate::api::reports::Report;

/// Number of alerts shown on the admin dashboard.
pub const DASHBOARD_ALERT_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// `high` and `major_pothole` are High, `medium` and `minor_pothole` are
    /// Medium, anything else is Low. Case-insensitive.
    pub fn classify(level: &str) -> Self {
        match level.trim().to_ascii_lowercase().as_str() {
            "high" | "major_pothole" => Severity::High,
            "medium" | "minor_pothole" => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        })
    }
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses RFC 3339, or a naive `YYYY-MM-DD[ T]HH:MM:SS[.f]` taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Newest first; reports with unparseable timestamps go last.
pub fn newest_reports_first(mut reports: Vec<Report>) -> Vec<Report> {
    reports.sort_by_key(|report| Reverse(parse_timestamp(&report.created_at)));
    reports
}

/// The `limit` most recent alerts, newest first.
pub fn recent_alerts(mut alerts: Vec<AdminAlert>, limit: usize) -> Vec<AdminAlert> {
    alerts.sort_by_key(|alert| Reverse(parse_timestamp(&alert.alert_timestamp)));
    alerts.truncate(limit);
    alerts
}

/// Unread alerts first, otherwise keeping server order.
pub fn unread_first(mut alerts: Vec<AdminAlert>) -> Vec<AdminAlert> {
    alerts.sort_by_key(|alert| !alert.is_unread());
    alerts
}

pub fn map_link(latitude: f64, longitude: f64) -> String {
    format!("https://www.google.com/maps?q={latitude},{longitude}")
}

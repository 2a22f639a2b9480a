use serde::{Deserialize, Serialize};

use crate::utils::{serde_coord, serde_id};

pub const UNREAD: &str = "Unread";
pub const READ: &str = "Read";

/// An alert as returned by `GET /admin-alerts`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdminAlert {
    #[serde(deserialize_with = "serde_id::integer::deserialize")]
    pub alert_id: i64,
    #[serde(deserialize_with = "serde_id::integer::deserialize")]
    pub report_id: i64,
    #[serde(default)]
    pub alert_status: String,
    #[serde(default)]
    pub alert_timestamp: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "serde_coord::deserialize")]
    pub latitude: f64,
    #[serde(deserialize_with = "serde_coord::deserialize")]
    pub longitude: f64,
    #[serde(default)]
    pub severity_level: String,
    #[serde(default)]
    pub report_status: String,
}

impl AdminAlert {
    pub fn is_unread(&self) -> bool {
        self.alert_status == UNREAD
    }
}

/// A map marker from `GET /admin-alerts-get-locations`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlertLocation {
    #[serde(deserialize_with = "serde_id::integer::deserialize")]
    pub alert_id: i64,
    #[serde(deserialize_with = "serde_coord::deserialize")]
    pub latitude: f64,
    #[serde(deserialize_with = "serde_coord::deserialize")]
    pub longitude: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity_level: String,
}

/// Both alert endpoints wrap their list as `{"alerts": [...]}`; a missing
/// list means no alerts.
#[derive(Debug, Deserialize)]
pub(crate) struct AlertsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub alerts: Vec<T>,
}

/// Body of `PATCH /alerts/{id}`.
#[derive(Debug, Serialize)]
pub(crate) struct AlertStatusUpdate<'a> {
    pub alert_status: &'a str,
}

use serde::{Deserialize, Serialize};

use crate::utils::{serde_coord, serde_id};

/// Body of `POST /geographical-areas`.
#[derive(Debug, Clone, Serialize)]
pub struct NewArea {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Area {
    #[serde(deserialize_with = "serde_id::integer::deserialize")]
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Centre and radius (km) of the area assigned to an administrator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AreaLocation {
    #[serde(deserialize_with = "serde_coord::deserialize")]
    pub latitude: f64,
    #[serde(deserialize_with = "serde_coord::deserialize")]
    pub longitude: f64,
    #[serde(deserialize_with = "serde_coord::deserialize")]
    pub radius: f64,
}

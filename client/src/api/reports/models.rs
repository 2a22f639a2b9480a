use std::path::PathBuf;

use serde::Deserialize;

use crate::utils::{serde_coord, serde_id};

/// A report as returned by `GET /my-reports`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Report {
    #[serde(deserialize_with = "serde_id::integer::deserialize")]
    pub id: i64,
    #[serde(deserialize_with = "serde_id::deserialize")]
    pub user_id: String,
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
    pub status: String,
    #[serde(default)]
    pub created_at: String,
}

/// A report about to be submitted. The image is read from disk at send time.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image: PathBuf,
}

impl NewReport {
    /// File name sent with the upload, `photo.jpg` when the path has none.
    pub fn file_name(&self) -> String {
        self.image
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("photo.jpg")
            .to_string()
    }

    /// `image/<extension>`, or `image/jpeg` for files without one.
    pub fn mime_type(&self) -> String {
        match self
            .image
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
        {
            Some(ext) => format!("image/{}", ext.to_ascii_lowercase()),
            None => "image/jpeg".to_string(),
        }
    }
}

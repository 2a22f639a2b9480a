//! Handler functions for citizen report endpoints.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::info;

use super::models::{NewReport, Report};
use crate::api::ApiClient;
use crate::auth::Session;
use crate::errors::{ClientError, Result};

impl ApiClient {
    /// `GET /my-reports`, in server order.
    pub async fn my_reports(&self, session: &Session) -> Result<Vec<Report>> {
        Self::send_json(self.authorized(Method::GET, "/my-reports", session)).await
    }

    /// `POST /reports` as `multipart/form-data`. Returns the server's JSON
    /// acknowledgement untouched.
    pub async fn submit_report(
        &self,
        session: &Session,
        report: &NewReport,
    ) -> Result<serde_json::Value> {
        if report.description.trim().is_empty() {
            return Err(ClientError::MissingField("description"));
        }

        let bytes = tokio::fs::read(&report.image)
            .await
            .map_err(|source| ClientError::Io {
                path: report.image.clone(),
                source,
            })?;
        let size = bytes.len();

        let image = Part::bytes(bytes)
            .file_name(report.file_name())
            .mime_str(&report.mime_type())?;
        let form = Form::new()
            .text("user_id", session.user_id().to_string())
            .text("description", report.description.clone())
            .text("latitude", report.latitude.to_string())
            .text("longitude", report.longitude.to_string())
            .part("image", image);

        let request = self
            .authorized(Method::POST, "/reports", session)
            .multipart(form);
        let ack = Self::send_value(request).await?;
        info!(bytes = size, "report submitted");
        Ok(ack)
    }
}

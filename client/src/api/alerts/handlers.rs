//! Handler functions for administrator alert endpoints.

use reqwest::Method;

use super::models::{AdminAlert, AlertLocation, AlertStatusUpdate, AlertsEnvelope, READ};
use crate::api::ApiClient;
use crate::auth::Session;
use crate::errors::Result;

impl ApiClient {
    /// `GET /admin-alerts`, in server order.
    pub async fn admin_alerts(&self, session: &Session) -> Result<Vec<AdminAlert>> {
        let envelope: AlertsEnvelope<AdminAlert> =
            Self::send_json(self.authorized(Method::GET, "/admin-alerts", session)).await?;
        Ok(envelope.alerts)
    }

    /// `PATCH /alerts/{id}` setting the status to `Read`.
    pub async fn mark_alert_read(&self, session: &Session, alert_id: i64) -> Result<()> {
        let path = format!("/alerts/{alert_id}");
        let request = self
            .authorized(Method::PATCH, &path, session)
            .json(&AlertStatusUpdate { alert_status: READ });
        Self::send_empty(request).await
    }

    /// `GET /admin-alerts-get-locations`
    pub async fn alert_locations(&self, session: &Session) -> Result<Vec<AlertLocation>> {
        let envelope: AlertsEnvelope<AlertLocation> = Self::send_json(self.authorized(
            Method::GET,
            "/admin-alerts-get-locations",
            session,
        ))
        .await?;
        Ok(envelope.alerts)
    }
}

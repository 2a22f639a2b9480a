//! Handler functions for account and area endpoints.

use reqwest::Method;

use super::models::{Area, AreaLocation, NewArea};
use crate::api::ApiClient;
use crate::auth::{authorize, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Session};
use crate::errors::Result;

impl ApiClient {
    /// `POST /login`
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let request = self
            .request(Method::POST, "/login")
            .json(&LoginRequest { email, password });
        Self::send_json(request).await
    }

    /// `POST /register`
    pub async fn register(&self, body: &RegisterRequest<'_>) -> Result<RegisterResponse> {
        let request = self.request(Method::POST, "/register").json(body);
        Self::send_json(request).await
    }

    /// `POST /geographical-areas`
    pub async fn create_geographical_area(&self, area: &NewArea) -> Result<Area> {
        let request = self.request(Method::POST, "/geographical-areas").json(area);
        Self::send_json(request).await
    }

    /// `GET /user/{id}/location` for the session's own user.
    pub async fn user_location(&self, session: &Session) -> Result<AreaLocation> {
        let url = self.endpoint(&["user", session.user_id(), "location"]);
        Self::send_json(authorize(self.request_to(Method::GET, url), session)).await
    }
}

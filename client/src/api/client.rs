//! HTTP plumbing shared by every endpoint group.
//!
//! `ApiClient` is stateless apart from its connection pool: it never looks at
//! the session store itself. Authenticated calls take a `Session` snapshot and
//! attach its bearer token per request.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::auth::{authorize, Session};
use crate::config::{ClientConfig, ConfigError};
use crate::errors::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let base = Url::parse(base_url.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or(ConfigError::InvalidBaseUrl(base_url))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Fixed route such as `/alerts/3` under the base URL.
    pub(crate) fn url(&self, path: &str) -> Url {
        let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
        self.endpoint(&segments)
    }

    /// Appends `segments` to the base URL, percent-encoding each one, so a
    /// value taken from a session cannot change the route.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Never fails: `new` rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_to(method, self.url(path))
    }

    pub(crate) fn request_to(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "api request");
        self.http.request(method, url)
    }

    pub(crate) fn authorized(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        authorize(self.request(method, path), session)
    }

    /// Sends the request and decodes a JSON body from a 2xx response.
    pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = Self::checked(request.send().await?).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| ClientError::InvalidResponse(err.to_string()))
    }

    /// Like [`send_json`](Self::send_json) but for endpoints whose
    /// acknowledgement body is free-form or empty; an empty body is `Null`.
    pub(crate) async fn send_value(request: RequestBuilder) -> Result<serde_json::Value> {
        let response = Self::checked(request.send().await?).await?;
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&body).map_err(|err| ClientError::InvalidResponse(err.to_string()))
    }

    /// Sends the request and discards the body of a 2xx response.
    pub(crate) async fn send_empty(request: RequestBuilder) -> Result<()> {
        Self::checked(request.send().await?).await?;
        Ok(())
    }

    async fn checked(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }
}

/// Prefers the server's `{"message": ..}`, falling back to the status text.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

//! Global application error types.
//!
//! This module defines the error type returned by every fallible client
//! operation: transport failures, non-success API responses, malformed
//! payloads, and the auth and configuration errors of the layers underneath.
//! Storage failures reach callers wrapped in `AuthError::Persist`.

use std::path::PathBuf;

use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid server response: {0}")]
    InvalidResponse(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// True for a 401 from the server, which means the stored token is stale.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. })
    }
}

//! Client library for the pothole reporting service.
//!
//! The heart of the crate is the session store in [`auth::service`], which owns
//! the logged-in identity and mirrors it to on-device storage. Everything else
//! (the typed HTTP client, navigation gating, feed aggregation) reads from that
//! store or hands it fresh credentials.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod navigation;
pub mod services;
pub mod telemetry;
pub mod utils;

pub use api::ApiClient;
pub use auth::{Role, Session, SessionState, SessionStore};
pub use config::ClientConfig;
pub use errors::{ClientError, Result};
pub use navigation::ScreenGroup;

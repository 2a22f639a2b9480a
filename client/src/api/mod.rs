//! Typed client for the remote pothole API.
//!
//! The API is an external HTTPS service returning JSON. This module groups its
//! endpoints by domain (user and area endpoints, citizen reports, admin
//! alerts); each group adds its calls to [`ApiClient`] in its own `handlers`
//! module and declares the payloads it exchanges in `models`.

pub mod alerts;
pub mod client;
pub mod reports;
pub mod user;

pub use client::ApiClient;

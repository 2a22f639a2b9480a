//! Module for citizen report endpoints.
//!
//! Listing the reports the logged-in user has filed and submitting a new
//! geotagged photo report.

pub mod handlers;
pub mod models;

pub use models::*;

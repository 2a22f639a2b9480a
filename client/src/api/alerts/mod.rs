//! Module for administrator alert endpoints.
//!
//! Alerts are raised by the backend for reports inside an administrator's
//! area. Administrators list them, mark them read, and fetch their positions
//! for the map view.

pub mod handlers;
pub mod models;

pub use models::*;

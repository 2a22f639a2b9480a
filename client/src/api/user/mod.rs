//! Account and area endpoints.
//!
//! Login and registration, the geographical areas administrators are assigned
//! to on sign-up, and the lookup of an administrator's own area.

pub mod handlers;
pub mod models;

pub use models::*;

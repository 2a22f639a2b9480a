//! Authentication module for managing the client's session.
//!
//! This module provides the public interface for the session lifecycle:
//! the persisted `Session` model, the `SessionStore` that owns it, the
//! login/registration flows that feed it, and the bearer-token helper used to
//! authorize outbound requests.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod service;

// Re-exports for convenience
pub use errors::*;
pub use handlers::*;
pub use middleware::*;
pub use models::*;
pub use service::*;

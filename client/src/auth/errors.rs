//! Custom error types specific to session and authorization failures.
//!
//! Storage trouble while establishing a session, gated access to role-specific
//! screens, and role strings the client does not recognize all surface here.

use adapters::StorageError;
use thiserror::Error;

use super::models::Role;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to persist session: {0}")]
    Persist(#[source] StorageError),

    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("session store is still initializing")]
    NotReady,

    #[error("not logged in")]
    NotAuthenticated,

    #[error("this action requires the {required} role but the session is {actual}")]
    Forbidden { required: Role, actual: Role },

    #[error("unknown role {0:?}")]
    InvalidRole(String),
}

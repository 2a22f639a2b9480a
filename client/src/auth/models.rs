//! Data structures for authentication-related entities.
//!
//! This module defines the persisted `Session`, the closed `Role` enum, the
//! observable `SessionState`, and the request/response bodies of the remote
//! login and registration endpoints together with their validated form,
//! `Credentials`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::AuthError;
use crate::utils::serde_id;

/// Access class of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, so `"Admin"` from the server and `admin` on the command
/// line both parse. Persisted sessions go through serde instead and only
/// accept the lowercase form this crate writes.
impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(AuthError::InvalidRole(s.to_string())),
        }
    }
}

/// The authenticated identity. Persisted as
/// `{"token": .., "userId": .., "role": "user" | "admin"}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    token: String,
    user_id: String,
    role: Role,
}

impl Session {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
            role,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

// Keeps bearer tokens out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .finish()
    }
}

/// Snapshot of the session store handed to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub current: Option<Session>,
    pub initializing: bool,
}

impl SessionState {
    pub(crate) fn initializing() -> Self {
        Self {
            current: None,
            initializing: true,
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.initializing
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }
}

/// Identity handed out by the remote API once it has been checked for
/// completeness and its role parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub user_id: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of a successful `POST /login`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "serde_id::option::deserialize")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
    pub location_area: Option<i64>,
}

/// Body of `POST /register`. On success the server returns `{token, id, role}`
/// and may omit the token, in which case the account exists but the user must
/// log in. On failure it returns `{message}`.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "serde_id::option::deserialize")]
    pub id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn credentials_from(
    token: Option<String>,
    user_id: Option<String>,
    role: Option<String>,
) -> Option<Result<Credentials, AuthError>> {
    let token = token.filter(|t| !t.is_empty())?;
    let user_id = user_id.filter(|u| !u.is_empty())?;
    let role = role.filter(|r| !r.is_empty())?;
    Some(role.parse().map(|role| Credentials {
        token,
        user_id,
        role,
    }))
}

impl LoginResponse {
    /// `None` when any of the three fields is missing or empty.
    pub fn into_credentials(self) -> Option<Result<Credentials, AuthError>> {
        credentials_from(self.token, self.user_id, self.role)
    }
}

impl RegisterResponse {
    pub fn into_credentials(self) -> Option<Result<Credentials, AuthError>> {
        credentials_from(self.token, self.id, self.role)
    }
}

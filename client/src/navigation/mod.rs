//! Maps session state to the screen group the user may see.
//!
//! Nothing here is allowed to decide while the session store is still
//! initializing: that state resolves to `Loading`, and role checks report
//! `NotReady` rather than redirecting to the login screen.

use std::fmt;

use crate::auth::{AuthError, Role, Session, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenGroup {
    Loading,
    Guest,
    User,
    Admin,
}

impl ScreenGroup {
    pub fn resolve(state: &SessionState) -> Self {
        if state.initializing {
            return ScreenGroup::Loading;
        }
        match state.session().map(Session::role) {
            None => ScreenGroup::Guest,
            Some(Role::User) => ScreenGroup::User,
            Some(Role::Admin) => ScreenGroup::Admin,
        }
    }

    /// Title of the group's landing screen.
    pub fn title(&self) -> &'static str {
        match self {
            ScreenGroup::Loading => "Loading",
            ScreenGroup::Guest => "Login",
            ScreenGroup::User => "User Dashboard",
            ScreenGroup::Admin => "Admin Dashboard",
        }
    }
}

impl fmt::Display for ScreenGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Returns the session when it may enter screens reserved for `role`.
pub fn require(state: &SessionState, role: Role) -> Result<&Session, AuthError> {
    if state.initializing {
        return Err(AuthError::NotReady);
    }
    let session = state.session().ok_or(AuthError::NotAuthenticated)?;
    if session.role() != role {
        return Err(AuthError::Forbidden {
            required: role,
            actual: session.role(),
        });
    }
    Ok(session)
}

/// Returns any active session, whatever its role.
pub fn require_session(state: &SessionState) -> Result<&Session, AuthError> {
    if state.initializing {
        return Err(AuthError::NotReady);
    }
    state.session().ok_or(AuthError::NotAuthenticated)
}

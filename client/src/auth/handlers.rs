//! Login, registration and logout flows.
//!
//! These functions sit between the remote API and the session store: they
//! check the user's input, call the API, validate what comes back (role
//! included) and only then hand the identity to `SessionStore::login`.

use adapters::KeyValueStore;
use tracing::{info, instrument};

use super::errors::AuthError;
use super::models::{Credentials, RegisterRequest, Role, Session};
use super::service::SessionStore;
use crate::api::user::NewArea;
use crate::api::ApiClient;
use crate::errors::{ClientError, Result};

/// Centre and radius of the area an administrator is responsible for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdminArea {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    /// Required when `role` is `Admin`, ignored otherwise.
    pub area: Option<AdminArea>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The server returned credentials and the session is now active.
    SignedIn(Session),
    /// The account exists but the server issued no token; log in next.
    AccountCreated,
}

fn require(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ClientError::MissingField(field))
    } else {
        Ok(())
    }
}

async fn establish<S: KeyValueStore>(
    store: &SessionStore<S>,
    credentials: Credentials,
) -> Result<Session> {
    let session = store
        .login(credentials.token, credentials.user_id, credentials.role)
        .await?;
    Ok(session)
}

fn validated(
    credentials: Option<std::result::Result<Credentials, AuthError>>,
) -> Result<Option<Credentials>> {
    match credentials {
        Some(Ok(credentials)) => Ok(Some(credentials)),
        Some(Err(err)) => Err(err.into()),
        None => Ok(None),
    }
}

#[instrument(skip(api, store, password))]
pub async fn sign_in<S: KeyValueStore>(
    api: &ApiClient,
    store: &SessionStore<S>,
    email: &str,
    password: &str,
) -> Result<Session> {
    require(email, "email")?;
    require(password, "password")?;

    let response = api.login(email, password).await?;
    let credentials = validated(response.into_credentials())?.ok_or_else(|| {
        ClientError::InvalidResponse("login response is missing token, userId or role".into())
    })?;

    establish(store, credentials).await
}

#[instrument(skip(api, store, registration), fields(email = %registration.email, role = %registration.role))]
pub async fn sign_up<S: KeyValueStore>(
    api: &ApiClient,
    store: &SessionStore<S>,
    registration: &Registration,
) -> Result<SignUpOutcome> {
    require(&registration.name, "name")?;
    require(&registration.email, "email")?;
    require(&registration.password, "password")?;

    let location_area = match (registration.role, registration.area) {
        (Role::Admin, None) => {
            return Err(ClientError::MissingField("latitude, longitude and radius"))
        }
        (Role::Admin, Some(area)) => {
            let created = api
                .create_geographical_area(&NewArea {
                    name: format!("Admin Area for {}", registration.email),
                    latitude: area.latitude,
                    longitude: area.longitude,
                    radius: area.radius_km,
                })
                .await?;
            info!(area_id = created.id, "created geographical area");
            Some(created.id)
        }
        (Role::User, _) => None,
    };

    let response = api
        .register(&RegisterRequest {
            name: &registration.name,
            email: &registration.email,
            password: &registration.password,
            role: registration.role,
            location_area,
        })
        .await?;

    match validated(response.into_credentials())? {
        Some(credentials) => Ok(SignUpOutcome::SignedIn(establish(store, credentials).await?)),
        None => Ok(SignUpOutcome::AccountCreated),
    }
}

pub async fn sign_out<S: KeyValueStore>(store: &SessionStore<S>) {
    store.logout().await;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use adapters::MemoryStore;

    use super::*;

    fn offline_api() -> ApiClient {
        ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn sign_in_rejects_blank_fields_before_any_request() {
        let store = SessionStore::new(MemoryStore::new());
        let err = sign_in(&offline_api(), &store, "  ", "pw").await.unwrap_err();
        assert!(matches!(err, ClientError::MissingField("email")));

        let err = sign_in(&offline_api(), &store, "a@b.c", "").await.unwrap_err();
        assert!(matches!(err, ClientError::MissingField("password")));
    }

    #[tokio::test]
    async fn admin_sign_up_needs_an_area() {
        let store = SessionStore::new(MemoryStore::new());
        let registration = Registration {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "pw".into(),
            role: Role::Admin,
            area: None,
        };
        let err = sign_up(&offline_api(), &store, &registration)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingField(_)));
    }
}

//! Request authorization helpers.
//!
//! Every authenticated endpoint of the remote API expects
//! `Authorization: Bearer <token>`; the token always comes from a `Session`
//! snapshot taken from the session store.

use reqwest::RequestBuilder;

use super::models::Session;

/// Attaches the session's bearer token to an outbound request.
pub fn authorize(request: RequestBuilder, session: &Session) -> RequestBuilder {
    request.bearer_auth(session.token())
}

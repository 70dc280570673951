//! Session cookie handling.
//!
//! The cookie value is the user id itself (token == user id), so there is
//! no separate token table: resolving a session is a lookup in `users`.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::api::rest::error::{internal, map_domain_error};
use crate::api::rest::problem::ProblemResponse;
use crate::contract::model::User;
use crate::domain::service::Service;

/// How the session cookie is named and how long it lives.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    pub max_age: time::Duration,
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self {
            name: "sessionId".to_string(),
            max_age: time::Duration::days(7),
        }
    }
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, max_age_days: i64) -> Self {
        Self {
            name: name.into(),
            max_age: time::Duration::days(max_age_days),
        }
    }

    /// Raw token presented by the caller, if any.
    pub fn read<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(&self.name)
            .map(|c| c.value())
            .filter(|v| !v.is_empty())
    }

    /// Long-lived credential carrying `token` on every subsequent request.
    pub fn issue(&self, token: Uuid) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token.to_string()))
            .path("/")
            .max_age(self.max_age)
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }
}

/// The authenticated caller. Extracting it rejects with 401 when the cookie
/// is missing or does not name a known session, before the handler body or
/// any request payload is looked at.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn session_id(&self) -> Uuid {
        self.0.id
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_owned();

        let service = parts
            .extensions
            .get::<Arc<Service>>()
            .cloned()
            .ok_or_else(|| internal("diet tracker service is not installed", &path))?;
        let cookie = parts
            .extensions
            .get::<SessionCookie>()
            .cloned()
            .unwrap_or_default();

        let jar = CookieJar::from_headers(&parts.headers);
        let user = service
            .authenticate(cookie.read(&jar))
            .await
            .map_err(|e| map_domain_error(&e, &path))?;

        tracing::Span::current().record("session_id", tracing::field::display(user.id));
        Ok(CurrentUser(user))
    }
}

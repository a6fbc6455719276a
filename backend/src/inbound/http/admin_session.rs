//! Admin token extraction and cookie helpers.
//!
//! Admin handlers take an [`AdminSession`] argument; extraction fails with
//! `401 Unauthorized` unless the request carries a valid token in the
//! `token` cookie or an `Authorization: Bearer` header.

use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use chrono::{DateTime, Utc};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{AdminClaims, Error};

use super::state::{CookiePolicy, HttpState};

/// Name of the cookie carrying the admin token.
pub const TOKEN_COOKIE: &str = "token";

/// Claims of the authenticated operator making the request.
#[derive(Debug, Clone)]
pub struct AdminSession(AdminClaims);

impl AdminSession {
    /// Username the token was issued to.
    pub fn username(&self) -> &str {
        self.0.sub.as_str()
    }

    /// Instant after which the token is rejected.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.0.expires_at()
    }
}

/// Pull the raw token from the cookie, falling back to a bearer header.
fn presented_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(TOKEN_COOKIE) {
        let value = cookie.value();
        if !value.is_empty() {
            return Some(value.to_owned());
        }
    }
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

fn authorise(req: &HttpRequest) -> Result<AdminSession, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state not configured"))?;
    let token = presented_token(req).ok_or_else(|| Error::unauthorized("admin token required"))?;
    state
        .admin_gate
        .verify(&token)
        .map(AdminSession)
        .map_err(|err| {
            debug!(error = %err, "admin token rejected");
            Error::unauthorized("invalid or expired admin token")
        })
}

impl FromRequest for AdminSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorise(req))
    }
}

/// Cookie carrying a freshly issued token until `expires_at`.
pub(crate) fn token_cookie(
    token: String,
    expires_at: DateTime<Utc>,
    policy: CookiePolicy,
) -> Cookie<'static> {
    let mut cookie = Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(policy.secure)
        .same_site(policy.same_site)
        .finish();
    if let Ok(expiry) = OffsetDateTime::from_unix_timestamp(expires_at.timestamp()) {
        cookie.set_expires(expiry);
    }
    cookie
}

/// Cookie instructing the client to discard its token.
pub(crate) fn clearing_cookie(policy: CookiePolicy) -> Cookie<'static> {
    let mut cookie = Cookie::build(TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(policy.secure)
        .same_site(policy.same_site)
        .finish();
    cookie.make_removal();
    cookie
}

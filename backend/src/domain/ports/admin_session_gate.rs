//! Driving port for admin login and token checks.
//!
//! Handlers use this port to exchange credentials for a bearer token and to
//! test tokens presented on later requests. There is no server-side session
//! state; logging out only discards the client's copy.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AdminClaims, Error, LoginCredentials, TokenError};

/// Token handed to a freshly authenticated operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminToken {
    /// Opaque signed token.
    pub token: String,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

/// Domain use-case port for admin authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminSessionGate: Send + Sync {
    /// Exchange credentials for a token, or fail with `unauthorized`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminToken, Error>;

    /// Validate a presented token and return its claims.
    fn verify(&self, token: &str) -> Result<AdminClaims, TokenError>;

    /// Shorthand for `verify(token).is_ok()`.
    fn is_valid(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }
}

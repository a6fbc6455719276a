//! Admin session gate backed by signed, stateless tokens.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{AdminSessionGate, AdminToken, CredentialVerifier};
use crate::domain::{
    AdminClaims, Error, LoginCredentials, TokenError, TokenSecret, decode_token, encode_token,
};

/// Lifetime of an issued admin token, in seconds.
pub const ADMIN_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Issues and checks admin tokens.
#[derive(Clone)]
pub struct AdminTokenService {
    verifier: Arc<dyn CredentialVerifier>,
    secret: TokenSecret,
    clock: Arc<dyn Clock>,
}

impl AdminTokenService {
    /// Create a service issuing tokens valid for one hour.
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        secret: TokenSecret,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            verifier,
            secret,
            clock,
        }
    }
}

#[async_trait]
impl AdminSessionGate for AdminTokenService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminToken, Error> {
        if !self.verifier.verify(credentials).await {
            warn!(username = credentials.username(), "admin login rejected");
            return Err(Error::unauthorized("invalid credentials"));
        }

        let now = self.clock.utc();
        let expires_at = now + Duration::seconds(ADMIN_TOKEN_TTL_SECS);
        let claims = AdminClaims {
            sub: credentials.username().to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode_token(&claims, &self.secret)
            .map_err(|err| Error::internal(format!("admin token could not be issued: {err}")))?;
        info!(username = credentials.username(), "admin login accepted");
        Ok(AdminToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<AdminClaims, TokenError> {
        decode_token(token, &self.secret, self.clock.utc())
    }
}

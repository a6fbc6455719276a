//! Driven port checking admin credentials.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::domain::LoginCredentials;

/// Decides whether a username/password pair belongs to an operator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// `true` when the pair is accepted.
    async fn verify(&self, credentials: &LoginCredentials) -> bool;
}

/// Verifier backed by one configured username/password pair.
///
/// Comparisons run over SHA-256 digests so the time taken does not depend on
/// where the inputs first differ.
pub struct FixedCredentialVerifier {
    username: String,
    password_digest: Zeroizing<[u8; 32]>,
}

impl FixedCredentialVerifier {
    /// Accept exactly `username` with `password`.
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            password_digest: Zeroizing::new(digest(password)),
        }
    }
}

impl std::fmt::Debug for FixedCredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedCredentialVerifier")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

fn digests_match(left: &[u8; 32], right: &[u8; 32]) -> bool {
    left.iter()
        .zip(right.iter())
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[async_trait]
impl CredentialVerifier for FixedCredentialVerifier {
    async fn verify(&self, credentials: &LoginCredentials) -> bool {
        let username_ok = digests_match(
            &digest(&self.username),
            &digest(credentials.username()),
        );
        let password_ok = digests_match(
            &self.password_digest,
            &digest(credentials.password()),
        );
        username_ok & password_ok
    }
}

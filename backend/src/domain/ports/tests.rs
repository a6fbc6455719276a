//! Port error and mock wiring coverage.
use super::*;
use crate::domain::{AdminClaims, LoginCredentials, TokenError};
use rstest::rstest;

#[rstest]
#[case(
    AppointmentPersistenceError::connection("refused"),
    "appointment repository connection failed: refused"
)]
#[case(
    AppointmentPersistenceError::query("syntax error"),
    "appointment repository query failed: syntax error"
)]
fn persistence_errors_render_their_message(
    #[case] error: AppointmentPersistenceError,
    #[case] expected: &str,
) {
    assert_eq!(error.to_string(), expected);
}

#[rstest]
fn is_valid_defaults_to_verify_outcome() {
    struct StaticGate;

    #[async_trait::async_trait]
    impl AdminSessionGate for StaticGate {
        async fn authenticate(
            &self,
            _credentials: &LoginCredentials,
        ) -> Result<AdminToken, crate::domain::Error> {
            Err(crate::domain::Error::unauthorized("invalid credentials"))
        }

        fn verify(&self, token: &str) -> Result<AdminClaims, TokenError> {
            match token {
                "good" => Ok(AdminClaims {
                    sub: "admin".to_owned(),
                    iat: 0,
                    exp: 60,
                }),
                _ => Err(TokenError::BadSignature),
            }
        }
    }

    assert!(StaticGate.is_valid("good"));
    assert!(!StaticGate.is_valid("bad"));
}

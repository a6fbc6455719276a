//! Admin login credentials.
//!
//! Inbound adapters turn raw payloads into [`LoginCredentials`] before any
//! port is called, so verifiers only ever see non-empty input. Both fields
//! are compared exactly as submitted.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was blank.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` and `password` are non-empty and keep caller whitespace.
/// - `password` is wiped from memory on drop.
///
/// # Examples
/// ```
/// use clinic_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "secret").unwrap();
/// assert_eq!(creds.username(), " admin ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        if username.trim().is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username as submitted.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password as submitted.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("admin", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts(" admin ", " 1234 ").expect("valid");
        assert_eq!(creds.username(), " admin ");
        assert_eq!(creds.password(), " 1234 ");
    }
}

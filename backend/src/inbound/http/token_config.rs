//! Admin token and cookie configuration.
//!
//! Environment-driven settings for signing admin tokens and shaping the
//! `token` cookie. Debug builds tolerate missing toggles with warnings;
//! release builds require every toggle and a real secret file.

use std::path::PathBuf;

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

use crate::domain::{TOKEN_SECRET_MIN_LEN, TokenSecret};

mod parsing;

use parsing::{BoolEnvConfig, debug_warn_or_error, parse_bool_env, parse_same_site_value};

const SECRET_DEFAULT_PATH: &str = "/var/run/secrets/admin_token_secret";
pub(crate) const SECRET_FILE_ENV: &str = "ADMIN_TOKEN_SECRET_FILE";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "ADMIN_TOKEN_ALLOW_EPHEMERAL";
pub(crate) const COOKIE_SECURE_ENV: &str = "ADMIN_COOKIE_SECURE";
pub(crate) const SAMESITE_ENV: &str = "ADMIN_COOKIE_SAMESITE";

/// Build mode for token configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clinic_backend::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Token settings derived from the environment.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// Key used to sign and verify admin tokens.
    pub secret: TokenSecret,
    /// Whether the `token` cookie is marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for the `token` cookie.
    pub same_site: SameSite,
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file is shorter than the signing minimum.
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("ADMIN_COOKIE_SAMESITE=None requires ADMIN_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must not sign with throwaway secrets.
    #[error("ADMIN_TOKEN_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build token settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use clinic_backend::inbound::http::token_config::{BuildMode, token_settings_from_env};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let secret_path = std::env::temp_dir().join("admin_token_secret_example");
/// std::fs::write(&secret_path, vec![b'k'; 48])?;
///
/// let secret_path = secret_path.to_str().expect("valid path").to_string();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "ADMIN_TOKEN_SECRET_FILE" => Some(secret_path.clone()),
///     "ADMIN_COOKIE_SECURE" => Some("1".to_string()),
///     "ADMIN_COOKIE_SAMESITE" => Some("Strict".to_string()),
///     "ADMIN_TOKEN_ALLOW_EPHEMERAL" => Some("0".to_string()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
/// # Ok(())
/// # }
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let cookie_secure = parse_bool_env(
        env,
        mode,
        BoolEnvConfig::new(COOKIE_SECURE_ENV, true),
        |flag, _| Ok(flag),
    )?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let allow_ephemeral = parse_bool_env(
        env,
        mode,
        BoolEnvConfig::new(ALLOW_EPHEMERAL_ENV, false),
        |flag, mode| {
            if flag && !mode.is_debug() {
                Err(TokenConfigError::EphemeralNotAllowed)
            } else {
                Ok(flag)
            }
        },
    )?;
    let secret = secret_from_env(env, mode, allow_ephemeral)?;

    Ok(TokenSettings {
        secret,
        cookie_secure,
        same_site,
    })
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, TokenConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    match env.string(SAMESITE_ENV) {
        Some(value) => parse_same_site_value(value, mode, cookie_secure, default_same_site),
        None => debug_warn_or_error(
            mode,
            default_same_site,
            TokenConfigError::MissingEnv { name: SAMESITE_ENV },
            || warn!("{SAMESITE_ENV} not set; using default"),
        ),
    }
}

fn secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<TokenSecret, TokenConfigError> {
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| SECRET_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < TOKEN_SECRET_MIN_LEN {
                bytes.zeroize();
                return debug_warn_or_error(
                    mode,
                    TokenSecret::generate(),
                    TokenConfigError::SecretTooShort {
                        path: path.clone(),
                        length,
                        min_len: TOKEN_SECRET_MIN_LEN,
                    },
                    || {
                        warn!(
                            path = %path.display(),
                            length,
                            "token secret too short; using temporary secret (dev only)"
                        );
                    },
                );
            }
            // Length was checked above.
            TokenSecret::new(bytes).map_err(|err| TokenConfigError::SecretTooShort {
                path,
                length: err.length,
                min_len: err.min,
            })
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary token secret (dev only)"
                );
                Ok(TokenSecret::generate())
            } else {
                Err(TokenConfigError::SecretRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

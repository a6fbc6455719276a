//! Environment parsing helpers for token configuration.

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, TokenConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Name and debug fallback of a boolean toggle.
pub(super) struct BoolEnvConfig {
    name: &'static str,
    default_value: bool,
}

impl BoolEnvConfig {
    pub(super) const fn new(name: &'static str, default_value: bool) -> Self {
        Self {
            name,
            default_value,
        }
    }
}

pub(super) fn parse_bool_env<E: Env, F>(
    env: &E,
    mode: BuildMode,
    config: BoolEnvConfig,
    value_validator: F,
) -> Result<bool, TokenConfigError>
where
    F: FnOnce(bool, BuildMode) -> Result<bool, TokenConfigError>,
{
    let default_label = if config.default_value {
        "enabled"
    } else {
        "disabled"
    };
    match env.string(config.name) {
        Some(value) => match parse_bool(&value) {
            Some(flag) => value_validator(flag, mode),
            None => debug_warn_or_error(
                mode,
                config.default_value,
                TokenConfigError::InvalidEnv {
                    name: config.name,
                    value: value.clone(),
                    expected: BOOL_EXPECTED,
                },
                || {
                    warn!(
                        value = %value,
                        "invalid {}; defaulting to {}",
                        config.name,
                        default_label
                    );
                },
            ),
        },
        None => debug_warn_or_error(
            mode,
            config.default_value,
            TokenConfigError::MissingEnv { name: config.name },
            || warn!("{} not set; defaulting to {}", config.name, default_label),
        ),
    }
}

/// Fall back with a warning in debug builds, fail in release builds.
pub(super) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: TokenConfigError,
    warn_fn: F,
) -> Result<T, TokenConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_same_site_value(
    value: String,
    mode: BuildMode,
    cookie_secure: bool,
    default_same_site: SameSite,
) -> Result<SameSite, TokenConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            validate_same_site_none(mode, cookie_secure)?;
            Ok(SameSite::None)
        }
        _ => debug_warn_or_error(
            mode,
            default_same_site,
            TokenConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: value.clone(),
                expected: SAMESITE_EXPECTED,
            },
            || warn!(value = %value, "invalid {SAMESITE_ENV}, using default"),
        ),
    }
}

fn validate_same_site_none(mode: BuildMode, cookie_secure: bool) -> Result<(), TokenConfigError> {
    if cookie_secure {
        return Ok(());
    }

    debug_warn_or_error(mode, (), TokenConfigError::InsecureSameSiteNone, || {
        warn!("SameSite=None on an insecure cookie; browsers may reject it");
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

//! Start-up settings and the assembled server configuration.

use std::net::SocketAddr;
use std::sync::Arc;

use clinic_backend::domain::ports::CredentialVerifier;
use clinic_backend::inbound::http::state::CookiePolicy;
use clinic_backend::inbound::http::token_config::TokenSettings;
use clinic_backend::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Values loaded from `CLINIC_*` environment variables, configuration files,
/// and command-line flags.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLINIC")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it records live in memory for the process
    /// lifetime.
    pub database_url: Option<String>,
    /// Operator login name.
    pub admin_username: Option<String>,
    /// Operator password.
    pub admin_password: Option<String>,
}

/// Invalid or incomplete start-up settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("CLINIC_ADMIN_PASSWORD must be set")]
    MissingAdminPassword,
}

impl ServerSettings {
    /// Configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse::<SocketAddr>()
            .map_err(|err| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Configured operator name, falling back to `admin`.
    pub fn admin_username(&self) -> &str {
        self.admin_username
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_USERNAME)
    }

    /// Operator password. There is no default.
    pub fn admin_password(&self) -> Result<&str, SettingsError> {
        self.admin_password
            .as_deref()
            .filter(|password| !password.is_empty())
            .ok_or(SettingsError::MissingAdminPassword)
    }

    /// Database URL, treating an empty value as absent.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Everything the server needs once start-up checks have passed.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token: TokenSettings,
    pub(crate) credentials: Arc<dyn CredentialVerifier>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration that keeps appointments in memory.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        token: TokenSettings,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            bind_addr,
            token,
            credentials,
            db_pool: None,
        }
    }

    /// Attach a database connection pool so appointments persist in
    /// PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attributes applied to the admin `token` cookie.
    pub(crate) fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy {
            secure: self.token.cookie_secure,
            same_site: self.token.same_site,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 4] = [
        "CLINIC_BIND_ADDR",
        "CLINIC_DATABASE_URL",
        "CLINIC_ADMIN_USERNAME",
        "CLINIC_ADMIN_PASSWORD",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("clinic-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr(),
            Ok(DEFAULT_BIND_ADDR.parse().expect("default address"))
        );
        assert_eq!(settings.admin_username(), DEFAULT_ADMIN_USERNAME);
        assert_eq!(
            settings.admin_password(),
            Err(SettingsError::MissingAdminPassword)
        );
        assert!(settings.database_url().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CLINIC_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "CLINIC_DATABASE_URL",
                Some("postgres://clinic@localhost/clinic".to_owned()),
            ),
            ("CLINIC_ADMIN_USERNAME", Some("reception".to_owned())),
            ("CLINIC_ADMIN_PASSWORD", Some("s3cret-pass".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr(),
            Ok("127.0.0.1:9000".parse().expect("address"))
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://clinic@localhost/clinic")
        );
        assert_eq!(settings.admin_username(), "reception");
        assert_eq!(settings.admin_password(), Ok("s3cret-pass"));
    }

    #[rstest]
    #[case("not-an-address")]
    #[case("localhost")]
    fn rejects_malformed_bind_addr(#[case] raw: &str) {
        let settings = ServerSettings {
            bind_addr: Some(raw.to_owned()),
            database_url: None,
            admin_username: None,
            admin_password: None,
        };

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr { .. })
        ));
    }

    #[rstest]
    fn blank_values_count_as_unset() {
        let settings = ServerSettings {
            bind_addr: None,
            database_url: Some(String::new()),
            admin_username: None,
            admin_password: Some(String::new()),
        };

        assert!(settings.database_url().is_none());
        assert_eq!(
            settings.admin_password(),
            Err(SettingsError::MissingAdminPassword)
        );
    }
}

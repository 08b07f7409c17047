//! Runtime settings loaded via OrthoConfig.
//!
//! [`AppSettings`] reads `HOTEL_*` variables (for example `HOTEL_BIND_ADDR`)
//! and [`BookingSettings`] reads `BOOKING_ADMISSION_STRATEGY` and
//! `BOOKING_RESTORE_ON_CANCEL`.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use backend::domain::{AdmissionPolicy, AdmissionStrategy, UnknownAdmissionStrategy};
use backend::inbound::ws::state::OriginAllowList;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_IMAGE_DIR: &str = "uploads";
const DEFAULT_IMAGE_BASE_URL: &str = "/images";

/// Settings that cannot be turned into a running server.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid allowed origin list: {0}")]
    Origins(#[from] url::ParseError),
    #[error(transparent)]
    Strategy(#[from] UnknownAdmissionStrategy),
}

/// Server, storage and socket settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HOTEL")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without one the server keeps its data in memory.
    pub database_url: Option<String>,
    /// Maximum pooled PostgreSQL connections.
    pub pool_size: Option<u32>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Directory receiving uploaded images.
    pub image_dir: Option<PathBuf>,
    /// URL prefix under which stored images are served.
    pub image_base_url: Option<String>,
    /// Comma-separated origins allowed to open the change socket.
    pub allowed_origins: Option<String>,
}

impl AppSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    /// Pool size, defaulting to ten connections.
    pub fn pool_size(&self) -> u32 {
        self.pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Image directory, defaulting to `./uploads`.
    pub fn image_dir(&self) -> PathBuf {
        self.image_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR))
    }

    /// Public image prefix, defaulting to `/images`.
    pub fn image_base_url(&self) -> &str {
        self.image_base_url
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_BASE_URL)
    }

    /// Origins allowed to open `/ws/changes`.
    pub fn allowed_origins(&self) -> Result<OriginAllowList, SettingsError> {
        let raw = self.allowed_origins.as_deref().unwrap_or_default();
        let origins = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty());
        Ok(OriginAllowList::parse(origins)?)
    }
}

/// Admission and cancellation policy.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKING")]
pub struct BookingSettings {
    /// `conditional_claim` (default) or `check_then_act`.
    pub admission_strategy: Option<String>,
    /// Release the room when a booking is cancelled.
    #[ortho_config(default = true)]
    pub restore_on_cancel: bool,
}

impl BookingSettings {
    /// Policy handed to the admission service.
    pub fn policy(&self) -> Result<AdmissionPolicy, SettingsError> {
        let strategy = match self.admission_strategy.as_deref() {
            Some(raw) => raw.parse()?,
            None => AdmissionStrategy::default(),
        };
        Ok(AdmissionPolicy {
            strategy,
            restore_on_cancel: self.restore_on_cancel,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const APP_VARS: [&str; 7] = [
        "HOTEL_BIND_ADDR",
        "HOTEL_DATABASE_URL",
        "HOTEL_POOL_SIZE",
        "HOTEL_RUN_MIGRATIONS",
        "HOTEL_IMAGE_DIR",
        "HOTEL_IMAGE_BASE_URL",
        "HOTEL_ALLOWED_ORIGINS",
    ];

    fn program() -> [OsString; 1] {
        [OsString::from("backend")]
    }

    #[rstest]
    fn app_defaults_apply_when_unset() {
        let _guard = lock_env(APP_VARS.map(|name| (name, None::<String>)));

        let settings = AppSettings::load_from_iter(program()).expect("config should load");

        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert!(settings.run_migrations);
        assert_eq!(settings.pool_size(), DEFAULT_POOL_SIZE);
        assert_eq!(settings.image_dir(), PathBuf::from(DEFAULT_IMAGE_DIR));
        assert_eq!(settings.image_base_url(), DEFAULT_IMAGE_BASE_URL);
    }

    #[rstest]
    fn app_environment_overrides_are_respected() {
        let _guard = lock_env([
            ("HOTEL_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "HOTEL_DATABASE_URL",
                Some("postgres://localhost/hotel".to_owned()),
            ),
            ("HOTEL_POOL_SIZE", Some("4".to_owned())),
            ("HOTEL_IMAGE_BASE_URL", Some("https://cdn.hotel.example".to_owned())),
            (
                "HOTEL_ALLOWED_ORIGINS",
                Some("https://hotel.example, https://admin.hotel.example".to_owned()),
            ),
        ]);

        let settings = AppSettings::load_from_iter(program()).expect("config should load");

        assert_eq!(
            settings.bind_addr().expect("address").to_string(),
            "127.0.0.1:9000"
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/hotel")
        );
        assert_eq!(settings.pool_size(), 4);
        assert_eq!(settings.image_base_url(), "https://cdn.hotel.example");
        let origins = settings.allowed_origins().expect("origins parse");
        let admin = url::Url::parse("https://admin.hotel.example").expect("url");
        assert!(origins.allows(&admin));
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env([("HOTEL_BIND_ADDR", Some("localhost".to_owned()))]);

        let settings = AppSettings::load_from_iter(program()).expect("config should load");

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    #[case(None, None, AdmissionStrategy::ConditionalClaim, true)]
    #[case(Some("check_then_act"), Some("false"), AdmissionStrategy::CheckThenAct, false)]
    #[case(Some("conditional-claim"), None, AdmissionStrategy::ConditionalClaim, true)]
    fn booking_policy_follows_environment(
        #[case] strategy: Option<&str>,
        #[case] restore: Option<&str>,
        #[case] expected_strategy: AdmissionStrategy,
        #[case] expected_restore: bool,
    ) {
        let _guard = lock_env([
            ("BOOKING_ADMISSION_STRATEGY", strategy.map(str::to_owned)),
            ("BOOKING_RESTORE_ON_CANCEL", restore.map(str::to_owned)),
        ]);

        let policy = BookingSettings::load_from_iter(program())
            .expect("config should load")
            .policy()
            .expect("policy");

        assert_eq!(policy.strategy, expected_strategy);
        assert_eq!(policy.restore_on_cancel, expected_restore);
    }

    #[rstest]
    fn unknown_strategy_is_rejected() {
        let _guard = lock_env([(
            "BOOKING_ADMISSION_STRATEGY",
            Some("optimistic".to_owned()),
        )]);

        let settings = BookingSettings::load_from_iter(program()).expect("config should load");

        assert!(matches!(settings.policy(), Err(SettingsError::Strategy(_))));
    }
}

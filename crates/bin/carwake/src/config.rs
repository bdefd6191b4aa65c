//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `carwake.toml` in the working directory unless a path is given
//! on the command line. Every field has a default so the file is optional.
//! Environment variables take precedence over file values, and command-line
//! flags over both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use carwake_adapter_owner_api::OwnerApiConfig;
use carwake_adapter_virtual::VirtualConfig;
use carwake_app::services::wake_coordinator::WakeSettings;
use carwake_app::session_runner::RunnerSettings;
use carwake_domain::routine::{DEFAULT_CLIMATE_ON, DEFAULT_MIN_BATTERY_PERCENT, Routine};
use carwake_domain::session::Credentials;
use carwake_domain::wake::ExhaustedWakePolicy;
use serde::Deserialize;

use crate::cli::Command;

const DEFAULT_PATH: &str = "carwake.toml";
const MAX_CLIMATE_ON_MINUTES: u64 = 24 * 60;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which implementation of the vehicle API to talk to.
    pub backend: Backend,
    /// Flash the lights instead of issuing real commands.
    pub dry_run: bool,
    /// Account credentials.
    pub credentials: CredentialsConfig,
    /// Owner API connection settings.
    pub owner_api: OwnerApiConfig,
    /// Wake retry budget.
    pub wake: WakeConfig,
    /// Climate routine settings.
    pub climate: ClimateConfig,
    /// Sentry routine settings.
    pub sentry: SentryConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Simulated vehicle, used by the `virtual` backend.
    #[serde(rename = "virtual")]
    pub virtual_vehicle: VirtualConfig,
}

/// Vehicle API implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// The manufacturer's HTTP API.
    #[default]
    OwnerApi,
    /// In-process simulated vehicle.
    Virtual,
}

/// Login credentials.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Wake loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WakeConfig {
    /// Wake requests before giving up.
    pub max_attempts: u32,
    /// Pause between two wake requests, in seconds.
    pub interval_secs: u64,
    /// What to do when the car never came online.
    pub on_exhausted: ExhaustedWakePolicy,
}

/// Climate routine configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    /// Minimum state of charge to start climate control, in percent.
    pub min_battery_percent: u8,
    /// How long climate control runs before being stopped, in minutes.
    pub on_minutes: u64,
}

/// Sentry routine configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SentryConfig {
    /// Minimum state of charge to enable sentry mode; unset means no gate.
    pub min_battery_percent: Option<u8>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax) or a bare level name.
    pub filter: String,
    /// Append to this file instead of writing to stderr.
    pub file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `path` (or `carwake.toml` if present), apply
    /// environment-variable overrides, then the command-line flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed, if an explicitly given
    /// file cannot be read, or if the result does not validate.
    pub fn load(
        path: Option<&Path>,
        backend: Option<Backend>,
        dry_run: bool,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => Self::from_file(Path::new(DEFAULT_PATH))?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        if let Some(backend) = backend {
            config.backend = backend;
        }
        config.dry_run |= dry_run;
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("CARWAKE_USERNAME") {
            self.credentials.username = val;
        }
        if let Some(val) = var("CARWAKE_PASSWORD") {
            self.credentials.password = val;
        }
        if let Some(val) = var("CARWAKE_API_URL") {
            self.owner_api.base_url = val;
        }
        if let Some(val) = var("CARWAKE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.wake.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "wake.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.climate.min_battery_percent > 100 {
            return Err(ConfigError::Validation(
                "climate.min_battery_percent must be at most 100".to_string(),
            ));
        }
        if self.climate.on_minutes > MAX_CLIMATE_ON_MINUTES {
            return Err(ConfigError::Validation(format!(
                "climate.on_minutes must be at most {MAX_CLIMATE_ON_MINUTES}"
            )));
        }
        if self.sentry.min_battery_percent.is_some_and(|min| min > 100) {
            return Err(ConfigError::Validation(
                "sentry.min_battery_percent must be at most 100".to_string(),
            ));
        }
        if self.virtual_vehicle.battery_level > 100 {
            return Err(ConfigError::Validation(
                "virtual.battery_level must be at most 100".to_string(),
            ));
        }
        if self.backend == Backend::OwnerApi {
            if !self.credentials().is_complete() {
                return Err(ConfigError::Validation(
                    "credentials.username and credentials.password are required by the owner-api backend"
                        .to_string(),
                ));
            }
            if self.owner_api.timeout_secs == 0 {
                return Err(ConfigError::Validation(
                    "owner_api.timeout_secs must be non-zero".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Credentials to log in with.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.credentials.username.clone(),
            self.credentials.password.clone(),
        )
    }

    /// Settings for the session runner.
    ///
    /// # Errors
    ///
    /// Returns an error if the wake budget is empty.
    pub fn runner_settings(&self) -> Result<RunnerSettings, ConfigError> {
        let wake = WakeSettings::new(
            self.wake.max_attempts,
            Duration::from_secs(self.wake.interval_secs),
            self.wake.on_exhausted,
        )
        .map_err(|err| ConfigError::Validation(err.to_string()))?;
        Ok(RunnerSettings {
            wake,
            dry_run: self.dry_run,
        })
    }

    /// The routine selected by `command`.
    #[must_use]
    pub fn routine(&self, command: Command) -> Routine {
        match command {
            Command::Climate => Routine::climate(
                Some(self.climate.min_battery_percent),
                Duration::from_secs(self.climate.on_minutes.saturating_mul(60)),
            ),
            Command::Sentry => Routine::sentry(self.sentry.min_battery_percent),
        }
    }
}

impl Default for WakeConfig {
    fn default() -> Self {
        let settings = WakeSettings::default();
        Self {
            max_attempts: settings.max_attempts(),
            interval_secs: settings.interval().as_secs(),
            on_exhausted: ExhaustedWakePolicy::default(),
        }
    }
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            min_battery_percent: DEFAULT_MIN_BATTERY_PERCENT,
            on_minutes: DEFAULT_CLIMATE_ON.as_secs() / 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "carwake=debug".to_string(),
            file: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

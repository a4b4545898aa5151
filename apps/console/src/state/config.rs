//! # Console Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BACKOFFICE_LATENCY_MS=0                                            │
//! │     BACKOFFICE_START_ROUTE=/products                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, else                                              │
//! │     ~/.config/backoffice/console.toml (Linux)                          │
//! │     ~/Library/Application Support/com.backoffice.console/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # console.toml
//! [latency]
//! get_all_ms = 1000
//! get_by_id_ms = 300
//! create_ms = 500
//! delete_ms = 300
//!
//! [app]
//! start_route = "/"
//! low_stock_threshold = 10
//!
//! [logging]
//! filter = "info,backoffice=debug"
//! ```
//!
//! ## Thread Safety
//! Read-only after load, so no mutex.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use backoffice_core::LOW_STOCK_THRESHOLD;
use backoffice_data::Latency;

use crate::error::{ConfigError, ConfigResult};
use crate::router::Route;

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "console.toml";

// =============================================================================
// Latency Settings
// =============================================================================

/// Simulated service latency, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencySettings {
    #[serde(default = "default_get_all_ms")]
    pub get_all_ms: u64,

    #[serde(default = "default_get_by_id_ms")]
    pub get_by_id_ms: u64,

    #[serde(default = "default_create_ms")]
    pub create_ms: u64,

    #[serde(default = "default_delete_ms")]
    pub delete_ms: u64,
}

fn default_get_all_ms() -> u64 {
    1000
}

fn default_get_by_id_ms() -> u64 {
    300
}

fn default_create_ms() -> u64 {
    500
}

fn default_delete_ms() -> u64 {
    300
}

impl Default for LatencySettings {
    fn default() -> Self {
        LatencySettings {
            get_all_ms: default_get_all_ms(),
            get_by_id_ms: default_get_by_id_ms(),
            create_ms: default_create_ms(),
            delete_ms: default_delete_ms(),
        }
    }
}

impl LatencySettings {
    /// Converts to the profile the mock services take.
    pub fn to_latency(&self) -> Latency {
        Latency {
            get_all: Duration::from_millis(self.get_all_ms),
            get_by_id: Duration::from_millis(self.get_by_id_ms),
            create: Duration::from_millis(self.create_ms),
            delete: Duration::from_millis(self.delete_ms),
        }
    }

    fn set_all(&mut self, ms: u64) {
        self.get_all_ms = ms;
        self.get_by_id_ms = ms;
        self.create_ms = ms;
        self.delete_ms = ms;
    }
}

// =============================================================================
// App Settings
// =============================================================================

/// Shell behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Page shown at startup. `/` redirects to `/users`.
    #[serde(default = "default_start_route")]
    pub start_route: String,

    /// Stock level below which a product counts as low stock.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

fn default_start_route() -> String {
    "/".to_string()
}

fn default_low_stock_threshold() -> i64 {
    LOW_STOCK_THRESHOLD
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            start_route: default_start_route(),
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Log filter used when `RUST_LOG` is not set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,backoffice=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Console Config
// =============================================================================

/// Complete console configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub latency: LatencySettings,

    #[serde(default)]
    pub app: AppSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ConsoleConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from `config_path`, or the platform config file, if it exists
    /// 3. Override with `BACKOFFICE_*` environment variables
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load console config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses one TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading console config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if Route::resolve(&self.app.start_route).is_err() {
            return Err(ConfigError::Invalid(format!(
                "start_route '{}' is not a page",
                self.app.start_route
            )));
        }

        if self.app.low_stock_threshold < 0 {
            return Err(ConfigError::Invalid(
                "low_stock_threshold must not be negative".into(),
            ));
        }

        Ok(())
    }

    /// Applies `BACKOFFICE_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(ms) = lookup("BACKOFFICE_LATENCY_MS") {
            match ms.trim().parse::<u64>() {
                Ok(ms) => {
                    debug!(ms, "Overriding latency from environment");
                    self.latency.set_all(ms);
                }
                Err(_) => warn!(value = %ms, "Ignoring non-numeric BACKOFFICE_LATENCY_MS"),
            }
        }

        if let Some(route) = lookup("BACKOFFICE_START_ROUTE") {
            debug!(route = %route, "Overriding start route from environment");
            self.app.start_route = route;
        }
    }

    /// Platform config file location.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "backoffice", "console")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// The resolved start page.
    pub fn start_route(&self) -> Route {
        Route::resolve(&self.app.start_route).unwrap_or_default()
    }
}

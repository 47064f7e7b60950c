use crate::DEFAULT_API_ROOT;
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;
const CONFIG_DIR_NAME: &str = "frunk";

/// Environment variable that overrides `server.api_root`.
pub const API_ROOT_ENV: &str = "FRUNK_API_ROOT";

/// Upper bound the server clamps `per_page` to.
pub const MAX_PER_PAGE: u32 = 100;

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_api_root")]
    pub api_root: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_retry_max_elapsed_ms")]
    pub retry_max_elapsed_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_root: default_api_root(),
            request_timeout_secs: default_request_timeout_secs(),
            retry_max_elapsed_ms: default_retry_max_elapsed_ms(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_max_elapsed(&self) -> Duration {
        Duration::from_millis(self.retry_max_elapsed_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotesConfig {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_autosave_quiet_ms")]
    pub autosave_quiet_ms: u64,
    #[serde(default = "default_saved_flash_ms")]
    pub saved_flash_ms: u64,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            autosave_quiet_ms: default_autosave_quiet_ms(),
            saved_flash_ms: default_saved_flash_ms(),
        }
    }
}

impl NotesConfig {
    pub fn autosave_quiet(&self) -> Duration {
        Duration::from_millis(self.autosave_quiet_ms)
    }

    pub fn saved_flash(&self) -> Duration {
        Duration::from_millis(self.saved_flash_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub notes: NotesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: ServerConfig::default(),
            notes: NotesConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_api_root() -> String {
    DEFAULT_API_ROOT.to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_retry_max_elapsed_ms() -> u64 {
    2_000
}
fn default_per_page() -> u32 {
    common::pagination::DEFAULT_PER_PAGE
}
fn default_autosave_quiet_ms() -> u64 {
    500
}
fn default_saved_flash_ms() -> u64 {
    2_000
}

// ============================================
// IMPLEMENTATION
// ============================================

/// `{platform config dir}/frunk`.
#[track_caller]
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| ConfigError::DirectoryNotFound {
            location: ErrorLocation::from(Location::caller()),
        })
}

impl AppConfig {
    /// Load config from {config_dir}/config.json.
    ///
    /// # Returns
    ///
    /// Returns `Ok(AppConfig)` if loaded successfully or defaults if file missing.
    /// Returns `Err(ConfigError)` if file exists but is corrupted/invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: AppConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/config.json using atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation, serialization,
    /// the write, or the rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        // Atomic rename (POSIX guarantees atomicity)
        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Load `.env` (if any) and apply `FRUNK_API_ROOT`.
    ///
    /// Returns `true` when an override was applied.
    pub fn apply_env_overrides(&mut self) -> Result<bool, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded .env from: {:?}", path),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => warn!("Failed to parse .env: {}", e),
        }

        match std::env::var(API_ROOT_ENV) {
            Ok(api_root) => {
                info!("{API_ROOT_ENV} overrides api_root: {api_root}");
                self.server.api_root = api_root;
                self.validate()?;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::validation(
                "version",
                format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            ));
        }

        let api_root = &self.server.api_root;
        if !api_root.starts_with("http://") && !api_root.starts_with("https://") {
            return Err(ConfigError::validation(
                "server.api_root",
                format!("Invalid URL format: {}", api_root),
            ));
        }

        if !(1..=300).contains(&self.server.request_timeout_secs) {
            return Err(ConfigError::validation(
                "server.request_timeout_secs",
                format!(
                    "{} (must be 1-300)",
                    self.server.request_timeout_secs
                ),
            ));
        }

        if !(1..=MAX_PER_PAGE).contains(&self.notes.per_page) {
            return Err(ConfigError::validation(
                "notes.per_page",
                format!("{} (must be 1-{})", self.notes.per_page, MAX_PER_PAGE),
            ));
        }

        if self.notes.autosave_quiet_ms == 0 {
            return Err(ConfigError::validation(
                "notes.autosave_quiet_ms",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

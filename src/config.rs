//! Configuration system for mskeys.
//!
//! Configuration is loaded from multiple sources with the following precedence:
//! 1. Environment variables (highest priority)
//! 2. `mskeys.toml` file, or the file passed with `--config`
//! 3. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `MSKEYS_OUTPUT_FORMAT` - Report format (text, json)
//! - `MSKEYS_QUIET` - Print only the keys
//! - `MSKEYS_WAIT_FOR_ENTER` - Wait for Enter before exiting
//! - `MSKEYS_INCLUDE_OA3` - Also read the OA3 firmware key string
//! - `MSKEYS_VALUE_NAME` - Registry value holding the encoded blob
//! - `MSKEYS_LOGGING_ENABLED` - Enable log output
//! - `MSKEYS_LOG_LEVEL` - Log level (trace, debug, info, warn, error)

use config::Config;
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::sync::OnceLock;

use crate::errors::{KeyError, KeyResult};

/// Global configuration singleton.
static CONFIG: OnceLock<MskeysConfig> = OnceLock::new();

/// Registry paths under `HKEY_LOCAL_MACHINE` scanned by default.
pub const DEFAULT_SCAN_PATHS: &[&str] = &[
    r"SOFTWARE\Microsoft\Windows NT\CurrentVersion",
    r"SOFTWARE\Wow6432Node\Microsoft\Windows NT\CurrentVersion",
    r"SOFTWARE\Microsoft\Office\16.0\Registration",
    r"SOFTWARE\Wow6432Node\Microsoft\Office\16.0\Registration",
    r"SOFTWARE\Microsoft\Office\15.0\Registration",
    r"SOFTWARE\Wow6432Node\Microsoft\Office\15.0\Registration",
    r"SOFTWARE\Microsoft\Office\14.0\Registration",
    r"SOFTWARE\Wow6432Node\Microsoft\Office\14.0\Registration",
];

/// Registry value holding the legacy encoded key.
pub const DEFAULT_VALUE_NAME: &str = "DigitalProductId";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MskeysConfig {
    /// Where and what to scan
    pub scan: ScanConfig,
    /// Report rendering
    pub output: OutputConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Scan configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Registry paths under HKLM to examine (each key and its direct subkeys)
    pub paths: Vec<String>,
    /// Value name to decode, matched case-insensitively
    pub value_name: String,
    /// Read `OA3xOriginalProductKey` as a plain key
    pub include_oa3: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            paths: DEFAULT_SCAN_PATHS.iter().map(|p| p.to_string()).collect(),
            value_name: DEFAULT_VALUE_NAME.to_string(),
            include_oa3: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format: "text" or "json"
    pub format: String,
    /// Only print the keys
    pub quiet: bool,
    /// Wait for Enter before the process exits
    pub wait_for_enter: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            quiet: false,
            wait_for_enter: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

fn config_err(e: config::ConfigError) -> KeyError {
    KeyError::ConfigError(e.to_string())
}

fn env_bool(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| v.parse::<bool>().ok())
}

impl MskeysConfig {
    /// Load configuration from defaults, a file and the environment.
    ///
    /// With `path` set the file is required; otherwise `mskeys.toml` in the
    /// working directory is read if present.
    pub fn load_from(path: Option<&Path>) -> KeyResult<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("mskeys").required(false),
        };

        let default_paths: Vec<String> =
            DEFAULT_SCAN_PATHS.iter().map(|p| p.to_string()).collect();

        let builder = Config::builder()
            // Start with defaults
            .set_default("scan.paths", default_paths)
            .map_err(config_err)?
            .set_default("scan.value_name", DEFAULT_VALUE_NAME)
            .map_err(config_err)?
            .set_default("scan.include_oa3", true)
            .map_err(config_err)?
            .set_default("output.format", "text")
            .map_err(config_err)?
            .set_default("output.quiet", false)
            .map_err(config_err)?
            .set_default("output.wait_for_enter", true)
            .map_err(config_err)?
            .set_default("logging.enabled", false)
            .map_err(config_err)?
            .set_default("logging.level", "info")
            .map_err(config_err)?
            .add_source(file)
            // Override with environment variables
            .set_override_option("scan.value_name", env::var("MSKEYS_VALUE_NAME").ok())
            .map_err(config_err)?
            .set_override_option("scan.include_oa3", env_bool("MSKEYS_INCLUDE_OA3"))
            .map_err(config_err)?
            .set_override_option("output.format", env::var("MSKEYS_OUTPUT_FORMAT").ok())
            .map_err(config_err)?
            .set_override_option("output.quiet", env_bool("MSKEYS_QUIET"))
            .map_err(config_err)?
            .set_override_option("output.wait_for_enter", env_bool("MSKEYS_WAIT_FOR_ENTER"))
            .map_err(config_err)?
            .set_override_option("logging.enabled", env_bool("MSKEYS_LOGGING_ENABLED"))
            .map_err(config_err)?
            .set_override_option("logging.level", env::var("MSKEYS_LOG_LEVEL").ok())
            .map_err(config_err)?;

        let settings = builder
            .build()
            .map_err(|e| KeyError::ConfigError(format!("failed to build config: {e}")))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| KeyError::ConfigError(format!("failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> KeyResult<()> {
        if self.scan.paths.is_empty() {
            return Err(KeyError::ConfigError(
                "scan.paths cannot be empty".to_string(),
            ));
        }
        if self.scan.value_name.trim().is_empty() {
            return Err(KeyError::ConfigError(
                "scan.value_name cannot be empty".to_string(),
            ));
        }

        match self.output.format.to_lowercase().as_str() {
            "text" | "json" => {}
            other => {
                return Err(KeyError::ConfigError(format!(
                    "output.format must be 'text' or 'json', got '{other}'"
                )));
            }
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(KeyError::ConfigError(format!(
                    "logging.level must be one of: trace, debug, info, warn, error. Got '{other}'"
                )));
            }
        }

        Ok(())
    }
}

/// Get the global configuration.
///
/// This loads the configuration on first access and caches it.
/// Returns an error if configuration loading or validation fails.
pub fn get_config() -> KeyResult<&'static MskeysConfig> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }

    let config = MskeysConfig::load_from(None)?;
    Ok(CONFIG.get_or_init(|| config))
}

//! Bootstrap configuration loading
//!
//! Configuration file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`PMKIT_CONFIG`)
//! 3. Per-user TOML file (`<config dir>/pmkit/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A file named explicitly (tiers 1 and 2) must exist and parse. A missing
//! per-user file silently falls through to the compiled defaults.

use crate::pmml::SaveOptions;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "PMKIT_CONFIG";

/// Bootstrap configuration loaded from TOML file
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Output document rendering (optional)
    #[serde(default)]
    pub output: OutputConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Output document rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Spaces per nesting level (0 = single line)
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Include a generation timestamp in the document header
    #[serde(default)]
    pub timestamp: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            timestamp: false,
        }
    }
}

impl OutputConfig {
    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            indent: self.indent,
            timestamp: self.timestamp,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_indent() -> usize {
    2
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    UserFile(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::CommandLine(path) => write!(f, "command line ({})", path.display()),
            ConfigSource::Environment(path) => {
                write!(f, "{} ({})", CONFIG_ENV_VAR, path.display())
            }
            ConfigSource::UserFile(path) => write!(f, "user config ({})", path.display()),
            ConfigSource::Defaults => f.write_str("compiled defaults"),
        }
    }
}

impl TomlConfig {
    /// Parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the subscriber or writer cannot use
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(Error::Config(format!(
                    "Invalid log level '{}' (expected trace, debug, info, warn or error)",
                    other
                )))
            }
        }
        if self.output.indent > 16 {
            return Err(Error::Config(format!(
                "Indent of {} spaces is out of range (0-16)",
                self.output.indent
            )));
        }
        Ok(())
    }

    /// Resolve and load the effective configuration
    pub fn resolve(cli_arg: Option<&Path>) -> Result<(Self, ConfigSource)> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return Ok((Self::load(path)?, ConfigSource::CommandLine(path.to_path_buf())));
        }

        // Priority 2: Environment variable
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
            let path = PathBuf::from(path);
            return Ok((Self::load(&path)?, ConfigSource::Environment(path)));
        }

        // Priority 3: Per-user TOML file
        if let Some(path) = user_config_path() {
            if path.exists() {
                return Ok((Self::load(&path)?, ConfigSource::UserFile(path)));
            }
            debug!(path = %path.display(), "No user config file");
        }

        // Priority 4: Compiled defaults
        Ok((Self::default(), ConfigSource::Defaults))
    }
}

/// Platform location of the per-user configuration file
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pmkit").join("config.toml"))
}

//! Configuration for the trace reporter
//!
//! Settings live in `~/.tracelog.toml` unless a path is given explicitly.
//! Every field has a default, so a partial file (or none at all) is fine.

use std::{
    env, fs,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The config file is not valid TOML for [`ReporterConfig`]
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path of the config file
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },
    /// Unknown color mode given on the command line
    #[error("invalid color mode '{0}', expected one of: auto, always, never")]
    InvalidColorMode(String),
}

/// When to emit ANSI colors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl ColorMode {
    /// Decide whether colors should be used for stdout
    pub fn use_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
        }
    }
}

impl FromStr for ColorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(ConfigError::InvalidColorMode(s.to_string())),
        }
    }
}

/// Reporter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Initial state of buffered logging
    pub enabled: bool,
    /// Color policy
    pub color: ColorMode,
    /// Warn when a call or gas estimation targets an account without code
    pub warn_on_non_contract_calls: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self { enabled: true, color: ColorMode::Auto, warn_on_non_contract_calls: true }
    }
}

impl ReporterConfig {
    /// Default config file path (`~/.tracelog.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".tracelog.toml"))
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config = toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "color = \"never\"").unwrap();

        let config = ReporterConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.color, ColorMode::Never);
        assert!(config.enabled);
        assert!(config.warn_on_non_contract_calls);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReporterConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "enabled = \"sometimes\"").unwrap();

        let err = ReporterConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_color_mode_parsing() {
        assert_eq!("ALWAYS".parse::<ColorMode>().unwrap(), ColorMode::Always);
        assert!(!ColorMode::Never.use_color());
        assert!(ColorMode::Always.use_color());
        assert!("rainbow".parse::<ColorMode>().is_err());
    }

    #[test]
    #[serial]
    fn test_no_color_disables_auto() {
        let previous = env::var_os("NO_COLOR");
        env::set_var("NO_COLOR", "1");

        assert!(!ColorMode::Auto.use_color());
        assert!(ColorMode::Always.use_color());

        match previous {
            Some(value) => env::set_var("NO_COLOR", value),
            None => env::remove_var("NO_COLOR"),
        }
    }
}

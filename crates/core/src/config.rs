//! Configuration for iscli shells.
//!
//! This module provides the YAML-backed shell settings and the functions for
//! resolving configuration file paths, expanding shell variables like `~`.

use std::fs::File;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::history::DEFAULT_HISTORY_LEN;

/// Default path for the configuration file
const DEFAULT_CONFIG_PATH: &str = "~/.iscli/config.yml";
/// Default path for storing command history
const DEFAULT_HISTORY_PATH: &str = "~/.iscli/history";

/// Default name shown in prompts
pub const DEFAULT_HOSTNAME: &str = "iscli";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ShellConfig {
    /// Name shown at the start of every prompt.
    pub hostname: String,
    pub history_path: String,
    pub history_max_len: usize,
    /// Write the history back when the session ends.
    pub save_history: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            history_path: DEFAULT_HISTORY_PATH.to_string(),
            history_max_len: DEFAULT_HISTORY_LEN,
            save_history: true,
        }
    }
}

impl ShellConfig {
    /// The history path with shell expansions resolved.
    #[must_use]
    pub fn expanded_history_path(&self) -> String {
        shellexpand::tilde(&self.history_path).to_string()
    }
}

/// Resolves the configuration file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// configuration path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use iscli_core::config::get_config_path;
///
/// let custom_path = get_config_path(Some("/path/to/config.yml"));
/// assert_eq!(custom_path, "/path/to/config.yml");
/// ```
#[must_use]
pub fn get_config_path(config_path_arg: Option<&str>) -> String {
    let config_path = config_path_arg.unwrap_or(DEFAULT_CONFIG_PATH);
    shellexpand::tilde(config_path).to_string()
}

/// Loads the shell configuration.
///
/// A configuration file that does not exist yields the defaults.
///
/// # Errors
///
/// Returns an error if:
/// - The file exists but cannot be read
/// - The file contains invalid YAML or unknown value types
pub fn load_config(config_path: &str) -> Result<ShellConfig> {
    if !Path::exists(Path::new(config_path)) {
        debug!("No config file at `{config_path}`, using defaults");
        return Ok(ShellConfig::default());
    }

    let reader = File::open(config_path)
        .map_err(|e| Error::io_error("config".to_string(), config_path.to_string(), e))?;

    // An empty document deserializes to unit rather than a mapping.
    let parsed: serde_yaml::Result<Option<ShellConfig>> = serde_yaml::from_reader(reader);

    match parsed {
        Ok(config) => Ok(config.unwrap_or_default()),
        Err(e) => Err(Error::yaml_error(
            "reading".to_string(),
            "config".to_string(),
            config_path.to_string(),
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_get_config_path_with_custom_path() {
        let result = get_config_path(Some("/custom/path/config.yml"));
        assert_eq!(result, "/custom/path/config.yml");
    }

    #[test]
    fn test_get_config_path_with_none() {
        let result = get_config_path(None);
        // Should expand the tilde in the default path
        assert!(result.ends_with("config.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_expanded_history_path() {
        let config = ShellConfig::default();
        let expanded = config.expanded_history_path();
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with(".iscli/history"));
    }

    #[test]
    fn test_load_missing_config() {
        let config = load_config("/this/path/does/not/exist.yml").unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn test_load_partial_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "hostname: core-sw1\nhistory_max_len: 5\n").unwrap();

        let config = load_config(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.hostname, "core-sw1");
        assert_eq!(config.history_max_len, 5);
        assert!(config.save_history);
        assert_eq!(config.history_path, DEFAULT_HISTORY_PATH);
    }

    #[test]
    fn test_load_empty_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = load_config(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn test_load_invalid_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "history_max_len: [").unwrap();

        let result = load_config(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }
}

//! Pacer configuration.
//!
//! Loaded from `~/.pacer/config.toml`. Every key is optional; a missing
//! file means defaults.
//!
//! ```toml
//! database = "/path/to/workout.db"
//! window-minutes = 60
//!
//! [health]
//! enabled = true
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use jiff::SignedDuration;
use serde::Deserialize;

use crate::storage::Storage;

/// Pacer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Database file. Falls back to `~/.pacer/workout.db`.
    pub database: Option<PathBuf>,

    /// Length of a logged workout, measured from the moment it is saved.
    pub window_minutes: u32,

    pub health: HealthConfig,
}

/// Health-data integration settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct HealthConfig {
    /// When off, saves fail instead of being issued an id.
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            window_minutes: 60,
            health: HealthConfig::default(),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load config from `~/.pacer/config.toml`.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        Self::parse(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|e| e.to_string())?;
        if config.window_minutes == 0 {
            return Err("window-minutes must be greater than zero".to_string());
        }
        Ok(config)
    }

    /// The config file path: `~/.pacer/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".pacer").join("config.toml"))
    }

    /// The workout window as a duration.
    pub fn window(&self) -> SignedDuration {
        SignedDuration::from_mins(i64::from(self.window_minutes))
    }

    /// Resolve the database path: explicit flag, then config, then default.
    pub fn database_path(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf)
            .or_else(|| self.database.clone())
            .or_else(Storage::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::parse(
            r#"
            database = "/tmp/pacer.db"
            window-minutes = 45

            [health]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.database, Some(PathBuf::from("/tmp/pacer.db")));
        assert_eq!(config.window(), SignedDuration::from_mins(45));
        assert!(!config.health.enabled);
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = Config::parse("window-minutes = 0").unwrap_err();
        assert!(err.contains("window-minutes"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(Config::parse("colour = \"red\"").is_err());
    }

    #[test]
    fn missing_file_is_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "window-minutes = \"soon\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.contains("config.toml"));
    }

    #[test]
    fn flag_overrides_configured_database() {
        let config = Config {
            database: Some(PathBuf::from("/from/config.db")),
            ..Config::default()
        };

        assert_eq!(
            config.database_path(Some(Path::new("/from/flag.db"))),
            Some(PathBuf::from("/from/flag.db"))
        );
        assert_eq!(
            config.database_path(None),
            Some(PathBuf::from("/from/config.db"))
        );
    }
}

//! Runtime settings read from the environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Directory relative input paths are resolved against when `POLL_DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = env!("CARGO_MANIFEST_DIR");

/// File read by the CLI when no path is given.
pub const DEFAULT_DATA_FILE: &str = "polling_data.csv";

pub const DEFAULT_LOG_FILE: &str = "logs/poll_reader.log";

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub log_file_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Settings {
    /// Reads `POLL_DATA_DIR` and `LOG_FILE_PATH`, falling back to the defaults.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: lookup("POLL_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            log_file_path: lookup("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file_path),
        }
    }

    /// Joins `file` onto the data directory. Absolute paths are returned unchanged.
    pub fn resolve(&self, file: impl AsRef<Path>) -> PathBuf {
        self.data_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_to_data_dir() {
        let settings = Settings {
            data_dir: PathBuf::from("/srv/polls"),
            ..Default::default()
        };
        assert_eq!(
            settings.resolve("polling_data.csv"),
            PathBuf::from("/srv/polls/polling_data.csv")
        );
    }

    #[test]
    fn test_resolve_keeps_absolute_path() {
        let settings = Settings::default();
        let absolute = std::env::temp_dir().join("polls.csv");
        assert_eq!(settings.resolve(&absolute), absolute);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let settings = Settings::from_lookup(|key| match key {
            "POLL_DATA_DIR" => Some(OsString::from("/srv/polls")),
            "LOG_FILE_PATH" => Some(OsString::from("/var/log/polls.log")),
            _ => None,
        });

        assert_eq!(settings.data_dir, PathBuf::from("/srv/polls"));
        assert_eq!(settings.log_file_path, PathBuf::from("/var/log/polls.log"));
    }

    #[test]
    fn test_from_lookup_falls_back_to_defaults() {
        let settings = Settings::from_lookup(|_| None);

        assert_eq!(settings.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(settings.log_file_path, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_default_data_dir_is_crate_dir() {
        let settings = Settings::default();
        assert!(settings.data_dir.join("Cargo.toml").exists());
    }
}

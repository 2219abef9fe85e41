//! Runtime configuration, read from `GREETCRAFT_*` environment variables.
//!
//! `main` loads a `.env` file first (if present) through `dotenvy`, so the same
//! keys can live there during development. Every key has a default.

use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite database file holding templates and elements.
    pub database_path: PathBuf,
    /// Where uploaded base images are written.
    pub upload_dir: PathBuf,
    /// Root directory for batch render output, one subdirectory per job.
    pub output_dir: PathBuf,
    pub font_dir: PathBuf,
    pub font_family: String,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: PathBuf::from("greetcraft.sqlite"),
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("generated"),
            font_dir: PathBuf::from("fonts"),
            font_family: "Arial".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup("GREETCRAFT_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("GREETCRAFT_PORT") {
            config.port = parse("GREETCRAFT_PORT", port, "a port number")?;
        }
        if let Some(path) = lookup("GREETCRAFT_DATABASE") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("GREETCRAFT_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(path);
        }
        if let Some(path) = lookup("GREETCRAFT_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(path);
        }
        if let Some(path) = lookup("GREETCRAFT_FONT_DIR") {
            config.font_dir = PathBuf::from(path);
        }
        if let Some(family) = lookup("GREETCRAFT_FONT_FAMILY") {
            config.font_family = family;
        }
        if let Some(mb) = lookup("GREETCRAFT_MAX_UPLOAD_MB") {
            const KEY: &str = "GREETCRAFT_MAX_UPLOAD_MB";
            const EXPECTED: &str = "a whole number of megabytes";
            let megabytes: usize = parse(KEY, mb.clone(), EXPECTED)?;
            config.max_upload_bytes = megabytes.checked_mul(1024 * 1024).ok_or(ConfigError::Invalid {
                key: KEY,
                value: mb,
                expected: EXPECTED,
            })?;
        }
        Ok(config)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse<T: FromStr>(key: &'static str, value: String, expected: &'static str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value, expected })
}

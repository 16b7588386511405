//! Runtime settings.
//!
//! Read from the environment (a `.env` file is loaded first if present);
//! CLI flags override individual values.
//!
//! | Variable            | Default           |
//! |---------------------|-------------------|
//! | `ENERGY_DATA_PATH`  | `Energy_data.csv` |
//! | `ENERGY_STATIC_DIR` | `static`          |
//! | `PORT`              | `3000`            |

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

pub const DATA_PATH_VAR: &str = "ENERGY_DATA_PATH";
pub const STATIC_DIR_VAR: &str = "ENERGY_STATIC_DIR";
pub const PORT_VAR: &str = "PORT";

pub const DEFAULT_DATA_PATH: &str = "Energy_data.csv";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub static_dir: PathBuf,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(path) = lookup(DATA_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            settings.data_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(STATIC_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            settings.static_dir = PathBuf::from(dir);
        }
        if let Some(port) = lookup(PORT_VAR) {
            settings.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: PORT_VAR.to_string(),
                value: port.clone(),
            })?;
        }

        Ok(settings)
    }

    pub fn with_data_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.data_path = path;
        }
        self
    }

    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.static_dir = dir;
        }
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.port, 3000);
    }

    #[test]
    fn test_env_values() {
        let settings = Settings::from_lookup(lookup(&[
            (DATA_PATH_VAR, "/data/energy.csv"),
            (STATIC_DIR_VAR, "dist"),
            (PORT_VAR, " 8080 "),
        ]))
        .unwrap();
        assert_eq!(settings.data_path, PathBuf::from("/data/energy.csv"));
        assert_eq!(settings.static_dir, PathBuf::from("dist"));
        assert_eq!(settings.port, 8080);
    }

    #[test]
    fn test_invalid_port() {
        let err = Settings::from_lookup(lookup(&[(PORT_VAR, "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "PORT".into(),
                value: "eighty".into()
            }
        );
    }

    #[test]
    fn test_cli_overrides() {
        let settings = Settings::default()
            .with_data_path(Some("other.csv".into()))
            .with_static_dir(None)
            .with_port(Some(9000));
        assert_eq!(settings.data_path, PathBuf::from("other.csv"));
        assert_eq!(settings.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
        assert_eq!(settings.port, 9000);
    }
}

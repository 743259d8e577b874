use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::vehicles::DEFAULT_VEHICLES;

/// Environment variable naming a config file to use instead of `explorer.json`.
pub const CONFIG_ENV: &str = "EXPLORER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "explorer.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dashboard {
    #[default]
    Trajectory,
    Capability,
}

impl Dashboard {
    pub fn label(self) -> &'static str {
        match self {
            Dashboard::Trajectory => "Trajectories",
            Dashboard::Capability => "Launch capability",
        }
    }
}

/// Startup configuration. Every key is optional.
///
/// ```json
/// { "data_dir": "data", "dataset": "uranus-temp.csv",
///   "vehicles": ["sls-block-1"], "preload_vehicles": false,
///   "dashboard": "capability" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory holding the trajectory table and vehicle curves.
    pub data_dir: PathBuf,
    /// Trajectory table, relative to `data_dir` unless absolute.
    pub dataset: PathBuf,
    /// Launch vehicles offered in the dropdown; `<data_dir>/<name>.csv` each.
    pub vehicles: Vec<String>,
    pub preload_vehicles: bool,
    /// Dashboard shown first.
    pub dashboard: Dashboard,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            dataset: PathBuf::from("uranus-temp.csv"),
            vehicles: DEFAULT_VEHICLES.iter().map(|v| v.to_string()).collect(),
            preload_vehicles: false,
            dashboard: Dashboard::default(),
        }
    }
}

impl AppConfig {
    /// `$EXPLORER_CONFIG` if set, else `./explorer.json` if present, else defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => {
                log::debug!("No {DEFAULT_CONFIG_FILE}; using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Using config {}", path.display());
        Ok(config)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(&self.dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.dataset_path(), Path::new("data").join("uranus-temp.csv"));
        assert_eq!(config.vehicles.len(), 9);
        assert_eq!(config.vehicles[0], "falcon-heavy-expendable");
        assert_eq!(config.dashboard, Dashboard::Trajectory);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explorer.json");
        std::fs::write(
            &path,
            r#"{ "data_dir": "/srv/uranus", "vehicles": ["sls-block-1"], "dashboard": "capability" }"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.dataset_path(), Path::new("/srv/uranus/uranus-temp.csv"));
        assert_eq!(config.vehicles, vec!["sls-block-1".to_string()]);
        assert_eq!(config.dashboard, Dashboard::Capability);
        assert!(!config.preload_vehicles);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explorer.json");
        std::fs::write(&path, r#"{ "datadir": "x" }"#).unwrap();
        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn absolute_dataset_overrides_dir() {
        let config = AppConfig {
            dataset: PathBuf::from("/tmp/other.parquet"),
            ..AppConfig::default()
        };
        assert_eq!(config.dataset_path(), Path::new("/tmp/other.parquet"));
    }
}

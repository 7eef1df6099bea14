//! Configuration loading and root folder resolution

use crate::{Dataset, DatasetConfig, Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "LITCLOCK_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "litclock.db";

/// Service configuration file name inside the root folder
pub const CONFIG_FILE: &str = "litclock.toml";

/// Root folder resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. `root_folder` key of the user/system TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Database path for a resolved root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE)
}

/// Get the user or system configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("litclock").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/litclock/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("litclock"))
        .unwrap_or_else(|| PathBuf::from("./litclock_data"))
}

/// Grading service configuration (`litclock.toml` in the root folder)
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraderConfig {
    pub host: String,
    pub port: u16,
    pub selection: SelectionConfig,
    pub datasets: DatasetsConfig,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5790,
            selection: SelectionConfig::default(),
            datasets: DatasetsConfig::default(),
        }
    }
}

/// Entry selection policy
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    /// Chance per request of trying to re-present an AI-denied entry
    pub regrade_probability: f64,
    /// Upper bound on random draws per request
    pub max_attempts: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            regrade_probability: 0.10,
            max_attempts: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetsConfig {
    pub time: DatasetSettings,
    pub date: DatasetSettings,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetSettings {
    pub ai_checking: bool,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self { ai_checking: true }
    }
}

impl GraderConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GraderConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `litclock.toml` in the root folder
    ///
    /// A missing file yields the defaults.
    pub fn load(root_folder: &Path) -> Result<Self> {
        let path = root_folder.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let p = self.selection.regrade_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::Config(format!(
                "selection.regrade_probability must be within [0, 1], got {}",
                p
            )));
        }
        if self.selection.max_attempts == 0 {
            return Err(Error::Config(
                "selection.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Runtime descriptor for one dataset
    pub fn dataset(&self, dataset: Dataset) -> DatasetConfig {
        let settings = match dataset {
            Dataset::Time => self.datasets.time,
            Dataset::Date => self.datasets.date,
        };
        DatasetConfig::new(dataset, settings.ai_checking)
    }
}

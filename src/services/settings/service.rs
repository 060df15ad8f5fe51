use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::{AppConfig, BackendConfig};

/// Points at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "ROADMAP_CALENDAR_CONFIG";

const CONFIG_FILE: &str = "config.toml";
const VIEW_STATE_FILE: &str = "view_state.json";
const DATABASE_FILE: &str = "roadmap.db";

pub struct SettingsService {
    config_path: PathBuf,
    data_dir: PathBuf,
}

impl SettingsService {
    pub fn new(config_path: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Resolve locations from the platform directories, honouring
    /// `ROADMAP_CALENDAR_CONFIG` for the config file.
    pub fn from_environment() -> Self {
        let (config_dir, data_dir) = match ProjectDirs::from("com", "Roadmap", "RoadmapCalendar") {
            Some(dirs) => (dirs.config_dir().to_path_buf(), dirs.data_dir().to_path_buf()),
            None => {
                log::warn!("No home directory found, keeping config and data in the working directory");
                (PathBuf::from("."), PathBuf::from("."))
            }
        };

        let config_path = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => config_dir.join(CONFIG_FILE),
        };

        Self::new(config_path, data_dir)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn view_state_path(&self) -> PathBuf {
        self.data_dir.join(VIEW_STATE_FILE)
    }

    pub fn default_database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Load the config, falling back to defaults when it is missing or invalid.
    pub fn load(&self) -> AppConfig {
        if !self.config_path.exists() {
            log::info!(
                "No config at {}, using defaults",
                self.config_path.display()
            );
            return AppConfig::default();
        }
        match self.try_load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {:#}, using defaults", e);
                AppConfig::default()
            }
        }
    }

    pub fn try_load(&self) -> Result<AppConfig> {
        let data = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read {}", self.config_path.display()))?;
        let config: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", self.config_path.display()))?;
        config
            .grid
            .validate()
            .map_err(|e| anyhow!("Invalid grid settings: {}", e))?;
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        config
            .grid
            .validate()
            .map_err(|e| anyhow!("Invalid grid settings: {}", e))?;

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {}", parent.display()))?;
        }
        let data = toml::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(&self.config_path, data)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;
        Ok(())
    }

    /// The configured backend, or a SQLite store in the data dir.
    pub fn resolve_backend(&self, config: &AppConfig) -> BackendConfig {
        config.backend.clone().unwrap_or_else(|| BackendConfig::Sqlite {
            path: self.default_database_path(),
        })
    }
}

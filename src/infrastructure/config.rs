use crate::domain::config::{HavocConfig, ProfileConfig, DEFAULT_PROFILE};
use crate::domain::error::{HavocError, HavocResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a manager for the default location, `~/.havoc/config`
    pub fn new() -> HavocResult<Self> {
        Ok(Self {
            config_path: Self::default_config_path()?,
        })
    }

    /// Create a manager for an explicit file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    /// Path of the configuration file this manager reads
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Shell history file, kept next to the configuration file
    pub fn history_path(&self) -> PathBuf {
        self.config_path.with_file_name("history")
    }

    fn default_config_path() -> HavocResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| HavocError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".havoc").join("config"))
    }

    /// Load the whole configuration file
    pub fn load_config(&self) -> HavocResult<HavocConfig> {
        let path = &self.config_path;
        let content = fs::read_to_string(path).map_err(|e| HavocError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| HavocError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Load one profile, `default` when `name` is `None`
    pub fn load_profile(&self, name: Option<&str>) -> HavocResult<ProfileConfig> {
        let name = name.unwrap_or(DEFAULT_PROFILE);
        let config = self.load_config()?;
        debug!("Loaded {} profile(s) from {}", config.profiles.len(), self.config_path.display());

        config.profile(name).cloned().ok_or_else(|| HavocError::Config {
            message: format!(
                "Profile '{}' not found in {}",
                name,
                self.config_path.display()
            ),
        })
    }

    /// Save configuration to the managed path
    pub fn save_config(&self, config: &HavocConfig) -> HavocResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| HavocError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| HavocError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&self.config_path, content).map_err(|e| HavocError::Config {
            message: format!(
                "Failed to write config file {}: {}",
                self.config_path.display(),
                e
            ),
        })
    }

    /// Write a template `default` profile. Refuses to overwrite an existing file.
    pub fn init_config(&self) -> HavocResult<()> {
        if self.config_path.exists() {
            return Err(HavocError::Config {
                message: format!(
                    "Configuration already exists at {}",
                    self.config_path.display()
                ),
            });
        }

        let mut config = HavocConfig::default();
        config
            .profiles
            .insert(DEFAULT_PROFILE.to_string(), ProfileConfig::template());
        self.save_config(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::OutputMode;
    use tempfile::TempDir;

    #[test]
    fn test_default_path_is_under_home() {
        let manager = ConfigManager::new().unwrap();
        assert!(manager.config_path().ends_with(".havoc/config"));
    }

    #[test]
    fn test_init_then_load_profile() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join(".havoc").join("config"));

        manager.init_config().unwrap();
        let profile = manager.load_profile(None).unwrap();
        assert_eq!(profile.api_region, "us-east-1");
        assert_eq!(profile.output, OutputMode::Table);

        assert!(manager.init_config().is_err());
    }

    #[test]
    fn test_history_lives_beside_config() {
        let manager = ConfigManager::with_path("/srv/havoc/ops.toml");
        assert_eq!(manager.history_path(), PathBuf::from("/srv/havoc/history"));
    }

    #[test]
    fn test_missing_profile() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config"));
        manager.init_config().unwrap();

        let err = manager.load_profile(Some("staging")).unwrap_err();
        assert!(err.to_string().contains("Profile 'staging' not found"));
    }

    #[test]
    fn test_missing_file_and_bad_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config");
        let manager = ConfigManager::with_path(&path);
        assert!(matches!(manager.load_config(), Err(HavocError::Config { .. })));

        fs::write(&path, "[default\napi_key = ").unwrap();
        let err = manager.load_config().unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}

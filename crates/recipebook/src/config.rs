//! Configuration management for recipebook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::HashSet;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::seed::DEFAULT_CATEGORIES;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "recipebook";

/// Default database file name for the `SQLite` backend.
const DATABASE_FILE_NAME: &str = "recipes.db";

/// Default directory name for the file backend.
const FILE_STORE_DIR_NAME: &str = "kv";

/// Key of the slot holding the serialized collection.
pub const DEFAULT_STORAGE_KEY: &str = "recipes.v1";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RECIPEBOOK_`, sections split on `__`)
/// 2. TOML config file at `~/.config/recipebook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Recipe collection configuration.
    pub recipes: RecipesConfig,
}

/// Which key-value backend holds the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// A single `SQLite` database file.
    #[default]
    Sqlite,
    /// One file per key inside a directory.
    File,
    /// Process memory only; nothing survives exit.
    Memory,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::File => write!(f, "file"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend kind.
    pub backend: BackendKind,
    /// Database file (sqlite) or directory (file).
    /// Defaults under `~/.local/share/recipebook/`.
    pub path: Option<PathBuf>,
    /// Slot key for the collection.
    pub key: String,
}

/// Recipe collection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipesConfig {
    /// Ordered category labels offered for selection and filtering.
    pub categories: Vec<String>,
    /// Populate an empty collection with the seed set at startup.
    pub seed_on_start: bool,
    /// JSON file replacing the built-in seed set.
    pub seed_file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: None, // Resolved per backend at runtime
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
            seed_on_start: true,
            seed_file: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("RECIPEBOOK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage key must not be empty".to_string(),
            });
        }

        if self.recipes.categories.is_empty() {
            return Err(Error::ConfigValidation {
                message: "at least one recipe category is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for category in &self.recipes.categories {
            if category.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "recipe categories must not be blank".to_string(),
                });
            }
            if !seen.insert(category.as_str()) {
                return Err(Error::ConfigValidation {
                    message: format!("duplicate recipe category: {category}"),
                });
            }
        }

        Ok(())
    }

    /// Get the storage path, resolving the per-backend default if not set.
    ///
    /// The memory backend has no path and yields `None`.
    #[must_use]
    pub fn storage_path(&self) -> Option<PathBuf> {
        match self.storage.backend {
            BackendKind::Memory => None,
            BackendKind::Sqlite => Some(
                self.storage
                    .path
                    .clone()
                    .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME)),
            ),
            BackendKind::File => Some(
                self.storage
                    .path
                    .clone()
                    .unwrap_or_else(|| Self::default_data_dir().join(FILE_STORE_DIR_NAME)),
            ),
        }
    }

    /// The category a new recipe starts with.
    #[must_use]
    pub fn default_category(&self) -> &str {
        self.recipes
            .categories
            .first()
            .map_or(DEFAULT_CATEGORIES[0], String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.backend, BackendKind::Sqlite);
        assert_eq!(config.storage.key, "recipes.v1");
        assert!(config.storage.path.is_none());
        assert!(config.recipes.seed_on_start);
        assert!(config.recipes.seed_file.is_none());
        assert_eq!(config.recipes.categories.len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_key() {
        let mut config = Config::default();
        config.storage.key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("storage key"));
    }

    #[test]
    fn test_validate_no_categories() {
        let mut config = Config::default();
        config.recipes.categories.clear();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("category"));
    }

    #[test]
    fn test_validate_blank_category() {
        let mut config = Config::default();
        config.recipes.categories.push(" ".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_duplicate_category() {
        let mut config = Config::default();
        config.recipes.categories = vec!["Dinner".to_string(), "Dinner".to_string()];

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("duplicate recipe category: Dinner"));
    }

    #[test]
    fn test_storage_path_defaults_per_backend() {
        let mut config = Config::default();
        let sqlite = config.storage_path().unwrap();
        assert!(sqlite.to_string_lossy().ends_with("recipes.db"));

        config.storage.backend = BackendKind::File;
        let dir = config.storage_path().unwrap();
        assert!(dir.to_string_lossy().ends_with("kv"));

        config.storage.backend = BackendKind::Memory;
        assert!(config.storage_path().is_none());
    }

    #[test]
    fn test_storage_path_custom() {
        let mut config = Config::default();
        config.storage.path = Some(PathBuf::from("/custom/recipes.sqlite"));

        assert_eq!(
            config.storage_path(),
            Some(PathBuf::from("/custom/recipes.sqlite"))
        );
    }

    #[test]
    fn test_default_category_is_first() {
        let mut config = Config::default();
        assert_eq!(config.default_category(), DEFAULT_CATEGORIES[0]);

        config.recipes.categories = vec!["Dinner".to_string(), "Lunch".to_string()];
        assert_eq!(config.default_category(), "Dinner");
    }

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Sqlite.to_string(), "sqlite");
        assert_eq!(BackendKind::File.to_string(), "file");
        assert_eq!(BackendKind::Memory.to_string(), "memory");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("recipebook"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Missing file falls back to defaults
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [storage]
            backend = "file"
            key = "recipes.test"

            [recipes]
            categories = ["Soup", "Salad"]
            seed_on_start = false
            "#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.storage.backend, BackendKind::File);
        assert_eq!(config.storage.key, "recipes.test");
        assert_eq!(config.recipes.categories, vec!["Soup", "Salad"]);
        assert!(!config.recipes.seed_on_start);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[recipes]\ncategories = []\n").unwrap();

        assert!(Config::load_from(Some(path)).is_err());
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"backend": "memory"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.backend, BackendKind::Memory);
        assert_eq!(storage.key, DEFAULT_STORAGE_KEY);
    }
}

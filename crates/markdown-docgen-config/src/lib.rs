use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "docgen.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root holding one directory of markdown files per locale.
    pub docs_dir: PathBuf,
    /// Output directory for `structured-docs.json` and `section-mapping.json`.
    pub data_dir: PathBuf,
    /// Output directory for `docs.ts`.
    pub types_dir: PathBuf,
    pub locales: Vec<String>,
    /// Locale whose section titles define the canonical section ids.
    pub master_locale: String,
    /// Fail generation on any cross-locale inconsistency.
    pub strict: bool,
    pub words_per_minute: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            data_dir: PathBuf::from("src/data"),
            types_dir: PathBuf::from("src/types"),
            locales: vec!["en".to_string(), "ru".to_string()],
            master_locale: "en".to_string(),
            strict: false,
            words_per_minute: 200,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the configured directories
        config.expand_paths();

        Ok(Some(config))
    }

    /// Load the config at `config_path`, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        Ok(Self::load_from_path(config_path)?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locales.is_empty() {
            return Err(ConfigError::Invalid("no locales configured".to_string()));
        }
        if !self.locales.contains(&self.master_locale) {
            return Err(ConfigError::Invalid(format!(
                "master locale '{}' is not one of the configured locales ({})",
                self.master_locale,
                self.locales.join(", ")
            )));
        }
        if self.words_per_minute == 0 {
            return Err(ConfigError::Invalid(
                "words_per_minute must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn expand_paths(&mut self) {
        for path in [&mut self.docs_dir, &mut self.data_dir, &mut self.types_dir] {
            if let Some(expanded) = Self::expand_path(path) {
                *path = expanded;
            }
        }
    }

    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

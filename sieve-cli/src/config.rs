use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sieve_core::QueryParams;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`
///
/// ```toml
/// input = "batch.json"
///
/// [query]
/// quantity_below = 24
/// status = "A"
/// comment_pattern = "PROMO%SUMMER"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default input batch (JSON) for `sieve run`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Query literals; missing keys take the reference values
    #[serde(default)]
    pub query: QueryParams,
}

impl Config {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = Self::resolve_path(path);
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config
            .query
            .validate()
            .with_context(|| format!("invalid [query] table in {}", config_path.display()))?;
        Ok(config)
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        Ok(())
    }

    pub fn resolve_path(path: Option<&str>) -> PathBuf {
        match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_path(),
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sieve")
            .join("config.toml")
    }
}

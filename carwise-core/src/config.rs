//! Catalog endpoint configuration
//!
//! ## Configuration Sources (in precedence order)
//!
//! 1. Explicit path (CLI `--config`), which must exist
//! 2. `.carwise/catalog.yml` in the working directory
//! 3. `<platform config dir>/carwise/catalog.yml`
//! 4. Built-in defaults
//!
//! ```yaml
//! primary_url: https://api.carwise.example/v1/vehicles
//! fallback_urls:
//!   - https://mirror-a.carwise.example/v1/vehicles
//! attempt_timeout_secs: 8
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::ConfigError;

/// Project-local configuration file, relative to the working directory
pub const PROJECT_CONFIG_PATH: &str = ".carwise/catalog.yml";

/// Per-attempt deadline applied to every endpoint
pub const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 8;

/// Where the catalog is fetched from and how long each attempt may take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_primary_url")]
    pub primary_url: String,

    /// Tried strictly in order after the primary fails
    #[serde(default = "default_fallback_urls")]
    pub fallback_urls: Vec<String>,

    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            primary_url: default_primary_url(),
            fallback_urls: default_fallback_urls(),
            attempt_timeout_secs: default_attempt_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_primary_url() -> String {
    "https://api.carwise.example/v1/vehicles".to_string()
}

fn default_fallback_urls() -> Vec<String> {
    vec![
        "https://api.carwise.example/v1/vehicles?populate=vehicle_brand_id".to_string(),
        "https://mirror-a.carwise.example/v1/vehicles".to_string(),
        "https://mirror-b.carwise.example/vehicles.json".to_string(),
    ]
}

fn default_attempt_timeout() -> u64 {
    DEFAULT_ATTEMPT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    concat!("carwise/", env!("CARGO_PKG_VERSION")).to_string()
}

impl CatalogConfig {
    /// Parse from YAML text and validate
    pub fn from_yaml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a specific file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&content, path)
    }

    /// Resolve configuration using the documented precedence
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::discover_in(explicit, Path::new("."), global_config_path())
    }

    /// Resolution with an explicit working directory and global path
    pub fn discover_in(
        explicit: Option<&Path>,
        working_dir: &Path,
        global: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!("Using catalog config from --config: {}", path.display());
            return Self::load_from_path(path);
        }

        let project = working_dir.join(PROJECT_CONFIG_PATH);
        if project.exists() {
            debug!("Using project catalog config: {}", project.display());
            return Self::load_from_path(&project);
        }

        if let Some(global) = global.filter(|p| p.exists()) {
            debug!("Using global catalog config: {}", global.display());
            return Self::load_from_path(&global);
        }

        debug!("No catalog config found, using built-in endpoints");
        Ok(Self::default())
    }

    /// Reject values the client cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for url in std::iter::once(&self.primary_url).chain(&self.fallback_urls) {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "endpoint URL must start with http:// or https:// (got: {url})"
                )));
            }
        }

        if self.attempt_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "attempt_timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    /// Primary first, then fallbacks in order
    pub fn endpoint_urls(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_url.as_str()).chain(self.fallback_urls.iter().map(String::as_str))
    }
}

/// `<platform config dir>/carwise/catalog.yml`, if the platform has one
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "carwise", "carwise")
        .map(|dirs| dirs.config_dir().join("catalog.yml"))
}

//! TOML configuration parsing and validation.
//!
//! ```toml
//! [catalog]
//! backend = "http"
//! base_url = "http://localhost:8080/rest"
//! timeout_secs = 10
//! token = "eyJhbGciOi..."
//!
//! [typeahead]
//! quiet_ms = 400
//!
//! [logging]
//! filter = "movie_scout=info,movie_scout_core=info"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub typeahead: TypeaheadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token for the catalog API. Its presence means "logged in".
    #[serde(default)]
    pub token: Option<String>,
    /// JSON seed file for the in-memory backend. Relative paths resolve
    /// against the config file's directory.
    #[serde(default)]
    pub fixture: Option<PathBuf>,
}

fn default_backend() -> String {
    "http".to_string()
}
fn default_base_url() -> String {
    "http://localhost:8080/rest".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct TypeaheadConfig {
    #[serde(default = "default_quiet_ms")]
    pub quiet_ms: u64,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            quiet_ms: default_quiet_ms(),
        }
    }
}

fn default_quiet_ms() -> u64 {
    400
}

impl TypeaheadConfig {
    pub fn quiet_window(&self) -> Duration {
        Duration::from_millis(self.quiet_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "movie_scout=info,movie_scout_core=info".to_string()
}

impl Config {
    /// An empty in-memory catalog with default settings, for commands that
    /// can run without a config file.
    pub fn minimal() -> Self {
        Self {
            catalog: CatalogConfig {
                backend: "memory".to_string(),
                base_url: default_base_url(),
                timeout_secs: default_timeout_secs(),
                token: None,
                fixture: None,
            },
            typeahead: TypeaheadConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;

    if let Some(fixture) = &config.catalog.fixture {
        if fixture.is_relative() {
            if let Some(dir) = path.parent() {
                config.catalog.fixture = Some(dir.join(fixture));
            }
        }
    }

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.typeahead.quiet_ms == 0 {
        anyhow::bail!("typeahead.quiet_ms must be > 0");
    }

    if config.catalog.timeout_secs == 0 {
        anyhow::bail!("catalog.timeout_secs must be > 0");
    }

    match config.catalog.backend.as_str() {
        "http" => {
            let url = config.catalog.base_url.as_str();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!(
                    "catalog.base_url must start with http:// or https://, got '{}'",
                    url
                );
            }
        }
        "memory" => {}
        other => anyhow::bail!(
            "Unknown catalog backend: '{}'. Must be http or memory.",
            other
        ),
    }

    Ok(())
}

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::utils::error::Result;

// Every section falls back to its defaults: an empty list does not survive
// the round trip through a config source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub finder: FinderConfig,
    pub http: HttpConfig,
    pub shops: ShopsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Upper bound on shops queried at the same time.
    pub max_concurrent_shops: usize,
    /// Deadline for one shop, fetch and parse included.
    pub search_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
    pub image_timeout_ms: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopsConfig {
    /// Shops to search by default. Empty means all registered shops.
    pub enabled: Vec<String>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            max_concurrent_shops: 16,
            search_timeout_secs: 30,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 20,
            image_timeout_ms: 2000,
            user_agent: concat!("articlefinder/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::load(Path::new("config"))
    }

    /// Layer built-in defaults, the files in `config_dir` and
    /// `ARTICLEFINDER__*` environment variables.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::from(config_dir.join("default")).required(false))
            .add_source(File::from(config_dir.join(&run_mode)).required(false))
            // Local overrides, ignored by git
            .add_source(File::from(config_dir.join("local")).required(false))
            .add_source(
                Environment::with_prefix("ARTICLEFINDER")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("shops.enabled")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.finder.max_concurrent_shops == 0 {
            return Err(ConfigError::Message(
                "Finder max_concurrent_shops must be greater than 0".into(),
            ));
        }

        if self.finder.search_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "Finder search_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "HTTP request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.http.image_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "HTTP image_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("HTTP user_agent must not be empty".into()));
        }

        if self.shops.enabled.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Message("Shop names must not be empty".into()));
        }

        Ok(())
    }
}

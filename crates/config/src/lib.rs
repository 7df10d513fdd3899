//! Configuration loading for simmer.
//!
//! Values are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. A configuration file (TOML, YAML or JSON, picked by extension). Either
//!    the path given to [`Config::load`] or, when none is given, `simmer.toml`
//!    in the platform's config directory if it exists.
//! 3. `SIMMER_`-prefixed environment variables, with `__` separating nested
//!    keys (e.g. `SIMMER_CACHE__TTL_SECS=60`).

pub mod error;

use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

const ENV_PREFIX: &str = "SIMMER_";
const CONFIG_FILE: &str = "simmer.toml";
const DATABASE_FILE: &str = "simmer.sqlite";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a cached recipe stays valid.
    pub ttl_secs: u64,
    /// Recipes held before the oldest-inserted one is evicted.
    pub max_entries: usize,
}
impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            max_entries: 100,
        }
    }
}
impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file. Defaults to `simmer.sqlite` in the platform's data
    /// directory.
    pub path: Option<PathBuf>,
    pub max_connections: Option<u32>,
}
impl DatabaseConfig {
    /// The configured database path, or the platform default.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let dirs = project_dirs()
            .ok_or_raise(|| ErrorKind::Invalid("no database path configured and no home directory found".to_string()))?;
        Ok(dirs.data_dir().join(DATABASE_FILE))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "simmer")
}

impl Config {
    /// Where [`load`](Self::load) looks for a configuration file when it isn't
    /// given one.
    pub fn default_config_file() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load and validate configuration from every layer.
    ///
    /// An explicit `file` must exist; the default file is optional.
    #[instrument]
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = match file {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::Missing(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_config_file().filter(|path| path.is_file()),
        };
        match &file {
            Some(path) => tracing::debug!(path = %path.display(), "Loading configuration file"),
            None => tracing::debug!("No configuration file, using defaults and environment"),
        }
        Self::from_figment(Self::figment(file.as_deref()))
    }

    /// The layered configuration sources, before extraction.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extract and validate configuration from an arbitrary [`Figment`].
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_secs == 0 {
            exn::bail!(ErrorKind::Invalid("cache.ttl_secs must be greater than zero".to_string()));
        }
        if self.cache.max_entries == 0 {
            exn::bail!(ErrorKind::Invalid("cache.max_entries must be greater than zero".to_string()));
        }
        if self.database.max_connections == Some(0) {
            exn::bail!(ErrorKind::Invalid("database.max_connections must be greater than zero".to_string()));
        }
        if self.database.path.as_ref().is_some_and(|path| path.as_os_str().is_empty()) {
            exn::bail!(ErrorKind::Invalid("database.path must not be empty".to_string()));
        }
        Ok(())
    }
}

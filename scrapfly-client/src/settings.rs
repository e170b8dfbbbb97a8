//! Client configuration: API key, host and request limits.
//!
//! Values resolve as env vars > config file > defaults. The config file lives
//! at `<config_dir>/scrapfly/config.toml`:
//!
//! ```toml
//! [scrapfly]
//! api_key = "scp-live-..."
//! host = "https://api.scrapfly.io"
//! timeout_secs = 150
//! concurrency = 5
//! verify_ssl = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_HOST: &str = "https://api.scrapfly.io";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(150);
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_USER_AGENT: &str = concat!("scrapfly-rs/", env!("CARGO_PKG_VERSION"));

pub const ENV_KEY: &str = "SCRAPFLY_KEY";
pub const ENV_HOST: &str = "SCRAPFLY_HOST";

/// Settings shared by every request a client makes.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_key: String,
    pub host: String,
    /// Per-request deadline enforced by the client.
    pub timeout: Duration,
    /// Default concurrency for batch dispatch.
    pub concurrency: usize,
    pub verify_ssl: bool,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: DEFAULT_HOST.to_string(),
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            verify_ssl: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Where a config field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Hard-coded default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each config field.
#[derive(Debug)]
pub struct ConfigSources {
    pub api_key: ConfigSource,
    pub host: ConfigSource,
    pub timeout: ConfigSource,
    pub concurrency: ConfigSource,
    pub verify_ssl: ConfigSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    scrapfly: Option<FileSection>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct FileSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    concurrency: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verify_ssl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_agent: Option<String>,
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load from environment variables, the config file, and defaults.
    ///
    /// Priority: env vars > config file > defaults. A missing config file is
    /// not an error; an unreadable or malformed one is.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(config_path().as_deref(), process_env)
    }

    /// [`load`](Self::load) with an explicit file and env lookup.
    pub fn load_with(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => read_config_file(path)?,
            None => None,
        }
        .unwrap_or_default();

        let defaults = Self::default();
        let config = Self {
            api_key: env(ENV_KEY)
                .or(file.api_key)
                .unwrap_or(defaults.api_key),
            host: env(ENV_HOST).or(file.host).unwrap_or(defaults.host),
            timeout: file
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            concurrency: file.concurrency.unwrap_or(defaults.concurrency),
            verify_ssl: file.verify_ssl.unwrap_or(defaults.verify_ssl),
            user_agent: file.user_agent.unwrap_or(defaults.user_agent),
        };
        config.check()?;
        Ok(config)
    }

    /// Override fields with explicit values (e.g., from CLI args).
    pub fn with_overrides(mut self, api_key: Option<String>, host: Option<String>) -> Self {
        if let Some(key) = api_key {
            self.api_key = key;
        }
        if let Some(host) = host {
            self.host = host;
        }
        self
    }

    fn check(&self) -> Result<(), ConfigError> {
        if !(self.host.starts_with("http://") || self.host.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "host",
                message: format!("'{}' is not an http(s) URL", self.host),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scrapfly").join("config.toml"))
}

/// Save the config to the default config file. Returns the path written.
pub fn save_to_file(config: &ClientConfig) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(&path, config)?;
    Ok(path)
}

/// Save the config to `path`, creating parent directories as needed.
///
/// Fields equal to their defaults are omitted from the file.
pub fn save_to(path: &Path, config: &ClientConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let defaults = ClientConfig::default();
    let section = FileSection {
        api_key: (!config.api_key.is_empty()).then(|| config.api_key.clone()),
        host: (config.host != defaults.host).then(|| config.host.clone()),
        timeout_secs: (config.timeout != defaults.timeout).then(|| config.timeout.as_secs()),
        concurrency: (config.concurrency != defaults.concurrency).then_some(config.concurrency),
        verify_ssl: (config.verify_ssl != defaults.verify_ssl).then_some(config.verify_ssl),
        user_agent: (config.user_agent != defaults.user_agent).then(|| config.user_agent.clone()),
    };
    let file = ConfigFile {
        scrapfly: Some(section),
    };

    let toml_str = toml::to_string_pretty(&file)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Determine where each config field is coming from.
pub fn config_sources() -> ConfigSources {
    config_sources_with(config_path().as_deref(), process_env)
}

/// [`config_sources`] with an explicit file and env lookup.
pub fn config_sources_with(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> ConfigSources {
    let file = path
        .and_then(|p| read_config_file(p).ok().flatten())
        .unwrap_or_default();

    let from_file = |present: bool, fallback: ConfigSource| {
        if present {
            ConfigSource::ConfigFile
        } else {
            fallback
        }
    };

    let api_key = if env(ENV_KEY).is_some() {
        ConfigSource::EnvVar(ENV_KEY)
    } else {
        from_file(file.api_key.is_some(), ConfigSource::Missing)
    };

    let host = if env(ENV_HOST).is_some() {
        ConfigSource::EnvVar(ENV_HOST)
    } else {
        from_file(file.host.is_some(), ConfigSource::Default)
    };

    ConfigSources {
        api_key,
        host,
        timeout: from_file(file.timeout_secs.is_some(), ConfigSource::Default),
        concurrency: from_file(file.concurrency.is_some(), ConfigSource::Default),
        verify_ssl: from_file(file.verify_ssl.is_some(), ConfigSource::Default),
    }
}

fn read_config_file(path: &Path) -> Result<Option<FileSection>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let config: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(config.scrapfly)
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;

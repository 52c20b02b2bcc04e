mod api;
mod defaults;
mod settings;
mod validation;

use crate::api::{ApiClient, RetryPolicy};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use api::ApiConfig;
pub use defaults::DEFAULT_CLIENT_ID;
pub use settings::{BotConfig, KnowledgeBaseConfig, LoggingConfig, PaginationConfig};
pub use validation::{expand_env_var_in_string, normalize_base_url};

/// Values given on the command line. They win over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub client_id: Option<String>,
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
}

/// Effective settings, resolved once at startup and handed to each controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub client_id: String,
    pub timeout: Duration,
    pub health_timeout: Duration,
    pub retry: RetryPolicy,
    pub allowed_domain: String,
    pub pagination: PaginationConfig,
    pub bot: BotConfig,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn first_env<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
}

impl Config {
    pub fn from_env_and_args(overrides: &ConfigOverrides) -> Result<Self> {
        let file_config = match &overrides.config_path {
            Some(path) => FileConfig::load_from(path)?,
            None => FileConfig::load()?,
        };
        Self::resolve(overrides, file_config, |name| env::var(name).ok())
    }

    /// Merge the sources: CLI overrides > environment > config file > defaults.
    pub fn resolve<F>(overrides: &ConfigOverrides, file: FileConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expand = |value: String| expand_env_var_in_string(&value, &lookup);

        // Base URL: CLI > env var > config file > default
        let api_base_url = overrides
            .api_base_url
            .clone()
            .or_else(|| first_env(&lookup, &["SUPPORTCTL_API_BASE_URL", "VITE_API_BASE_URL"]))
            .or(file.api.base_url.clone())
            .map(expand)
            .unwrap_or_else(defaults::default_base_url);
        let api_base_url = normalize_base_url(&api_base_url).map_err(anyhow::Error::msg)?;

        // Client id: CLI > env var > config file > built-in fallback
        let client_id = overrides
            .client_id
            .clone()
            .or_else(|| first_env(&lookup, &["SUPPORTCTL_CLIENT_ID", "VITE_CLIENT_ID"]))
            .or(file.api.client_id.clone())
            .map(expand)
            .map(|id| id.trim().to_string())
            .unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string());
        if client_id.is_empty() {
            bail!("client id must not be empty");
        }

        let timeout_ms = match lookup("SUPPORTCTL_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("SUPPORTCTL_TIMEOUT_MS is not a number: {}", raw))?,
            None => file.api.timeout_ms,
        };
        if timeout_ms == 0 {
            bail!("request timeout must be greater than zero");
        }

        let allowed_domain = lookup("SUPPORTCTL_ALLOWED_DOMAIN")
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(file.knowledge_base.allowed_domain);

        let verbose = overrides.verbose
            || lookup("SUPPORTCTL_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file.logging.verbose)
                .unwrap_or(false);

        Ok(Config {
            api_base_url,
            client_id,
            timeout: Duration::from_millis(timeout_ms),
            health_timeout: Duration::from_millis(file.api.health_timeout_ms),
            retry: RetryPolicy {
                max_attempts: file.api.max_attempts.max(1),
                base_delay: Duration::from_millis(file.api.retry_base_delay_ms),
            },
            allowed_domain,
            pagination: file.pagination,
            bot: file.bot,
            verbose,
        })
    }

    /// Build the endpoint client these settings describe.
    pub fn api_client(&self) -> crate::error::Result<ApiClient> {
        Ok(ApiClient::new(&self.api_base_url)?
            .with_timeout(self.timeout)
            .with_health_timeout(self.health_timeout)
            .with_retry_policy(self.retry)
            .with_allowed_domain(&self.allowed_domain))
    }
}

impl FileConfig {
    /// Load the first config file found on the search path, or defaults if there is none.
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };
        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            // Current directory first (local override)
            PathBuf::from(".supportctl.yaml"),
            PathBuf::from(".supportctl.yml"),
            PathBuf::from(".supportctl.json"),
        ];

        if let Some(config_dir) = Self::user_config_dir() {
            paths.push(config_dir.join("supportctl.yaml"));
            paths.push(config_dir.join("supportctl.yml"));
            paths.push(config_dir.join("supportctl.json"));
        }

        paths
    }

    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("supportctl"))
    }

    /// Starter file written by `config init`.
    pub fn starter() -> Self {
        let mut config = FileConfig::default();
        config.api.base_url = Some(defaults::default_base_url());
        config.api.client_id = Some(DEFAULT_CLIENT_ID.to_string());
        config
    }

    /// Write the starter file to `path`. An existing file is never overwritten.
    pub fn write_starter(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("Config file already exists: {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents = serde_yaml::to_string(&Self::starter())?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

//! TOML configuration and index settings.
//!
//! The config file is optional. When it is absent, the built-in defaults are
//! used and the remote index coordinates must come from the environment.
//! The write credential is never read from the file: it is taken only from
//! `ALGOLIA_ADMIN_API_KEY` and carried in [`IndexSettings`].

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{IndexerError, Result};

pub const ENV_APP_ID: &str = "ALGOLIA_APP_ID";
pub const ENV_INDEX_NAME: &str = "ALGOLIA_INDEX_NAME";
pub const ENV_API_KEY: &str = "ALGOLIA_ADMIN_API_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub algolia: AlgoliaConfig,
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content: ContentConfig::default(),
            algolia: AlgoliaConfig::default(),
            categories: default_categories(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extensions: default_extensions(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("./docs")
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "mdx".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlgoliaConfig {
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub index_name: Option<String>,
    /// Overrides `https://{app_id}.algolia.net`.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub wait_for_tasks: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AlgoliaConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            index_name: None,
            host: None,
            batch_size: default_batch_size(),
            wait_for_tasks: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_batch_size() -> usize {
    1000
}
fn default_timeout_secs() -> u64 {
    30
}

/// One entry of the ordered path → category mapping.
///
/// Rules are evaluated in declaration order and the first whose `needle`
/// occurs in the document path wins.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub needle: String,
    pub label: String,
}

impl CategoryRule {
    pub fn new(needle: &str, label: &str) -> Self {
        Self {
            needle: needle.to_string(),
            label: label.to_string(),
        }
    }
}

pub fn default_categories() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("api/", "API Reference"),
        CategoryRule::new("getting-started/", "Getting Started"),
        CategoryRule::new("ad-units/", "Ad Units"),
        CategoryRule::new("examples/", "Examples"),
        CategoryRule::new("sdk/", "SDK"),
    ]
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        IndexerError::configuration(format!(
            "failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| {
        IndexerError::configuration(format!(
            "failed to parse config file {}: {}",
            path.display(),
            e
        ))
    })?;

    validate(&config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::default`].
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(Config::default())
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.algolia.batch_size == 0 {
        return Err(IndexerError::configuration("algolia.batch_size must be > 0"));
    }

    if config.content.extensions.is_empty() {
        return Err(IndexerError::configuration(
            "content.extensions must list at least one extension",
        ));
    }
    if config
        .content
        .extensions
        .iter()
        .any(|ext| ext.trim_start_matches('.').is_empty())
    {
        return Err(IndexerError::configuration(
            "content.extensions must not contain empty entries",
        ));
    }

    for rule in &config.categories {
        if rule.needle.is_empty() || rule.label.is_empty() {
            return Err(IndexerError::configuration(format!(
                "category rule needs a non-empty needle and label (got needle='{}', label='{}')",
                rule.needle, rule.label
            )));
        }
    }

    Ok(())
}

/// Everything the synchronizer needs to reach and authenticate against the
/// remote index. Resolved once at startup and passed in explicitly.
#[derive(Clone)]
pub struct IndexSettings {
    pub app_id: Option<String>,
    pub index_name: Option<String>,
    pub api_key: Option<String>,
    pub host: Option<String>,
    pub batch_size: usize,
    pub wait_for_tasks: bool,
    pub timeout_secs: u64,
}

impl IndexSettings {
    /// Merge the `[algolia]` table with values looked up through `env`.
    ///
    /// Environment values win over the file for the app id and index name.
    /// The api key has no file counterpart.
    pub fn resolve<F>(algolia: &AlgoliaConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            app_id: non_blank(env(ENV_APP_ID)).or_else(|| algolia.app_id.clone()),
            index_name: non_blank(env(ENV_INDEX_NAME)).or_else(|| algolia.index_name.clone()),
            api_key: non_blank(env(ENV_API_KEY)),
            host: algolia.host.clone(),
            batch_size: algolia.batch_size,
            wait_for_tasks: algolia.wait_for_tasks,
            timeout_secs: algolia.timeout_secs,
        }
    }

    pub fn from_env(algolia: &AlgoliaConfig) -> Self {
        Self::resolve(algolia, |key| std::env::var(key).ok())
    }

    pub fn app_id(&self) -> Result<&str> {
        required(self.app_id.as_deref(), || {
            format!("application id is required (set {} or algolia.app_id)", ENV_APP_ID)
        })
    }

    pub fn index_name(&self) -> Result<&str> {
        required(self.index_name.as_deref(), || {
            format!(
                "index name is required (set {} or algolia.index_name)",
                ENV_INDEX_NAME
            )
        })
    }

    pub fn api_key(&self) -> Result<&str> {
        required(self.api_key.as_deref(), || {
            format!("{} environment variable is required", ENV_API_KEY)
        })
    }

    /// Fail with a configuration error unless every required value is present.
    pub fn validate(&self) -> Result<()> {
        self.api_key()?;
        self.app_id()?;
        self.index_name()?;
        if self.batch_size == 0 {
            return Err(IndexerError::configuration("batch size must be > 0"));
        }
        Ok(())
    }
}

fn required<'a>(value: Option<&'a str>, message: impl FnOnce() -> String) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(IndexerError::Configuration(message())),
    }
}

impl fmt::Debug for IndexSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexSettings")
            .field("app_id", &self.app_id)
            .field("index_name", &self.index_name)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("batch_size", &self.batch_size)
            .field("wait_for_tasks", &self.wait_for_tasks)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

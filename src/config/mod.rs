//! Configuration management.
//!
//! Settings come from an optional TOML file overlaid by environment variables
//! prefixed with `LEAD_EMAIL_FINDER__` (double underscore between sections),
//! e.g. `LEAD_EMAIL_FINDER__SEARCH__BASE_URL=http://localhost:8080`.
//!
//! # Configuration File Format
//!
//! ```toml
//! [search]
//! base_url = "http://localhost:8080"
//! timeout_secs = 15
//! max_concurrent = 4
//! pages_per_query = 2
//! page_delay_ms = 300
//!
//! [filter]
//! blacklist = ["competitor.com"]
//! replace_default_blacklist = false
//!
//! [planner]
//! address_patterns = true
//!
//! [retry]
//! max_attempts = 1
//! initial_delay_ms = 500
//! ```

use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::finder::Blacklist;
use crate::utils::RetryConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LEAD_EMAIL_FINDER";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "lead-email-finder.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Search backend settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Candidate filtering settings
    #[serde(default)]
    pub filter: FilterConfig,

    /// Query planning settings
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Retry settings for backend calls
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Search backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the SearXNG instance
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum simultaneous backend requests
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Result pages fetched per query
    #[serde(default = "default_pages_per_query")]
    pub pages_per_query: usize,

    /// Pause between result pages of one query, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Override for the HTTP user agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            max_concurrent: default_max_concurrent(),
            pages_per_query: default_pages_per_query(),
            page_delay_ms: default_page_delay_ms(),
            user_agent: None,
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_max_concurrent() -> usize {
    4
}

fn default_pages_per_query() -> usize {
    2
}

fn default_page_delay_ms() -> u64 {
    300
}

/// Candidate filter configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Extra domains whose addresses are always dropped
    #[serde(default)]
    pub blacklist: Vec<String>,

    /// Use only `blacklist`, without the built-in provider list
    #[serde(default)]
    pub replace_default_blacklist: bool,
}

impl FilterConfig {
    /// Build the effective blacklist
    pub fn blacklist(&self) -> Blacklist {
        let mut blacklist = if self.replace_default_blacklist {
            Blacklist::empty()
        } else {
            Blacklist::default()
        };
        blacklist.extend(&self.blacklist);
        blacklist
    }
}

/// Query planner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Add quoted mailbox guesses built from the contact name
    #[serde(default = "default_true")]
    pub address_patterns: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            address_patterns: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Retry configuration as it appears in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetrySettings {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts.max(1),
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            backoff_multiplier: self.backoff_multiplier,
            ..RetryConfig::default()
        }
    }
}

fn default_max_attempts() -> u32 {
    1
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Config {
    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "search.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.search.max_concurrent == 0 {
            return Err(ConfigError::Message(
                "search.max_concurrent must be greater than 0".to_string(),
            ));
        }
        if self.search.pages_per_query == 0 {
            return Err(ConfigError::Message(
                "search.pages_per_query must be greater than 0".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Message(
                "retry.max_attempts must be greater than 0".to_string(),
            ));
        }
        let multiplier = self.retry.backoff_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ConfigError::Message(format!(
                "retry.backoff_multiplier must be a finite number >= 1.0, got {}",
                multiplier
            )));
        }
        Ok(())
    }
}

/// Load configuration from an optional file plus environment variables.
///
/// The result is not validated, so callers can layer their own overrides
/// before calling [`Config::validate`].
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("filter.blacklist")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Locate a config file: `./lead-email-finder.toml`, then
/// `<config dir>/lead-email-finder/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("lead-email-finder").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}

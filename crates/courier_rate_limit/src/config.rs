//! Configuration structures for transport, retry and rate limiting.
//!
//! This module provides TOML-based configuration. The configuration
//! system supports:
//! - Bundled defaults (include_str! from courier.toml)
//! - User overrides (./courier.toml or ~/.config/courier/courier.toml)
//! - Automatic merging with user values taking precedence

use crate::ProviderLimits;
use courier_error::{ConfigError, CourierError, CourierResult};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../courier.toml");

/// Default `User-Agent` sent when a request does not set one.
pub fn default_user_agent() -> String {
    format!("courier/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_retry_delay_ms() -> u64 {
    2_000
}

/// Settings for the underlying HTTP transport.
///
/// ```toml
/// [transport]
/// user_agent = "my-app/1.0"
/// timeout_ms = 10_000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransportConfig {
    /// User agent applied to requests that do not set their own
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl TransportConfig {
    /// Timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Settings for the single retry of transient failures.
///
/// ```toml
/// [retry]
/// delay_ms = 2_000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Fixed pause before the retry, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_retry_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Delay as a duration.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Top-level Courier configuration.
///
/// Loads configuration from TOML files with a precedence system:
/// 1. Bundled defaults (include_str! from courier.toml)
/// 2. User override (~/.config/courier/courier.toml, then ./courier.toml)
///
/// # Example
///
/// ```no_run
/// use courier_rate_limit::CourierConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CourierConfig::load()?;
///
/// let github = config.limits("github").unwrap();
/// println!("GitHub concurrency: {:?}", github.max_concurrent);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct CourierConfig {
    /// Transport settings
    #[serde(default)]
    pub transport: TransportConfig,

    /// Retry settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// Map of provider name to its limits
    #[serde(default)]
    pub providers: HashMap<String, ProviderLimits>,
}

impl CourierConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> CourierResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                CourierError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                CourierError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text, without the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed or validated.
    ///
    /// # Example
    ///
    /// ```
    /// use courier_rate_limit::CourierConfig;
    ///
    /// let config = CourierConfig::from_toml_str(r#"
    ///     [retry]
    ///     delay_ms = 500
    ///
    ///     [providers.weather]
    ///     max_concurrent = 2
    /// "#).unwrap();
    ///
    /// assert_eq!(config.retry.delay_ms, 500);
    /// assert_eq!(config.limits("weather").unwrap().max_concurrent, Some(2));
    /// ```
    pub fn from_toml_str(text: &str) -> CourierResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .and_then(|built| built.try_deserialize())
            .map_err(|e| {
                CourierError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (courier.toml shipped with library)
    /// 2. User config in home directory (~/.config/courier/courier.toml)
    /// 3. User config in current directory (./courier.toml)
    ///
    /// User config files are optional and will be silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if any source fails to parse or the merged result is invalid.
    #[instrument]
    pub fn load() -> CourierResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder = Config::builder()
            // Start with bundled defaults
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        // Add user config from home directory (optional)
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/courier/courier.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        // Add user config from current directory (optional, highest precedence)
        builder = builder.add_source(File::with_name("courier").required(false));

        let config: Self = builder
            .build()
            .map_err(|e| {
                CourierError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                CourierError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Bundled defaults only, ignoring any user files.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file is malformed.
    pub fn bundled() -> CourierResult<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Check that every setting can be honoured.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid setting.
    pub fn validate(&self) -> CourierResult<()> {
        if self.transport.timeout_ms == 0 {
            return Err(ConfigError::new("transport.timeout_ms must be at least 1").into());
        }
        if self.transport.user_agent.trim().is_empty() {
            return Err(ConfigError::new("transport.user_agent must not be blank").into());
        }
        for (provider, limits) in &self.providers {
            limits
                .validate(provider)
                .map_err(|e| ConfigError::new(e.kind().to_string()))?;
        }
        Ok(())
    }

    /// Limits configured for a provider.
    #[instrument(skip(self))]
    pub fn limits(&self, provider: &str) -> Option<&ProviderLimits> {
        debug!(provider, "Looking up provider limits");
        self.providers.get(provider)
    }

    /// Configured provider names, sorted.
    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

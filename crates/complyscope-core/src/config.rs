//! Configuration management for Complyscope.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Regulation;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/complyscope/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Which checklist to audit against
    pub audit: AuditConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Plain HTTP probe settings
    pub http: HttpConfig,
    /// Batch audit settings
    pub batch: BatchConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML or fail validation
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `COMPLYSCOPE_REGULATION`: Override the checklist (`dpdp`/`gdpr`)
    /// - `COMPLYSCOPE_HEADLESS`: Override browser headless mode (true/false)
    /// - `COMPLYSCOPE_SETTLE_SECS`: Override the post-load settle delay
    /// - `COMPLYSCOPE_CONCURRENT_AUDITS`: Override batch parallelism
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Values that fail to parse are ignored and the configured value kept.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("COMPLYSCOPE_REGULATION") {
            if let Ok(regulation) = val.parse() {
                self.audit.regulation = regulation;
                tracing::debug!("Override audit.regulation from env: {}", regulation);
            }
        }

        if let Some(val) = lookup("COMPLYSCOPE_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Some(val) = lookup("COMPLYSCOPE_SETTLE_SECS") {
            if let Ok(secs) = val.parse() {
                self.browser.settle_secs = secs;
                tracing::debug!("Override browser.settle_secs from env: {}", secs);
            }
        }

        if let Some(val) = lookup("COMPLYSCOPE_CONCURRENT_AUDITS") {
            if let Ok(concurrent) = val.parse() {
                self.batch.concurrent_audits = concurrent;
                tracing::debug!("Override batch.concurrent_audits from env: {}", concurrent);
            }
        }
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |field: &str, reason: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if self.browser.navigation_timeout_secs == 0 {
            return Err(invalid("browser.navigation_timeout_secs", "must be > 0"));
        }
        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(invalid("browser.window_size", "width and height must be > 0"));
        }
        if self.http.timeout_secs == 0 {
            return Err(invalid("http.timeout_secs", "must be > 0"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(invalid("http.user_agent", "cannot be empty"));
        }
        if self.batch.concurrent_audits == 0 {
            return Err(invalid("batch.concurrent_audits", "must be > 0"));
        }
        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/complyscope/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "complyscope", "complyscope")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Audit checklist selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Built-in checklist to use when no custom file is given
    pub regulation: Regulation,
    /// Optional TOML checklist replacing the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist_path: Option<PathBuf>,
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Seconds to wait after load so deferred tag managers can set cookies
    pub settle_secs: u64,
    /// Minimum delay between navigations to the same domain, in milliseconds
    pub min_domain_delay_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 30,
            settle_secs: 15,
            min_domain_delay_ms: 1000,
        }
    }
}

/// Plain HTTP probe settings (headers and policy fallback).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
    /// Retries after the first failed attempt
    pub max_retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: "Complyscope/0.1.0 (+https://github.com/complyscope/complyscope)"
                .to_string(),
            max_retries: 2,
        }
    }
}

/// Batch audit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of targets audited at the same time
    pub concurrent_audits: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrent_audits: 3,
        }
    }
}

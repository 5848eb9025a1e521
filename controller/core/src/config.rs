//! Controller Configuration
//!
//! Centralized settings for the controller, optionally loaded from a TOML
//! file at `~/.config/page-controller/controller.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [endpoint]
//! base_url = "http://localhost:5000"
//! process_path = "/api/process"
//! request_timeout_secs = 30
//!
//! [timing]
//! resource_load_delay_ms = 100
//! process_data_delay_ms = 100
//! notification_display_ms = 3000
//! notification_exit_ms = 300
//! stagger_step_secs = 0.1
//!
//! [selectors]
//! tech_card_class = "tech-card"
//! feature_class = "feature"
//!
//! [reveal]
//! threshold = 0.1
//! marker_class = "animate-in"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Where the effective configuration came from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Environment variable overrides applied
    Env,
    /// TOML configuration file
    File,
    /// Built-in defaults only
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Remote text-processing endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Scheme, host and port, without trailing slash
    pub base_url: String,
    /// Processing route
    pub process_path: String,
    /// Health route
    pub status_path: String,
    /// Whole-request timeout
    pub request_timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            process_path: "/api/process".to_string(),
            status_path: "/api/status".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl EndpointConfig {
    /// Full processing URL
    #[must_use]
    pub fn process_url(&self) -> String {
        join_url(&self.base_url, &self.process_path)
    }

    /// Full health URL
    #[must_use]
    pub fn status_url(&self) -> String {
        join_url(&self.base_url, &self.status_path)
    }

    /// Request timeout as a duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Fixed delays of the lifecycle and presentation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Simulated resource-load latency during boot
    pub resource_load_delay_ms: u64,
    /// Simulated latency of `process_data`
    pub process_data_delay_ms: u64,
    /// How long a notification stays before its exit animation
    pub notification_display_ms: u64,
    /// Exit animation length before the notification is detached
    pub notification_exit_ms: u64,
    /// Per-card entrance animation delay step, in seconds
    pub stagger_step_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            resource_load_delay_ms: 100,
            process_data_delay_ms: 100,
            notification_display_ms: 3000,
            notification_exit_ms: 300,
            stagger_step_secs: 0.1,
        }
    }
}

impl TimingConfig {
    /// Resource-load delay
    #[must_use]
    pub fn resource_load_delay(&self) -> Duration {
        Duration::from_millis(self.resource_load_delay_ms)
    }

    /// `process_data` delay
    #[must_use]
    pub fn process_data_delay(&self) -> Duration {
        Duration::from_millis(self.process_data_delay_ms)
    }

    /// Notification display time
    #[must_use]
    pub fn notification_display(&self) -> Duration {
        Duration::from_millis(self.notification_display_ms)
    }

    /// Notification exit animation time
    #[must_use]
    pub fn notification_exit(&self) -> Duration {
        Duration::from_millis(self.notification_exit_ms)
    }
}

/// How the controller finds its elements in the page markup
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Class of clickable technology cards
    pub tech_card_class: String,
    /// Heading tag inside a tech card
    pub heading_tag: String,
    /// Class of hoverable feature tiles
    pub feature_class: String,
    /// Id of the text input
    pub input_id: String,
    /// Id of the trigger control
    pub trigger_id: String,
    /// Id of the output region
    pub output_id: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            tech_card_class: "tech-card".to_string(),
            heading_tag: "h3".to_string(),
            feature_class: "feature".to_string(),
            input_id: "nlp-input".to_string(),
            trigger_id: "process-button".to_string(),
            output_id: "nlp-output".to_string(),
        }
    }
}

/// Scroll reveal settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Visible fraction that counts as intersecting
    pub threshold: f64,
    /// Class added once an element has been seen
    pub marker_class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            marker_class: "animate-in".to_string(),
        }
    }
}

// =============================================================================
// Top-level configuration
// =============================================================================

/// Effective controller configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Remote endpoint
    pub endpoint: EndpointConfig,
    /// Delays
    pub timing: TimingConfig,
    /// Markup hooks
    pub selectors: SelectorConfig,
    /// Scroll reveal
    pub reveal: RevealConfig,
    /// Where the values came from
    #[serde(skip)]
    pub source: ConfigSource,
    /// File the values were read from, if any
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

impl ControllerConfig {
    /// Check values that would make the controller misbehave
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "endpoint.base_url must not be empty".to_string(),
            ));
        }
        if !(self.reveal.threshold > 0.0 && self.reveal.threshold <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "reveal.threshold must be in (0, 1], got {}",
                self.reveal.threshold
            )));
        }
        if self.endpoint.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "endpoint.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if !self.timing.stagger_step_secs.is_finite() || self.timing.stagger_step_secs < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "timing.stagger_step_secs must be finite and not negative, got {}",
                self.timing.stagger_step_secs
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/page-controller/controller.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("page-controller").join("controller.toml"))
}

/// Load configuration from the default path and the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resulting values are invalid. A missing file is not an error.
pub fn load_config() -> Result<ControllerConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the environment
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// resulting values are invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ControllerConfig, ConfigError> {
    let mut config = ControllerConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            config = toml::from_str(&toml_content)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

/// Apply environment variable overrides
fn apply_env_config(config: &mut ControllerConfig) {
    if let Ok(url) = std::env::var("PAGE_ENDPOINT_URL") {
        if !url.trim().is_empty() {
            config.endpoint.base_url = url;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(secs) = env_u64("PAGE_REQUEST_TIMEOUT_SECS") {
        config.endpoint.request_timeout_secs = secs;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env_u64("PAGE_RESOURCE_DELAY_MS") {
        config.timing.resource_load_delay_ms = ms;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env_u64("PAGE_PROCESS_DELAY_MS") {
        config.timing.process_data_delay_ms = ms;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env_u64("PAGE_NOTIFICATION_DISPLAY_MS") {
        config.timing.notification_display_ms = ms;
        config.source = ConfigSource::Env;
    }
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "Ignoring non-numeric override");
            None
        }
    }
}

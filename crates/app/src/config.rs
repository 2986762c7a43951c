use persistence::db::{StorageBackend, StorageConfig};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Alert polling and listing
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Simulated email copies of notifications and reset notices
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    /// Seconds between alert evaluations in `watch` mode
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Entries shown by the notification bell
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            recent_limit: default_recent_limit(),
        }
    }
}

/// Email dispatch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether email copies are dispatched at all
    #[serde(default)]
    pub enabled: bool,

    /// Email provider; only `console` exists
    #[serde(default = "default_email_provider")]
    pub provider: String,

    /// Sender email address (From header)
    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    /// Sender name (From header)
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_email_provider(),
            sender_email: default_sender_email(),
            sender_name: default_sender_name(),
        }
    }
}

impl EmailConfig {
    /// `Name <address>` for the From header.
    pub fn sender(&self) -> String {
        format!("{} <{}>", self.sender_name, self.sender_email)
    }
}

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_poll_interval() -> u64 {
    30
}
fn default_recent_limit() -> usize {
    10
}
fn default_email_provider() -> String {
    "console".to_string()
}
fn default_sender_email() -> String {
    "noreply@chugazystationery.com".to_string()
}
fn default_sender_name() -> String {
    "Chugazy Stationery".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. `<dir>/default.toml` - base configuration (optional, every key has a default)
    /// 2. `<dir>/local.toml` - local overrides (optional, not in git)
    /// 3. Environment variables with STATIONERY__ prefix
    pub fn load(dir: &Path) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(dir.join("default")).required(false))
            .add_source(config::File::from(dir.join("local")).required(false))
            .add_source(config::Environment::with_prefix("STATIONERY").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for tests: embedded defaults plus overrides, no
    /// files or environment. Storage defaults to memory.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [storage]
            backend = "memory"
            data_dir = "data"

            [logging]
            level = "info"
            format = "json"

            [notifications]
            poll_interval_secs = 30
            recent_limit = 10

            [email]
            enabled = true
            provider = "console"
            sender_email = "test@example.com"
            sender_name = "Test"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.storage.backend == StorageBackend::File
            && self.storage.data_dir.as_os_str().is_empty()
        {
            return Err(ConfigValidationError::MissingRequired(
                "STATIONERY__STORAGE__DATA_DIR must be set for file storage".to_string(),
            ));
        }

        if self.notifications.poll_interval_secs == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "notifications.poll_interval_secs cannot be 0".to_string(),
            ));
        }

        if self.notifications.recent_limit == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "notifications.recent_limit cannot be 0".to_string(),
            ));
        }

        if self.email.provider != "console" {
            return Err(ConfigValidationError::InvalidValue(format!(
                "Unsupported email provider: {}",
                self.email.provider
            )));
        }

        if self.email.enabled && self.email.sender_email.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "email.sender_email must be set when email is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

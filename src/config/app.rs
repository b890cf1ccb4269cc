//! Main application configuration
//!
//! This module defines the primary configuration structures for the kickabout
//! service, including environment variable loading and validation. The record
//! store location and key have no defaults and must always be supplied.

use crate::config::selection::BalancerConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    pub store: StoreSettings,
    #[serde(default)]
    pub selection: BalancerConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Interface the HTTP server binds to
    pub host: String,
    /// Port for the HTTP API
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Record store connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Base URL of the store, e.g. `https://<project>.supabase.co`
    pub url: String,
    /// API key sent as both `apikey` and bearer token
    pub api_key: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_store_timeout")]
    pub timeout_seconds: u64,
}

fn default_store_timeout() -> u64 {
    10
}

// Keeps the key out of logs and panics.
impl std::fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSettings")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "kickabout".to_string(),
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            http_port: 8000,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl StoreSettings {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout_seconds: default_store_timeout(),
        }
    }
}

impl AppConfig {
    /// Build a configuration around the given store settings, with defaults elsewhere
    pub fn with_store(store: StoreSettings) -> Self {
        Self {
            service: ServiceSettings::default(),
            store,
            selection: BalancerConfig::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// `SUPABASE_URL` and `SUPABASE_KEY` are mandatory; everything else falls
    /// back to defaults.
    pub fn from_env() -> Result<Self> {
        let url = env::var("SUPABASE_URL").map_err(|_| anyhow!("SUPABASE_URL must be set"))?;
        let api_key = env::var("SUPABASE_KEY").map_err(|_| anyhow!("SUPABASE_KEY must be set"))?;

        let mut config = Self::with_store(StoreSettings::new(url, api_key));

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(host) = env::var("HTTP_HOST") {
            config.service.host = host;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            config.service.http_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            config.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Store settings
        if let Ok(timeout) = env::var("STORE_TIMEOUT_SECONDS") {
            config.store.timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid STORE_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Selection settings
        if let Ok(gap) = env::var("LOPSIDED_STRENGTH_GAP") {
            config.selection.lopsided_gap = gap
                .parse()
                .map_err(|_| anyhow!("Invalid LOPSIDED_STRENGTH_GAP value: {}", gap))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents).context("Invalid configuration file")?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Get store request timeout as Duration
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store.timeout_seconds)
    }

    /// Address string the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.host, self.service.http_port)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate ports
    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }

    // Validate timeouts
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }
    if config.store.timeout_seconds == 0 {
        return Err(anyhow!("Store timeout must be greater than 0"));
    }

    // Validate store settings
    if config.store.url.trim().is_empty() {
        return Err(anyhow!("Store URL cannot be empty"));
    }
    if !(config.store.url.starts_with("http://") || config.store.url.starts_with("https://")) {
        return Err(anyhow!("Store URL must be http(s): {}", config.store.url));
    }
    if config.store.api_key.trim().is_empty() {
        return Err(anyhow!("Store API key cannot be empty"));
    }

    config.selection.validate()?;

    Ok(())
}

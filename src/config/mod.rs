//! Configuration management for the kickabout service
//!
//! This module handles all configuration loading from environment variables
//! and TOML files, validation, and default values.

pub mod app;
pub mod selection;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings, StoreSettings};
pub use selection::BalancerConfig;

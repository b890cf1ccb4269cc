//! Main application state and service coordination
//!
//! This module contains the production AppState that wires the record store,
//! the club service and the metrics collector together. One instance is built
//! at start-up and shared by every request handler.

use crate::config::{validate_config, AppConfig};
use crate::metrics::MetricsCollector;
use crate::service::club::ClubService;
use crate::store::{PostgrestStore, RecordStore};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Record store error: {message}")]
    Store { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Shared record store client
    store: Arc<dyn RecordStore>,

    /// Endpoint operations
    club: ClubService,

    /// Prometheus metrics
    metrics: Arc<MetricsCollector>,

    /// Time the state was built
    started_at: Instant,
}

impl AppState {
    /// Initialize the application against the configured record store
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing kickabout team selection service");
        info!(
            "Configuration: service={}, store_url={}, store_timeout={}s",
            config.service.name,
            config.store.url,
            config.store_timeout().as_secs()
        );

        validate_config(&config).map_err(|e| ServiceError::Configuration {
            message: e.to_string(),
        })?;

        let store = PostgrestStore::new(&config.store).map_err(|e| ServiceError::Store {
            message: format!("Failed to build record store client: {}", e),
        })?;

        Self::with_store(config, Arc::new(store))
    }

    /// Initialize the application around an existing store
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn RecordStore>,
    ) -> Result<Self, ServiceError> {
        let metrics = Arc::new(MetricsCollector::new().map_err(|e| {
            ServiceError::Initialization {
                message: format!("Failed to create metrics collector: {}", e),
            }
        })?);

        let club = ClubService::new(store.clone(), config.selection, metrics.clone());

        Ok(Self {
            config,
            store,
            club,
            metrics,
            started_at: Instant::now(),
        })
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the record store
    pub fn store(&self) -> Arc<dyn RecordStore> {
        self.store.clone()
    }

    /// Get the club service
    pub fn club(&self) -> &ClubService {
        &self.club
    }

    /// Get the metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Seconds since the state was built
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreSettings;
    use crate::store::InMemoryRecordStore;

    #[test]
    fn test_rejects_invalid_store_url() {
        let config = AppConfig::with_store(StoreSettings::new("not-a-url", "key"));
        let result = AppState::new(config);
        assert!(matches!(result, Err(ServiceError::Configuration { .. })));
    }

    #[test]
    fn test_builds_postgrest_backed_state() {
        let config =
            AppConfig::with_store(StoreSettings::new("https://example.supabase.co", "key"));
        let state = AppState::new(config).unwrap();
        assert_eq!(state.config().service.name, "kickabout");
    }

    #[tokio::test]
    async fn test_with_in_memory_store() {
        let config = AppConfig::with_store(StoreSettings::new("http://localhost", "key"));
        let state = AppState::with_store(config, Arc::new(InMemoryRecordStore::new())).unwrap();

        assert!(state.club().list_players().await.unwrap().is_empty());
        assert!(state.store().ping().await.is_ok());
        assert!(state.uptime_seconds() < 5);
    }
}

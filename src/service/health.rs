//! Health checks
//!
//! Readiness depends on the record store answering a ping; liveness only
//! needs the process to be serving.

use crate::service::app::AppState;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Health check status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    /// Numeric form used by the health gauge
    pub fn as_gauge(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 1,
            HealthStatus::Unhealthy => 0,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "✅ healthy"),
            HealthStatus::Unhealthy => write!(f, "❌ unhealthy"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    /// Crate version
    pub version: String,
    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Seconds since start-up
    pub uptime_seconds: u64,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional error message if unhealthy
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

impl HealthCheck {
    /// Perform a full health check of the service
    pub async fn check(app_state: Arc<AppState>) -> Result<Self> {
        let store_check = Self::check_record_store(&app_state).await;
        let status = store_check.status;

        let metrics = app_state.metrics();
        metrics.update_component_health(&store_check.name, status == HealthStatus::Healthy);
        metrics.update_health_status(status.as_gauge());

        Ok(HealthCheck {
            status,
            service: app_state.config().service.name.clone(),
            version: crate::VERSION.to_string(),
            timestamp: crate::utils::current_timestamp(),
            uptime_seconds: app_state.uptime_seconds(),
            checks: vec![store_check],
        })
    }

    /// Liveness check; a process able to answer is alive
    pub async fn liveness_check(_app_state: Arc<AppState>) -> Result<HealthStatus> {
        Ok(HealthStatus::Healthy)
    }

    /// Ping the record store
    async fn check_record_store(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = match app_state.store().ping().await {
            Ok(()) => {
                debug!("Record store ping succeeded");
                (HealthStatus::Healthy, None)
            }
            Err(e) => {
                warn!("Record store ping failed: {}", e);
                (HealthStatus::Unhealthy, Some(e.to_string()))
            }
        };

        ComponentCheck {
            name: "record_store".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Convert health check to JSON string
impl HealthCheck {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize health check: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, StoreSettings};
    use crate::store::{InMemoryRecordStore, MockRecordStore, StoreError};

    fn config() -> AppConfig {
        AppConfig::with_store(StoreSettings::new("http://localhost", "key"))
    }

    #[tokio::test]
    async fn test_healthy_store() {
        let state = Arc::new(
            AppState::with_store(config(), Arc::new(InMemoryRecordStore::new())).unwrap(),
        );

        let health = HealthCheck::check(state.clone()).await.unwrap();
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.checks.len(), 1);
        assert_eq!(health.checks[0].name, "record_store");
        assert_eq!(state.metrics().service().health_status.get(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_unhealthy() {
        let mut store = MockRecordStore::new();
        store.expect_ping().returning(|| {
            Err(StoreError::Unavailable {
                message: "timeout".to_string(),
            })
        });
        let state = Arc::new(AppState::with_store(config(), Arc::new(store)).unwrap());

        let health = HealthCheck::check(state.clone()).await.unwrap();
        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert!(health.checks[0].message.as_deref().unwrap().contains("timeout"));
        assert_eq!(state.metrics().service().health_status.get(), 0);

        let liveness = HealthCheck::liveness_check(state).await.unwrap();
        assert_eq!(liveness, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_health_json() {
        let state = Arc::new(
            AppState::with_store(config(), Arc::new(InMemoryRecordStore::new())).unwrap(),
        );
        let json = HealthCheck::check(state).await.unwrap().to_json().unwrap();
        assert!(json.contains("\"status\": \"healthy\""));
    }
}

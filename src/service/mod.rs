//! Service layer for the kickabout team selection service
//!
//! This module contains the application state, the per-endpoint club
//! operations and the health checks.

pub mod app;
pub mod club;
pub mod health;

pub use app::{AppState, ServiceError};
pub use club::{ClubService, SelectionOutcome};
pub use health::{HealthCheck, HealthStatus};

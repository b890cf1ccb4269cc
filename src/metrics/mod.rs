//! Metrics and monitoring for the kickabout service
//!
//! This module provides Prometheus metrics collection and the operational
//! HTTP endpoints (`/health`, `/alive`, `/metrics`).

pub mod collector;
pub mod health;

pub use collector::{HttpMetrics, MetricsCollector, SelectionMetrics, ServiceMetrics};
pub use health::{ops_router, render_metrics};

//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the kickabout service:
//! HTTP traffic, record store failures and team selections.

use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the team selection service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// HTTP request metrics
    http_metrics: HttpMetrics,

    /// Team selection metrics
    selection_metrics: SelectionMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Health check status (0=unhealthy, 1=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,

    /// Record store call failures by operation
    pub store_errors_total: IntCounterVec,
}

/// HTTP request metrics
#[derive(Clone)]
pub struct HttpMetrics {
    /// Requests served by endpoint and status code
    pub requests_total: IntCounterVec,

    /// Request latency by endpoint
    pub request_duration_seconds: HistogramVec,
}

/// Team selection metrics
#[derive(Clone)]
pub struct SelectionMetrics {
    /// Completed selections by strategy
    pub team_selections_total: IntCounterVec,

    /// Selections answered with an informational message instead of teams
    pub selections_skipped_total: IntCounterVec,

    /// Number of available players per selection
    pub selection_pool_size: Histogram,

    /// Time spent selecting teams, store round-trips included
    pub selection_duration_seconds: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let http_metrics = HttpMetrics::new(&registry)?;
        let selection_metrics = SelectionMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            http_metrics,
            selection_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get HTTP metrics
    pub fn http(&self) -> &HttpMetrics {
        &self.http_metrics
    }

    /// Get selection metrics
    pub fn selection(&self) -> &SelectionMetrics {
        &self.selection_metrics
    }

    /// Record a served HTTP request
    pub fn record_http_request(&self, endpoint: &str, status: u16, duration: Duration) {
        self.http_metrics
            .requests_total
            .with_label_values(&[endpoint, &status.to_string()])
            .inc();

        self.http_metrics
            .request_duration_seconds
            .with_label_values(&[endpoint])
            .observe(duration.as_secs_f64());
    }

    /// Record a failed record store call
    pub fn record_store_error(&self, operation: &str) {
        self.service_metrics
            .store_errors_total
            .with_label_values(&[operation])
            .inc();
    }

    /// Record a completed team selection
    pub fn record_team_selection(&self, strategy: &str, pool_size: usize, duration: Duration) {
        self.selection_metrics
            .team_selections_total
            .with_label_values(&[strategy])
            .inc();

        self.selection_metrics
            .selection_pool_size
            .observe(pool_size as f64);

        self.selection_metrics
            .selection_duration_seconds
            .observe(duration.as_secs_f64());
    }

    /// Record a selection that found nothing to split
    pub fn record_selection_skipped(&self, reason: &str) {
        self.selection_metrics
            .selections_skipped_total
            .with_label_values(&[reason])
            .inc();
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let health_status = IntGauge::new(
            "kickabout_health_status",
            "Health status (0=unhealthy, 1=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("kickabout_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        let store_errors_total = IntCounterVec::new(
            Opts::new(
                "kickabout_store_errors_total",
                "Total failed record store calls",
            ),
            &["operation"],
        )?;
        registry.register(Box::new(store_errors_total.clone()))?;

        Ok(Self {
            health_status,
            component_health,
            store_errors_total,
        })
    }
}

impl HttpMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new("kickabout_http_requests_total", "Total HTTP requests served"),
            &["endpoint", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "kickabout_http_request_duration_seconds",
                "HTTP request latency",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
            &["endpoint"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
        })
    }
}

impl SelectionMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let team_selections_total = IntCounterVec::new(
            Opts::new(
                "kickabout_team_selections_total",
                "Total team selections by strategy",
            ),
            &["strategy"],
        )?;
        registry.register(Box::new(team_selections_total.clone()))?;

        let selections_skipped_total = IntCounterVec::new(
            Opts::new(
                "kickabout_selections_skipped_total",
                "Selections answered without teams",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(selections_skipped_total.clone()))?;

        let selection_pool_size = Histogram::with_opts(
            HistogramOpts::new(
                "kickabout_selection_pool_size",
                "Available players per team selection",
            )
            .buckets(vec![2.0, 6.0, 10.0, 14.0, 18.0, 22.0, 30.0, 50.0]),
        )?;
        registry.register(Box::new(selection_pool_size.clone()))?;

        let selection_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "kickabout_selection_duration_seconds",
            "Team selection latency",
        ))?;
        registry.register(Box::new(selection_duration_seconds.clone()))?;

        Ok(Self {
            team_selections_total,
            selections_skipped_total,
            selection_pool_size,
            selection_duration_seconds,
        })
    }
}

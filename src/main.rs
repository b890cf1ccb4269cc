//! Main entry point for the kickabout team selection service
//!
//! Loads configuration, initializes logging, builds the shared application
//! state and serves the HTTP API until SIGINT/SIGTERM.

use anyhow::Result;
use clap::Parser;
use kickabout::api::ApiServer;
use kickabout::config::{validate_config, AppConfig};
use kickabout::service::{AppState, HealthCheck, HealthStatus};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Kickabout - balanced teams for weekly football
#[derive(Parser)]
#[command(
    name = "kickabout",
    version,
    about = "Team selection service for amateur football",
    long_about = "Kickabout stores players, coach ratings and weekly availability in a \
                 Supabase/PostgREST record store and splits the available players between \
                 two opponents according to their declared strengths."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Perform health check and exit
    #[arg(long, help = "Check record store connectivity and exit with status code")]
    health_check: bool,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Bind host override
    #[arg(long, value_name = "HOST", help = "Override HTTP bind host")]
    host: Option<String>,

    /// HTTP port override
    #[arg(short, long, value_name = "PORT", help = "Override HTTP server port")]
    port: Option<u16>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        help = "Validate configuration and exit without starting service"
    )]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Perform health check and exit with the matching status code
async fn perform_health_check(config: AppConfig) -> Result<()> {
    info!("Performing health check...");

    let app_state = Arc::new(AppState::new(config)?);

    match HealthCheck::check(app_state).await {
        Ok(health) => {
            println!("Health Check: {}", health.status);
            for check in &health.checks {
                match &check.message {
                    Some(message) => println!(
                        "  {}: {} ({}ms) - {}",
                        check.name, check.status, check.duration_ms, message
                    ),
                    None => println!("  {}: {} ({}ms)", check.name, check.status, check.duration_ms),
                }
            }

            if health.status == HealthStatus::Healthy {
                std::process::exit(0);
            } else {
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C) signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig) {
    info!("🚀 Kickabout Team Selection Service");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   Listening on: {}", config.bind_address());
    info!("   Record store: {}", config.store.url);
    info!("   Store timeout: {}s", config.store.timeout_seconds);
    info!(
        "   Lopsided strength gap: {}",
        config.selection.lopsided_gap
    );
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(host) = &args.host {
        config.service.host = host.clone();
    }

    if let Some(port) = args.port {
        config.service.http_port = port;
    }

    validate_config(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.health_check {
        return perform_health_check(config).await;
    }

    if args.dry_run {
        info!("Configuration validation successful");
        display_startup_banner(&config);
        info!("Dry run completed - exiting without starting service");
        return Ok(());
    }

    display_startup_banner(&config);

    info!("Initializing service components...");
    let app_state = match AppState::new(config.clone()) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let server = Arc::new(ApiServer::new(app_state));
    let mut server_task = {
        let server = server.clone();
        tokio::spawn(async move { server.start().await })
    };

    info!("✅ Kickabout is running");
    info!("Press Ctrl+C to shutdown gracefully...");

    tokio::select! {
        _ = wait_for_shutdown_signal() => {
            info!("🛑 Shutdown signal received, beginning graceful shutdown...");
            server.stop();
        }
        // The server only finishes on its own if it could not start.
        result = &mut server_task => {
            match result {
                Ok(Err(e)) => error!("HTTP server failed: {}", e),
                Err(e) => error!("HTTP server task panicked: {}", e),
                Ok(Ok(())) => error!("HTTP server exited unexpectedly"),
            }
            std::process::exit(1);
        }
    }

    match tokio::time::timeout(config.shutdown_timeout(), server_task).await {
        Ok(Ok(Ok(()))) => info!("✅ Graceful shutdown completed successfully"),
        Ok(Ok(Err(e))) => {
            error!("HTTP server failed: {}", e);
            std::process::exit(1);
        }
        Ok(Err(e)) => {
            error!("HTTP server task panicked: {}", e);
            std::process::exit(1);
        }
        Err(_) => warn!("⚠️  Shutdown timeout exceeded, forcing exit"),
    }

    info!("🛑 Kickabout stopped");
    Ok(())
}

//! Dealroom Backend Service
//!
//! Main entry point for the investor deal portal backend.
//! This service provides:
//! - JSON API for deals, calculators and offers
//! - Ready to Buy submissions with AI wire confirmation checks
//! - Session cookies for CRM contacts

use anyhow::Context;
use dealroom_backend::config::AppConfig;
use dealroom_backend::crm::HttpCrmClient;
use dealroom_backend::http::router;
use dealroom_backend::services::{AuditTrailService, ChatCompletionsClassifier};
use dealroom_backend::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!(e)
    })?;

    // Initialize tracing/logging with config
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("dealroom_backend={},tower_http=info", config.log_level).into()
    });
    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           Dealroom Backend Service Starting              ║");
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);
    info!("HTTP port: {}", config.http_port);

    // =========================================================================
    // OUTBOUND CLIENTS
    // =========================================================================
    info!("Initializing outbound clients...");

    let http = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let crm = HttpCrmClient::new(config.crm.clone(), config.http_timeout())
        .context("Failed to build CRM client")?;
    info!("✓ CRM client initialized ({})", config.crm.base_url);

    if config.ai.api_key.is_none() {
        warn!("AI_API_KEY not set - wire confirmations cannot be classified");
    }
    let classifier = ChatCompletionsClassifier::new(config.ai.clone(), http.clone());
    info!("✓ Wire classifier initialized (model {})", config.ai.model);

    if config.geocoding_api_key.is_none() {
        warn!("GEOCODING_API_KEY not set - unknown addresses map to Dallas center");
    }

    // Audit trail is optional; the portal keeps serving without it
    let audit = match AuditTrailService::new(config.audit_log_dir.clone()) {
        Ok(audit) => {
            info!("✓ Audit trail service initialized");
            Some(Arc::new(audit))
        }
        Err(e) => {
            error!("Failed to initialize audit trail: {}", e);
            None
        }
    };

    // =========================================================================
    // START SERVER
    // =========================================================================
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let environment = config.environment.clone();

    let state = Arc::new(AppState::new(
        config,
        Arc::new(crm),
        Arc::new(classifier),
        http,
        audit,
    ));
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server on {}", addr))?;

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║           Dealroom Backend Service Ready!                ║");
    info!("╠══════════════════════════════════════════════════════════╣");
    info!("║  HTTP API:     {}                              ║", addr);
    info!("║  Environment:  {}                                    ║", environment);
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Press Ctrl+C to shutdown gracefully");

    // =========================================================================
    // SHUTDOWN HANDLING
    // =========================================================================
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received, shutting down gracefully...");
        })
        .await
        .context("HTTP server error")?;

    info!("Dealroom backend service shutdown complete");
    Ok(())
}

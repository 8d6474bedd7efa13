//! Amani Foundation API Server
//!
//! REST backend for the foundation's website: content documents, donation
//! checkout, loan quotes, impact estimates and form intake.
//!
//! Usage:
//!   cargo run --bin amani_api
//!
//! Environment:
//!   AMANI_HOST            - Server host (default: 0.0.0.0)
//!   PORT / AMANI_PORT     - Server port (default: 8080)
//!   AMANI_CONTENT_DIR     - Content documents directory (default: ./content)
//!   AMANI_ADMIN_KEY       - Key required by CMS routes
//!   AMANI_GATEWAY_SECRET  - Payment gateway secret key
//!   RUST_LOG              - Log level (default: info)

use amani_api::api::{create_router, handlers::AppState, start_cleanup_task};
use amani_api::config::AppConfig;
use amani_api::telemetry::TelemetryCollector;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    print_banner();

    let config = AppConfig::default();

    // Initialize telemetry
    let telemetry = Arc::new(TelemetryCollector::with_config(
        config.telemetry_dir.clone(),
        1000,
    ));
    let telemetry_for_shutdown = telemetry.clone();

    if config.gateway_secret_key.is_none() {
        warn!("AMANI_GATEWAY_SECRET not set - donation routes will return 503");
    }
    if config.admin_key.is_none() {
        warn!("AMANI_ADMIN_KEY not set - content editing is disabled");
    }

    let bind_addr = config.bind_addr();

    // Create app state
    let state = Arc::new(AppState::new(config, telemetry)?);

    // Start background cleanup task for rate limiter
    start_cleanup_task();
    info!("Background cleanup task started");

    // Create router
    let app = create_router(state);

    let addr: SocketAddr = bind_addr.parse()?;

    info!("Amani Foundation API starting on http://{}", addr);
    info!("");
    info!("Endpoints:");
    info!("  GET  /v1/content/:page            - Page content document");
    info!("  PUT  /v1/content/:page            - Apply a content edit (admin)");
    info!("  POST /v1/loans/quote              - Loan amortization quote");
    info!("  POST /v1/impact/estimate          - Donation impact estimate");
    info!("  POST /v1/forms/contact            - Contact form");
    info!("  POST /v1/forms/volunteer          - Volunteer signup");
    info!("  POST /v1/loans/apply              - Loan application");
    info!("  POST /v1/donations/initialize     - Open a checkout session");
    info!("  GET  /v1/donations/verify/:ref    - Verify a donation");
    info!("  GET  /v1/stats                    - Operational statistics");
    info!("  GET  /v1/health                   - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");
    info!("");

    // Start server with graceful shutdown
    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // Graceful shutdown sequence
    info!("");
    info!("Shutdown signal received, cleaning up...");

    let stats = telemetry_for_shutdown.get_stats();
    info!("   Donations initialized: {}", stats.donations_initialized);
    info!("   Donations verified: {}", stats.donations_verified);
    info!("   Total raised: {:.2}", stats.total_raised);
    info!("   Forms received: {}", stats.forms_received);

    if let Err(e) = telemetry_for_shutdown.flush_events() {
        warn!("   Failed to flush telemetry events: {}", e);
    }
    match telemetry_for_shutdown.export_stats_json() {
        Ok(path) => info!("   Stats exported to: {}", path.display()),
        Err(e) => warn!("   Failed to export stats: {}", e),
    }

    info!("Amani Foundation API shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ========================================================
       A M A N I   F O U N D A T I O N   A P I   v{}
       Content - Donations - Microloans - Impact
    ========================================================
    "#,
        env!("CARGO_PKG_VERSION")
    );
}

//! `rsa-field-svc` — service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP export).
//! 3. Build the Axum router and serve HTTP until Ctrl-C or SIGTERM.
//! 4. Drain in-flight requests and flush telemetry.

mod config;
mod crypto;
mod document;
mod server;
mod telemetry;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level, cfg.otel_exporter_otlp_endpoint.as_deref())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        otlp_export = cfg.otel_exporter_otlp_endpoint.is_some(),
        "rsa-field-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. HTTP server
    // -----------------------------------------------------------------------
    let router = server::router::build(&cfg);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    let served = server::serve(listener, router, server::shutdown_signal())
        .await
        .context("HTTP server failed");
    info!("rsa-field-svc stopped");

    telemetry::shutdown_telemetry();
    served
}

//! Tracing setup: structured JSON logs, with optional OTLP span export.
//!
//! # Telemetry invariants
//!
//! - **No field values or key material** appear in any span attribute or log
//!   field. Handlers log counts and error messages only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   overrides it.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};

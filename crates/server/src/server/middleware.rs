//! Tower middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, response compression, and
//! the request body size limit.

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;

/// Wrap every route of `router` (the fallback included) in the shared layers.
pub fn apply(router: Router, cfg: &Config) -> Router {
    router
        .layer(DefaultBodyLimit::max(cfg.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(cfg.request_timeout()))
        .layer(CompressionLayer::new())
}

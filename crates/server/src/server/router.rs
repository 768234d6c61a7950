//! Axum router construction.

use axum::{
    routing::{get, post},
    Router,
};

use super::{handlers, middleware};
use crate::config::Config;

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(cfg: &Config) -> Router {
    let routes = Router::new()
        .route("/encrypt", post(handlers::encrypt))
        .route("/decrypt", post(handlers::decrypt))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found);
    middleware::apply(routes, cfg)
}

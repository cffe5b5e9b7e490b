//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::poll::PollStore;
use crate::kernel::ServerDeps;
use crate::server::middleware::extract_client_ip;
use crate::server::routes::{
    health_handler, poll_results_handler, poll_vote_handler, rss_proxy_handler, verify_handler,
    webhook_status_handler, webhook_test_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
    pub poll: Arc<PollStore>,
}

/// Build the Axum application from configuration.
pub fn build_app(config: &Config) -> Router {
    let state = AxumAppState {
        deps: Arc::new(ServerDeps::from_config(config)),
        poll: Arc::new(PollStore::default_poll()),
    };
    build_router(state)
}

/// Assemble routes and middleware around prepared state. Split from
/// `build_app` so tests can inject mock dependencies.
pub fn build_router(state: AxumAppState) -> Router {
    // CORS configuration - the form is served from the marketing site,
    // so allow any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/verify", post(verify_handler))
        .route("/poll", get(poll_results_handler).post(poll_vote_handler))
        .route("/webhook/status", get(webhook_status_handler))
        .route("/webhook/test", post(webhook_test_handler))
        .route("/youtube/rss", get(rss_proxy_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(extract_client_ip))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

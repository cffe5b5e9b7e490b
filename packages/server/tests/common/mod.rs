//! Shared helpers for endpoint tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use bridge_core::domains::poll::PollStore;
use bridge_core::kernel::TestDependencies;
use bridge_core::server::{build_router, AxumAppState};

/// Router wired to the given mocks, with both delivery channels up.
pub fn test_app(test_deps: &TestDependencies) -> Router {
    build_router(AxumAppState {
        deps: Arc::new(test_deps.server_deps()),
        poll: Arc::new(PollStore::default_poll()),
    })
}

/// Router with the primary email channel disabled.
pub fn test_app_without_mailer(test_deps: &TestDependencies) -> Router {
    build_router(AxumAppState {
        deps: Arc::new(test_deps.server_deps_without_mailer()),
        poll: Arc::new(PollStore::default_poll()),
    })
}

/// Router with no delivery channel configured at all.
pub fn test_app_unconfigured(test_deps: &TestDependencies) -> Router {
    build_router(AxumAppState {
        deps: Arc::new(test_deps.server_deps_unconfigured()),
        poll: Arc::new(PollStore::default_poll()),
    })
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    post_raw(uri, &body.to_string())
}

pub fn post_raw(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// POST with the headers the poll uses to fingerprint a voter.
pub fn post_json_from(uri: &str, body: Value, ip: &str, user_agent: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .header(header::USER_AGENT, user_agent)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

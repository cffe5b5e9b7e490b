use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AxumAppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    channels: ChannelHealth,
}

#[derive(Serialize)]
pub struct ChannelHealth {
    mailer: bool,
    webhook: bool,
}

/// Health check endpoint
///
/// The bridge has no backing store to probe; it reports which delivery
/// channels are configured. Always 200 - a missing channel degrades
/// delivery, it does not take the service down.
pub async fn health_handler(Extension(state): Extension<AxumAppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        channels: ChannelHealth {
            mailer: state.deps.mailer.is_some(),
            webhook: state.deps.audit.is_some(),
        },
    })
}

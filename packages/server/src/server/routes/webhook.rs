use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use discord::types::Embed;

use crate::domains::verification::audit::AUDIT_COLOR;
use crate::server::app::AxumAppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookStatusResponse {
    webhook_configured: bool,
    webhook_preview: String,
    invite_url: String,
    timestamp: String,
    message: String,
}

/// GET /webhook/status - diagnostic view of the audit channel setup.
/// Never exposes the full webhook URL.
pub async fn webhook_status_handler(
    Extension(state): Extension<AxumAppState>,
) -> Json<WebhookStatusResponse> {
    let configured = state.deps.audit.is_some();
    let message = if configured {
        "Webhook URL is configured"
    } else {
        "Webhook URL is NOT configured - add DISCORD_WEBHOOK_URL to the environment"
    };

    Json(WebhookStatusResponse {
        webhook_configured: configured,
        webhook_preview: state
            .deps
            .webhook_preview
            .clone()
            .unwrap_or_else(|| "NOT SET".to_string()),
        invite_url: state.deps.invite_url.clone(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        message: message.to_string(),
    })
}

/// POST /webhook/test - post a test embed through the audit channel.
pub async fn webhook_test_handler(Extension(state): Extension<AxumAppState>) -> Response {
    let Some(audit) = &state.deps.audit else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": "DISCORD_WEBHOOK_URL not configured in environment variables",
            })),
        )
            .into_response();
    };

    let embed = Embed::new()
        .title("Webhook Working!")
        .description("This message confirms your webhook is properly configured in production.")
        .color(AUDIT_COLOR)
        .field(
            "Timestamp",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            true,
        )
        .timestamp_now();

    match audit.post_embed(embed).await {
        Ok(()) => {
            info!("webhook test message sent");
            Json(json!({
                "success": true,
                "message": "Webhook message sent successfully! Check your Discord channel.",
            }))
            .into_response()
        }
        Err(err) => {
            error!(error = %err, "webhook test failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::domains::verification::{submit_verification, SubmitOutcome, VerificationRequest};
use crate::server::app::AxumAppState;

/// POST /verify - process a membership verification submission.
///
/// The body is parsed by hand so a malformed payload maps to the
/// contract's 500 response instead of axum's default 422.
pub async fn verify_handler(
    Extension(state): Extension<AxumAppState>,
    body: String,
) -> Response {
    let request: VerificationRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(err) => {
            error!(error = %err, "verification body did not parse");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Verification failed. Please try again.",
                    "details": err.to_string(),
                })),
            )
                .into_response();
        }
    };

    match submit_verification(&state.deps, &request).await {
        SubmitOutcome::MissingFields => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "All fields are required" })),
        )
            .into_response(),
        SubmitOutcome::Completed(response) => Json(response).into_response(),
    }
}

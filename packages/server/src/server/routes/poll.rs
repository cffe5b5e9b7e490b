use axum::{
    extract::Extension,
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::domains::poll::{voter_fingerprint, PollSnapshot, VoteOutcome};
use crate::server::app::AxumAppState;
use crate::server::middleware::ClientIp;

/// GET /poll - current question, options and totals.
pub async fn poll_results_handler(Extension(state): Extension<AxumAppState>) -> Json<PollSnapshot> {
    Json(state.poll.snapshot().await)
}

/// POST /poll - record a vote, deduplicated by IP + user agent.
pub async fn poll_vote_handler(
    Extension(state): Extension<AxumAppState>,
    client_ip: Option<Extension<ClientIp>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let Ok(payload) = serde_json::from_str::<Value>(&body) else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to record vote" })),
        )
            .into_response();
    };
    let Some(option_index) = payload.get("optionIndex").and_then(Value::as_u64) else {
        return invalid_option();
    };

    let ip = client_ip
        .map(|Extension(ClientIp(ip))| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .unwrap_or("unknown");
    let voter_id = voter_fingerprint(&ip, user_agent);

    match state.poll.vote(option_index as usize, &voter_id).await {
        VoteOutcome::InvalidOption => invalid_option(),
        VoteOutcome::AlreadyVoted { votes, total_votes } => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "Already voted",
                "alreadyVoted": true,
                "votes": votes,
                "totalVotes": total_votes,
            })),
        )
            .into_response(),
        VoteOutcome::Recorded {
            votes,
            total_votes,
            voted_for,
        } => Json(json!({
            "success": true,
            "votes": votes,
            "totalVotes": total_votes,
            "votedFor": voted_for,
        }))
        .into_response(),
    }
}

fn invalid_option() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Invalid option" })),
    )
        .into_response()
}

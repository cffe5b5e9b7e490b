use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::server::app::AxumAppState;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Deserialize)]
pub struct RssQuery {
    channel_id: Option<String>,
}

/// GET /youtube/rss - proxy the channel's RSS feed.
///
/// YouTube blocks requests without a browser user agent, and browsers
/// block the feed cross-origin; proxying through here solves both. The
/// response is passed through uncached so the site always shows the
/// latest upload.
pub async fn rss_proxy_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<RssQuery>,
) -> Response {
    let channel_id = query
        .channel_id
        .unwrap_or_else(|| state.deps.youtube_channel_id.clone());
    let rss_url = format!(
        "https://www.youtube.com/feeds/videos.xml?channel_id={}",
        channel_id
    );

    let result = state
        .deps
        .http_client
        .get(&rss_url)
        .header(header::USER_AGENT, BROWSER_USER_AGENT)
        .header(header::ACCEPT, "application/xml, text/xml, */*")
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .send()
        .await;

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "rss fetch errored");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Server error fetching RSS", "message": err.to_string() })),
            )
                .into_response();
        }
    };

    if !response.status().is_success() {
        warn!(status = %response.status(), "rss fetch failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "RSS fetch failed", "status": response.status().as_u16() })),
        )
            .into_response();
    }

    match response.text().await {
        Ok(xml) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/xml; charset=utf-8"),
                (
                    header::CACHE_CONTROL,
                    "no-store, no-cache, must-revalidate, proxy-revalidate",
                ),
                (header::PRAGMA, "no-cache"),
                (header::EXPIRES, "0"),
            ],
            xml,
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Server error fetching RSS", "message": err.to_string() })),
        )
            .into_response(),
    }
}

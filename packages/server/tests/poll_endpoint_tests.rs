//! Endpoint tests for the in-memory poll.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use bridge_core::kernel::TestDependencies;

use common::{body_json, get, post_json_from, post_raw, test_app};

const UA: &str = "Mozilla/5.0 (test)";

#[tokio::test]
async fn get_returns_the_default_poll() {
    let test_deps = TestDependencies::new();
    let app = test_app(&test_deps);

    let response = app.oneshot(get("/poll")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["question"], "Do you regret voting for Trump?");
    assert_eq!(body["options"].as_array().unwrap().len(), 3);
    assert_eq!(body["votes"], json!([0, 0, 0]));
    assert_eq!(body["totalVotes"], 0);
}

#[tokio::test]
async fn vote_is_recorded_and_visible_in_results() {
    let test_deps = TestDependencies::new();
    let app = test_app(&test_deps);

    let response = app
        .clone()
        .oneshot(post_json_from("/poll", json!({ "optionIndex": 1 }), "1.2.3.4", UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["votes"], json!([0, 1, 0]));
    assert_eq!(body["totalVotes"], 1);
    assert_eq!(body["votedFor"], 1);

    let results = body_json(app.oneshot(get("/poll")).await.unwrap()).await;
    assert_eq!(results["votes"], json!([0, 1, 0]));
    assert_eq!(results["totalVotes"], 1);
}

#[tokio::test]
async fn duplicate_voter_gets_403_with_current_totals() {
    let test_deps = TestDependencies::new();
    let app = test_app(&test_deps);

    app.clone()
        .oneshot(post_json_from("/poll", json!({ "optionIndex": 0 }), "1.2.3.4", UA))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json_from("/poll", json!({ "optionIndex": 2 }), "1.2.3.4", UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Already voted");
    assert_eq!(body["alreadyVoted"], true);
    assert_eq!(body["votes"], json!([1, 0, 0]));
    assert_eq!(body["totalVotes"], 1);
}

#[tokio::test]
async fn different_clients_count_separately() {
    let test_deps = TestDependencies::new();
    let app = test_app(&test_deps);

    app.clone()
        .oneshot(post_json_from("/poll", json!({ "optionIndex": 0 }), "1.2.3.4", UA))
        .await
        .unwrap();
    // Same IP, different browser
    app.clone()
        .oneshot(post_json_from("/poll", json!({ "optionIndex": 0 }), "1.2.3.4", "curl/8.0"))
        .await
        .unwrap();
    // Different IP, same browser
    let response = app
        .clone()
        .oneshot(post_json_from("/poll", json!({ "optionIndex": 2 }), "5.6.7.8", UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let results = body_json(app.oneshot(get("/poll")).await.unwrap()).await;
    assert_eq!(results["votes"], json!([2, 0, 1]));
    assert_eq!(results["totalVotes"], 3);
}

#[tokio::test]
async fn invalid_option_is_rejected_with_400() {
    let test_deps = TestDependencies::new();
    let app = test_app(&test_deps);

    let payloads = [
        json!({ "optionIndex": 3 }),
        json!({ "optionIndex": -1 }),
        json!({ "optionIndex": "one" }),
        json!({}),
    ];
    for payload in payloads {
        let response = app
            .clone()
            .oneshot(post_json_from("/poll", payload, "1.2.3.4", UA))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid option");
    }

    let results = body_json(app.oneshot(get("/poll")).await.unwrap()).await;
    assert_eq!(results["totalVotes"], 0);
}

#[tokio::test]
async fn malformed_body_returns_500() {
    let test_deps = TestDependencies::new();

    let response = test_app(&test_deps)
        .oneshot(post_raw("/poll", "optionIndex=1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to record vote");
}

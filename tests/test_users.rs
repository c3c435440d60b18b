mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_creates_profile() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    let token = env.token("uid-alice", "alice");

    let response = server
        .post("/api/users/register")
        .json(&json!({ "userName": "alice", "email": "alice@example.com" }))
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["userName"], "alice");
    assert_eq!(body["user"]["friends"], json!([]));

    // The fresh profile is immediately usable by authenticated endpoints.
    let response = server
        .get("/api/friends")
        .add_query_param("page", 1)
        .add_query_param("limit", 10)
        .authorization_bearer(&token)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["meta"]["totalCount"], 0);
}

#[tokio::test]
async fn register_rejects_taken_handle() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    env.seed_user("uid-alice", "alice").await;

    let response = server
        .post("/api/users/register")
        .json(&json!({ "userName": "alice", "email": "other@example.com" }))
        .authorization_bearer(&env.token("uid-bob", "bob"))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_twice_is_conflict() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let token = env.seed_user("uid-alice", "alice").await;

    let response = server
        .post("/api/users/register")
        .json(&json!({ "userName": "alice-again", "email": "alice@example.com" }))
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

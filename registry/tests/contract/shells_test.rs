//! Contract Test: /registry/api/v1/registry

use crate::support::{build_app, send};
use axum::http::StatusCode;
use serde_json::json;

const BASE: &str = "/registry/api/v1/registry";

fn shell_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "idShort": "Shell",
        "endpoints": [
            { "interface": "AAS-3.0", "address": "http://10.0.0.1:5111" },
            { "interface": "AAS-3.0", "address": "http://10.0.0.2:5111" }
        ]
    })
}

#[tokio::test]
async fn test_post_creates_and_get_returns_descriptor() {
    let app = build_app();

    let (status, body) = send(&app, "POST", BASE, Some(shell_body("AAS-1"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["entity"]["id"], "AAS-1");

    let (status, body) = send(&app, "GET", &format!("{}/AAS-1", BASE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"]["endpoints"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_duplicate_post_is_conflict() {
    let app = build_app();
    send(&app, "POST", BASE, Some(shell_body("AAS-1"))).await;

    let (status, body) = send(&app, "POST", BASE, Some(shell_body("AAS-1"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["messages"][0]["messageType"], "Error");
    assert!(body["messages"][0]["text"].as_str().unwrap().contains("AAS-1"));
}

#[tokio::test]
async fn test_delete_then_get_and_delete_again_are_not_found() {
    let app = build_app();
    send(&app, "POST", BASE, Some(shell_body("AAS-1"))).await;
    let uri = format!("{}/AAS-1", BASE);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_put_is_create_or_update() {
    let app = build_app();
    let uri = format!("{}/AAS-2", BASE);

    let (status, body) = send(&app, "PUT", &uri, Some(shell_body("AAS-2"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["messages"][0]["text"].as_str().unwrap().ends_with("created"));

    let (status, body) = send(&app, "PUT", &uri, Some(shell_body("AAS-2"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["messages"][0]["text"].as_str().unwrap().ends_with("updated"));
}

#[tokio::test]
async fn test_put_with_mismatched_id_is_bad_request() {
    let app = build_app();
    let (status, _) = send(
        &app,
        "PUT",
        &format!("{}/AAS-3", BASE),
        Some(shell_body("AAS-4")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request_envelope() {
    let app = build_app();
    let (status, body) = send(&app, "POST", BASE, Some(json!({ "idShort": "NoId" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_list_returns_all_shells() {
    let app = build_app();
    send(&app, "POST", BASE, Some(shell_body("AAS-1"))).await;
    send(&app, "POST", BASE, Some(shell_body("AAS-2"))).await;

    let (status, body) = send(&app, "GET", BASE, None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["entity"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["AAS-1", "AAS-2"]);
}

#[tokio::test]
async fn test_percent_encoded_identifier() {
    let app = build_app();
    send(&app, "POST", BASE, Some(shell_body("urn:example:aas/1"))).await;

    let (status, body) = send(&app, "GET", &format!("{}/urn:example:aas%2F1", BASE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"]["id"], "urn:example:aas/1");
}

//! Contract Test: /registry/api/v1/registry/:aas_id/submodels

use crate::support::{build_app, send};
use axum::http::StatusCode;
use serde_json::json;

const BASE: &str = "/registry/api/v1/registry";

async fn app_with_shell() -> axum::Router {
    let app = build_app();
    send(&app, "POST", BASE, Some(json!({ "id": "AAS-1" }))).await;
    app
}

fn submodel_body(id: &str, address: &str) -> serde_json::Value {
    json!({
        "id": id,
        "idShort": "Nameplate",
        "endpoints": [{ "interface": "SUBMODEL-3.0", "address": address }]
    })
}

#[tokio::test]
async fn test_submodel_lifecycle() {
    let app = app_with_shell().await;
    let collection = format!("{}/AAS-1/submodels", BASE);
    let item = format!("{}/SM-1", collection);

    let body = submodel_body("SM-1", "http://a");
    let (status, _) = send(&app, "POST", &collection, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "POST", &collection, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "PUT", &item, Some(submodel_body("SM-1", "http://b"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"]["endpoints"][0]["address"], "http://b");

    let (status, body) = send(&app, "GET", &collection, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &item, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &item, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submodel_under_unknown_shell_is_not_found() {
    let app = build_app();
    let (status, body) = send(
        &app,
        "POST",
        &format!("{}/AAS-X/submodels", BASE),
        Some(submodel_body("SM-1", "http://a")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["messages"][0]["text"].as_str().unwrap().contains("AAS-X"));
}

#[tokio::test]
async fn test_shell_get_includes_nested_submodels() {
    let app = app_with_shell().await;
    send(
        &app,
        "POST",
        &format!("{}/AAS-1/submodels", BASE),
        Some(submodel_body("SM-1", "http://a")),
    )
    .await;

    let (_, body) = send(&app, "GET", &format!("{}/AAS-1", BASE), None).await;
    assert_eq!(body["entity"]["submodelDescriptors"][0]["id"], "SM-1");
}

//! Contract Test: GET /submodels, GET /submodels/:sm_id/submodel

use crate::support::{build_app, send};
use axum::http::StatusCode;

#[tokio::test]
async fn test_get_submodel() {
    let app = build_app().await;
    let (status, body) = send(&app, "GET", "/submodels/urn:sm:test/submodel", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"]["idShort"], "TestSubmodel");
    assert_eq!(
        body["entity"]["submodelElements"][0]["value"][0]["idShort"],
        "TestProp"
    );
}

#[tokio::test]
async fn test_unknown_submodel_is_not_found() {
    let app = build_app().await;
    let (status, body) = send(&app, "GET", "/submodels/urn:sm:other/submodel", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_list_submodels() {
    let app = build_app().await;
    let (status, body) = send(&app, "GET", "/submodels", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"].as_array().unwrap().len(), 1);
}

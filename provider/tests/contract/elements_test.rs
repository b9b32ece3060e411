//! Contract Test: /submodels/:sm_id/submodel/submodelElements

use crate::support::{build_app, send};
use axum::http::StatusCode;
use serde_json::json;

const ELEMENTS: &str = "/submodels/urn:sm:test/submodel/submodelElements";

#[tokio::test]
async fn test_get_nested_property() {
    let app = build_app().await;
    let uri = format!("{}/TestCollection/TestProp", ELEMENTS);
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"]["modelType"], "Property");
    assert_eq!(body["entity"]["value"], "42");
}

#[tokio::test]
async fn test_delete_collection_then_get_is_not_found() {
    let app = build_app().await;

    let (status, _) = send(&app, "DELETE", &format!("{}/TestCollection", ELEMENTS), None).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("{}/TestCollection/TestProp", ELEMENTS);
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["messages"][0]["text"].as_str().unwrap().contains("TestCollection"));
}

#[tokio::test]
async fn test_post_duplicate_is_conflict() {
    let app = build_app().await;
    let element = json!({ "idShort": "TestCollection", "modelType": "Property", "value": "1" });

    let (status, body) = send(&app, "POST", ELEMENTS, Some(element)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["messages"][0]["text"].as_str().unwrap().contains("TestCollection"));
}

#[tokio::test]
async fn test_post_child_under_collection() {
    let app = build_app().await;
    let element = json!({
        "idShort": "Speed",
        "modelType": "Property",
        "valueType": "xs:double",
        "value": "1.5"
    });

    let uri = format!("{}/TestCollection", ELEMENTS);
    let (status, _) = send(&app, "POST", &uri, Some(element)).await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("{}/TestCollection/Speed", ELEMENTS);
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"]["valueType"], "xs:double");
}

#[tokio::test]
async fn test_put_reports_branch() {
    let app = build_app().await;
    let uri = format!("{}/TestCollection/Mode", ELEMENTS);
    let element = json!({ "modelType": "Property", "value": "auto" });

    let (status, body) = send(&app, "PUT", &uri, Some(element.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["messages"][0]["text"].as_str().unwrap().ends_with("created"));
    assert_eq!(body["entity"]["idShort"], "Mode");

    let (_, body) = send(&app, "PUT", &uri, Some(element)).await;
    assert!(body["messages"][0]["text"].as_str().unwrap().ends_with("updated"));
}

#[tokio::test]
async fn test_value_view() {
    let app = build_app().await;
    let uri = format!("{}/TestCollection/TestProp?content=value", ELEMENTS);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"], "42");

    let (status, _) = send(&app, "PUT", &uri, Some(json!(43))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["entity"], "43");
}

#[tokio::test]
async fn test_value_view_of_collection_is_type_mismatch() {
    let app = build_app().await;
    let uri = format!("{}/TestCollection?content=value", ELEMENTS);
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unknown_model_type_is_bad_request() {
    let app = build_app().await;
    let element = json!({ "idShort": "X", "modelType": "Teleporter" });
    let (status, _) = send(&app, "POST", ELEMENTS, Some(element)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

//! テスト用ヘルパー

pub mod http;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use twinreg_common::model::{Element, Submodel};
use twinreg_provider::{api, AppState};

/// TestSubmodel → TestCollection → TestProp="42"
#[allow(dead_code)]
pub fn test_submodel() -> Submodel {
    Submodel::new("urn:sm:test", "TestSubmodel")
        .with_elements([Element::collection(
            "TestCollection",
            [Element::property("TestProp", "42")],
        )
        .unwrap()])
        .unwrap()
}

/// テスト用サブモデルを1件持つルーターを作成
#[allow(dead_code)]
pub async fn build_app() -> Router {
    let state = AppState::default();
    assert!(state.repository.add_submodel(test_submodel()).await.success);
    api::create_router(state)
}

/// リクエストを送り、ステータスとJSON本文を返す
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

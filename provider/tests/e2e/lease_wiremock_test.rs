//! E2E: リースとHTTPクライアントをモックレジストリに対して動かす

use crate::support::test_submodel;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use twinreg_common::identifier::Identifier;
use twinreg_provider::{client::HttpRegistryClient, lease::RegistryLease, publish::shell_descriptor};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const SHELL_PATH: &str = "/registry/api/v1/registry/urn:aas:test";

async fn put_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "PUT")
        .count()
}

#[tokio::test]
async fn test_renewal_recovers_after_registry_errors() {
    let server = MockServer::start().await;
    let descriptor = shell_descriptor(
        &Identifier::new("urn:aas:test"),
        "TestAas",
        "http://provider:5111",
        &[test_submodel()],
    )
    .unwrap();

    // 初回登録と最初の更新は失敗させる
    Mock::given(method("PUT"))
        .and(path(SHELL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(SHELL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "entity": serde_json::to_value(&descriptor).unwrap(),
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(SHELL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpRegistryClient::new(&server.uri(), Duration::from_secs(1)).unwrap();
    let mut lease = RegistryLease::new(
        Arc::new(client),
        vec![descriptor],
        Some(Duration::from_millis(50)),
    );

    let initial = lease.start().await;
    assert_eq!(initial.len(), 1);
    assert!(!initial[0].success);
    assert!(lease.is_running());

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while put_count(&server).await < 4 {
        assert!(tokio::time::Instant::now() < deadline, "renewal stalled");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(lease.is_running());

    lease.stop().await;
    assert!(!lease.is_running());

    let after_stop = put_count(&server).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(put_count(&server).await, after_stop);
}

#[tokio::test]
async fn test_stop_completes_when_registry_is_gone() {
    let server = MockServer::start().await;
    let uri = server.uri();
    let descriptor = shell_descriptor(
        &Identifier::new("urn:aas:test"),
        "TestAas",
        "http://provider:5111",
        &[],
    )
    .unwrap();
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "entity": serde_json::to_value(&descriptor).unwrap(),
        })))
        .mount(&server)
        .await;

    let client = HttpRegistryClient::new(&uri, Duration::from_millis(500)).unwrap();
    let mut lease = RegistryLease::new(Arc::new(client), vec![descriptor], None);

    let initial = lease.start().await;
    assert!(initial[0].success);
    assert!(!lease.is_running());

    drop(server);
    tokio::time::timeout(Duration::from_secs(5), lease.stop())
        .await
        .expect("stop must finish even if deregistration fails");
}

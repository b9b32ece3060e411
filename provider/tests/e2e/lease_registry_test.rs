//! E2E: 実レジストリに対する登録と登録解除

use crate::support::{http::spawn_server, test_submodel};
use std::{sync::Arc, time::Duration};
use twinreg_common::error::ErrorKind;
use twinreg_common::identifier::Identifier;
use twinreg_provider::{
    client::{HttpRegistryClient, RegistryClient},
    lease::RegistryLease,
    publish::{shell_descriptor, SUBMODEL_INTERFACE},
};
use twinreg_registry::{api, store::RegistryStore, AppState};

#[tokio::test]
async fn test_lease_registers_and_deregisters() {
    let state = AppState::in_memory();
    let server = spawn_server(api::create_router(state.clone())).await;

    let aas_id = Identifier::new("urn:aas:test");
    let descriptor =
        shell_descriptor(&aas_id, "TestAas", "http://provider:5111", &[test_submodel()]).unwrap();
    let client = HttpRegistryClient::new(&server.url(), Duration::from_secs(2)).unwrap();
    let mut lease = RegistryLease::new(
        Arc::new(client),
        vec![descriptor],
        Some(Duration::from_millis(50)),
    );

    let initial = lease.start().await;
    assert!(initial[0].success, "{:?}", initial[0].messages);

    let registered = state.store.retrieve_registration(&aas_id).await;
    assert!(registered.success);
    let registered = registered.entity.unwrap();
    assert_eq!(registered.id_short, "TestAas");
    assert_eq!(registered.submodel_descriptors.len(), 1);

    let submodel = &registered.submodel_descriptors[0];
    assert_eq!(submodel.id, Identifier::new("urn:sm:test"));
    let endpoint = submodel.endpoints.iter().next().unwrap();
    assert_eq!(endpoint.interface, SUBMODEL_INTERFACE);
    assert_eq!(
        endpoint.address,
        "http://provider:5111/submodels/urn:sm:test/submodel"
    );

    // 更新周期を何度か回しても登録は1件のまま
    tokio::time::sleep(Duration::from_millis(200)).await;
    let all = state.store.retrieve_registrations().await;
    assert_eq!(all.entity.unwrap().len(), 1);

    lease.stop().await;

    let gone = state.store.retrieve_registration(&aas_id).await;
    assert!(!gone.success);
    assert_eq!(gone.error_kind(), Some(ErrorKind::NotFound));

    server.stop().await;
}

#[tokio::test]
async fn test_client_surfaces_registry_not_found() {
    let server = spawn_server(api::create_router(AppState::in_memory())).await;
    let client = HttpRegistryClient::new(&server.url(), Duration::from_secs(2)).unwrap();

    let result = client.delete(&Identifier::new("urn:aas:missing")).await;
    assert!(!result.success);
    assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));

    server.stop().await;
}

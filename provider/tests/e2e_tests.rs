//! provider end-to-end tests entrypoint

#[path = "support/mod.rs"]
pub mod support;

#[path = "e2e/lease_wiremock_test.rs"]
mod lease_wiremock_test;

#[path = "e2e/lease_registry_test.rs"]
mod lease_registry_test;

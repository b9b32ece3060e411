//! レジストリ通信クライアント
//!
//! ディスクリプタの登録（CreateOrUpdate）と削除を行う。すべての呼び出しは
//! タイムアウト付きで、タイムアウトや通信失敗も`OpResult`の失敗として返す。

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use twinreg_common::{
    descriptor::ShellDescriptor,
    error::{ErrorKind, ModelError, ModelResult},
    identifier::Identifier,
    result::OpResult,
};

/// レジストリAPIのパス
const REGISTRY_PATH: [&str; 4] = ["registry", "api", "v1", "registry"];

/// リースが使うレジストリ操作
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// 登録または置き換え
    async fn create_or_update(&self, descriptor: &ShellDescriptor) -> OpResult<ShellDescriptor>;

    /// 登録を削除
    async fn delete(&self, id: &Identifier) -> OpResult<()>;
}

/// HTTP経由のレジストリクライアント
#[derive(Clone)]
pub struct HttpRegistryClient {
    client: Client,
    base_url: Url,
}

impl HttpRegistryClient {
    /// クライアントを作成
    pub fn new(base_url: &str, timeout: Duration) -> ModelResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ModelError::InvalidArgument(format!("registry url '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ModelError::InvalidArgument(format!(
                "registry url '{}' cannot be a base",
                base_url
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Unexpected(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base_url })
    }

    /// シェル登録のURL（IDはパーセントエンコードする）
    pub fn shell_url(&self, id: &Identifier) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(REGISTRY_PATH).push(id.as_str());
        }
        url
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ModelResult<Reply<T>> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        Ok(match serde_json::from_slice::<OpResult<T>>(&body) {
            Ok(envelope) => Reply::Envelope(envelope),
            Err(_) => Reply::Bare(status),
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> OpResult<T> {
        match self.exchange(request).await {
            Ok(Reply::Envelope(envelope)) => envelope,
            Ok(Reply::Bare(status)) => bare_status(status),
            Err(err) => err.into(),
        }
    }
}

/// レジストリ応答（エンベロープ本文か、それ以外の本文）
enum Reply<T> {
    Envelope(OpResult<T>),
    Bare(StatusCode),
}

/// エンベロープ以外の本文はステータスから分類する
fn bare_status<T>(status: StatusCode) -> OpResult<T> {
    let kind = ErrorKind::from_status_code(status.as_u16())
        .filter(|_| !status.is_success())
        .unwrap_or(ErrorKind::TransportFailure);
    OpResult::fail(kind, format!("registry responded with {}", status))
}

fn transport_error(err: reqwest::Error) -> ModelError {
    if err.is_timeout() {
        ModelError::Timeout(format!("registry call timed out: {}", err))
    } else {
        ModelError::Transport(err.to_string())
    }
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    async fn create_or_update(&self, descriptor: &ShellDescriptor) -> OpResult<ShellDescriptor> {
        let url = self.shell_url(&descriptor.id);
        debug!(url = %url, "PUT shell descriptor");
        self.send(self.client.put(url).json(descriptor)).await
    }

    async fn delete(&self, id: &Identifier) -> OpResult<()> {
        let url = self.shell_url(id);
        debug!(url = %url, "DELETE shell descriptor");
        match self.exchange::<()>(self.client.delete(url)).await {
            Ok(Reply::Envelope(envelope)) => envelope,
            // 本文なしの2xx（204等）も削除成功とみなす
            Ok(Reply::Bare(status)) if status.is_success() => OpResult::ok_empty(),
            Ok(Reply::Bare(status)) => bare_status(status),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> HttpRegistryClient {
        HttpRegistryClient::new(&server.uri(), Duration::from_millis(500)).unwrap()
    }

    #[test]
    fn test_shell_url_encodes_identifier() {
        let client =
            HttpRegistryClient::new("http://registry:4999/", Duration::from_secs(1)).unwrap();
        let url = client.shell_url(&"urn:example:aas/1".into());
        assert_eq!(
            url.as_str(),
            "http://registry:4999/registry/api/v1/registry/urn:example:aas%2F1"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpRegistryClient::new("not a url", Duration::from_secs(1)).err().unwrap();
        assert!(matches!(err, ModelError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_create_or_update_parses_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/registry/api/v1/registry/AAS-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "entity": { "id": "AAS-1" },
                "messages": [{ "messageType": "Info", "text": "Shell descriptor 'AAS-1' created" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .create_or_update(&ShellDescriptor::new("AAS-1", "Shell"))
            .await;
        assert!(result.success);
        assert_eq!(result.entity.unwrap().id.as_str(), "AAS-1");
    }

    #[tokio::test]
    async fn test_non_envelope_error_maps_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&server)
            .await;

        let result = client_for(&server).delete(&"AAS-1".into()).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_delete_without_body_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/registry/api/v1/registry/AAS-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).delete(&"AAS-1".into()).await;
        assert!(result.success);
        assert!(result.messages.is_empty());
    }

    #[tokio::test]
    async fn test_put_without_envelope_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .create_or_update(&ShellDescriptor::new("AAS-1", "Shell"))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::TransportFailure));
    }

    #[tokio::test]
    async fn test_slow_registry_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "messages": [] }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let result = client_for(&server)
            .create_or_update(&ShellDescriptor::new("AAS-1", "Shell"))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::Timeout));
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_transport_failure() {
        // 予約済みポートへは接続できない
        let client =
            HttpRegistryClient::new("http://127.0.0.1:1", Duration::from_millis(500)).unwrap();
        let result = client.delete(&"AAS-1".into()).await;
        assert!(matches!(
            result.error_kind(),
            Some(ErrorKind::TransportFailure) | Some(ErrorKind::Timeout)
        ));
    }
}

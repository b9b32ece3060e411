//! 設定管理
//!
//! RegistryConfig, ProviderConfig等の設定構造体と環境変数ヘルパー

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 環境変数を取得する（未設定・空文字は`None`）
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

/// 環境変数を型変換して取得する
///
/// 未設定ならデフォルト値。変換できない値は警告を出してデフォルト値を使う。
pub fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    let Some(raw) = env_var(name) else {
        return default;
    };
    match raw.parse() {
        Ok(val) => val,
        Err(_) => {
            tracing::warn!(name, value = %raw, "Ignoring unparsable environment variable");
            default
        }
    }
}

/// レジストリサーバー設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryConfig {
    /// ホストアドレス (デフォルト: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号 (デフォルト: 4999)
    #[serde(default = "default_registry_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_registry_port() -> u16 {
    4999
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_registry_port(),
        }
    }
}

impl RegistryConfig {
    /// 環境変数から読み込む
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_var("TWINREG_HOST").unwrap_or(defaults.host),
            port: env_parse("TWINREG_PORT", defaults.port),
        }
    }

    /// 待ち受けアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// サブモデル提供側（プロバイダー）設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    /// レジストリURL (デフォルト: "http://localhost:4999")
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    /// ホストアドレス (デフォルト: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号 (デフォルト: 5111)
    #[serde(default = "default_provider_port")]
    pub port: u16,

    /// 登録の更新間隔（秒）。0で更新ループを起動しない (デフォルト: 30)
    #[serde(default = "default_renewal_interval")]
    pub renewal_interval_secs: u64,

    /// レジストリ呼び出しのタイムアウト（秒）(デフォルト: 5)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// エンドポイントとして公開するURL（未設定時はhost:portから組み立てる）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

fn default_registry_url() -> String {
    "http://localhost:4999".to_string()
}

fn default_provider_port() -> u16 {
    5111
}

fn default_renewal_interval() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    5
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            host: default_host(),
            port: default_provider_port(),
            renewal_interval_secs: default_renewal_interval(),
            request_timeout_secs: default_request_timeout(),
            public_url: None,
        }
    }
}

impl ProviderConfig {
    /// 待ち受けアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// エンドポイントとして広告するURL
    pub fn advertised_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }

    /// 更新間隔（0なら`None`）
    pub fn renewal_interval(&self) -> Option<Duration> {
        (self.renewal_interval_secs > 0).then(|| Duration::from_secs(self.renewal_interval_secs))
    }

    /// 外向き呼び出しのタイムアウト
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

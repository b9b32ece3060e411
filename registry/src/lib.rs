//! Twin Registry Server
//!
//! シェル/サブモデルディスクリプタを登録・検索する中央レジストリ

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// コマンドライン引数
pub mod cli;

/// ディスクリプタカタログ
pub mod store;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// ディスクリプタストア
    pub store: Arc<dyn store::RegistryStore>,
}

impl AppState {
    /// メモリ内ストアで状態を作成
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(store::InMemoryRegistry::new()),
        }
    }
}

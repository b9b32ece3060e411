//! Twin Provider
//!
//! サブモデルをHTTPで提供し、自身のディスクリプタをレジストリへ登録・維持する

#![warn(missing_docs)]

/// HTTP APIハンドラー
pub mod api;

/// コマンドライン引数
pub mod cli;

/// レジストリ通信クライアント
pub mod client;

/// レジストリリース（登録・更新・撤回）
pub mod lease;

/// 公開ディスクリプタの組み立て
pub mod publish;

/// サブモデルリポジトリ
pub mod repository;

/// 協調的キャンセル
pub mod shutdown;

/// アプリケーション状態
#[derive(Clone, Default)]
pub struct AppState {
    /// サブモデルリポジトリ
    pub repository: repository::SubmodelRepository,
}

//! 終了シグナル待機
//!
//! 両バイナリ共通のCtrl+C / SIGTERM待ち

use std::future::Future;
use tracing::{error, info};

/// 終了要因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
}

/// Ctrl+CまたはSIGTERMを待機する
///
/// ハンドラーを登録できなかったシグナルは待機対象から外す。
pub async fn shutdown_signal() -> ShutdownReason {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    first_of(ctrl_c, terminate).await
}

/// 先に完了した方を終了要因として返す
async fn first_of(
    interrupt: impl Future<Output = ()>,
    terminate: impl Future<Output = ()>,
) -> ShutdownReason {
    tokio::select! {
        _ = interrupt => {
            info!("Received Ctrl+C, shutting down...");
            ShutdownReason::Interrupt
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
            ShutdownReason::Terminate
        }
    }
}

//! 協調的キャンセル
//!
//! 更新ループの停止やHTTPサーバーのグレースフルシャットダウンに使う。

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::Notify;

/// 一度だけ発火するキャンセルシグナル
#[derive(Clone, Debug, Default)]
pub struct CancelSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelSignal {
    /// 未発火のシグナルを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 発火済みか
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// 発火し、待機中のタスクをすべて起こす
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// 発火するまで待つ
    pub async fn cancelled(&self) {
        // フラグ確認より先に通知を受け取れる状態にしておく
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

//! レジストリリース
//!
//! 起動時にディスクリプタを登録し、更新間隔が設定されていれば
//! バックグラウンドで定期的に再登録する。停止時はループを止めて合流したうえで
//! 登録を削除する。削除の失敗はログに残すだけで、停止処理は必ず完了する。

use crate::client::RegistryClient;
use crate::shutdown::CancelSignal;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};
use twinreg_common::descriptor::ShellDescriptor;
use twinreg_common::result::OpResult;

/// 登録の維持を担うリース
pub struct RegistryLease {
    client: Arc<dyn RegistryClient>,
    descriptors: Arc<Vec<ShellDescriptor>>,
    renewal_interval: Option<Duration>,
    cancel: CancelSignal,
    task: Option<JoinHandle<()>>,
}

impl RegistryLease {
    /// リースを作成（`renewal_interval`が`None`なら更新ループを起動しない）
    pub fn new(
        client: Arc<dyn RegistryClient>,
        descriptors: Vec<ShellDescriptor>,
        renewal_interval: Option<Duration>,
    ) -> Self {
        Self {
            client,
            descriptors: Arc::new(descriptors),
            renewal_interval: renewal_interval.filter(|d| !d.is_zero()),
            cancel: CancelSignal::new(),
            task: None,
        }
    }

    /// 更新ループが動作中か
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// 初回登録を行い、必要なら更新ループを起動する
    ///
    /// 初回登録が失敗しても更新ループは起動し、次の周期で再試行する。
    /// 戻り値は各ディスクリプタの初回登録結果。
    pub async fn start(&mut self) -> Vec<OpResult<ShellDescriptor>> {
        let results = register_all(self.client.as_ref(), &self.descriptors, "initial").await;

        if let (Some(period), None) = (self.renewal_interval, self.task.as_ref()) {
            let client = Arc::clone(&self.client);
            let descriptors = Arc::clone(&self.descriptors);
            let cancel = self.cancel.clone();
            self.task = Some(tokio::spawn(renewal_loop(client, descriptors, period, cancel)));
            info!(interval_secs = period.as_secs_f64(), "Registry lease renewal started");
        }

        results
    }

    /// ループを止めて合流し、登録を削除する
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Renewal task ended abnormally: {}", e);
            }
        }

        for descriptor in self.descriptors.iter() {
            let result = self.client.delete(&descriptor.id).await;
            if result.success {
                info!(aas_id = %descriptor.id, "Registration withdrawn");
            } else {
                warn!(
                    aas_id = %descriptor.id,
                    error = %result.message_text(),
                    "Failed to withdraw registration"
                );
            }
        }
    }
}

impl Drop for RegistryLease {
    fn drop(&mut self) {
        // stop()を経ずに破棄された場合もループを残さない
        if let Some(task) = self.task.take() {
            self.cancel.cancel();
            task.abort();
        }
    }
}

async fn renewal_loop(
    client: Arc<dyn RegistryClient>,
    descriptors: Arc<Vec<ShellDescriptor>>,
    period: Duration,
    cancel: CancelSignal,
) {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // 初回tickは即時に返るため、初回登録の直後は1周期待つ
    timer.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = timer.tick() => {}
        }
        if cancel.is_cancelled() {
            break;
        }
        register_all(client.as_ref(), &descriptors, "renewal").await;
    }

    info!("Registry lease renewal stopped");
}

async fn register_all(
    client: &dyn RegistryClient,
    descriptors: &[ShellDescriptor],
    attempt: &'static str,
) -> Vec<OpResult<ShellDescriptor>> {
    let mut results = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let result = client.create_or_update(descriptor).await;
        if result.success {
            info!(aas_id = %descriptor.id, attempt, "Registration succeeded");
        } else {
            warn!(
                aas_id = %descriptor.id,
                attempt,
                error = %result.message_text(),
                "Registration failed, retrying on next tick"
            );
        }
        results.push(result);
    }
    results
}

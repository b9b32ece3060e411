//! ログ初期化
//!
//! `TWINREG_LOG_LEVEL`（なければ`RUST_LOG`、既定は`info`）でフィルタし、
//! `TWINREG_LOG_DIR`が設定されていれば日次ローテーションのファイルにも出力する。

use crate::config::env_var;
use crate::error::{CommonError, CommonResult};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// ログ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// フィルタ指定（例: "info", "twinreg_provider=debug,info"）
    pub filter: String,
    /// ファイル出力先ディレクトリ
    pub dir: Option<String>,
    /// ファイル名の接頭辞
    pub file_prefix: String,
}

impl LogSettings {
    /// 環境変数から読み込む
    pub fn from_env(file_prefix: &str) -> Self {
        Self {
            filter: env_var("TWINREG_LOG_LEVEL")
                .or_else(|| env_var("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),
            dir: env_var("TWINREG_LOG_DIR"),
            file_prefix: file_prefix.to_string(),
        }
    }
}

/// グローバルsubscriberを設定する
///
/// ファイル出力時は返却される`WorkerGuard`をプロセス終了まで保持すること。
pub fn init(settings: &LogSettings) -> CommonResult<Option<WorkerGuard>> {
    let (subscriber, guard) = build_subscriber(settings)?;
    subscriber
        .try_init()
        .map_err(|e| CommonError::Config(format!("failed to install subscriber: {}", e)))?;
    Ok(guard)
}

/// 設定からsubscriberを組み立てる（グローバルには設定しない）
pub fn build_subscriber(
    settings: &LogSettings,
) -> CommonResult<(impl Subscriber + Send + Sync + 'static, Option<WorkerGuard>)> {
    let filter = EnvFilter::try_new(&settings.filter)
        .map_err(|e| CommonError::Config(format!("invalid log filter: {}", e)))?;
    let stdout_layer = fmt::layer().with_target(true);

    let (file_layer, guard) = match &settings.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, &settings.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = Registry::default()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer);
    Ok((subscriber, guard))
}

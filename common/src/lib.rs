//! 共通型定義
//!
//! レジストリとサブモデル提供側で共有する型・エラー・設定

#![warn(missing_docs)]

pub mod config;
pub mod descriptor;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod identifier;
pub mod logging;
pub mod model;
pub mod result;
#[cfg(feature = "signal")]
pub mod signal;

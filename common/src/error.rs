//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! # 分類
//!
//! `ModelError`は要素ツリー・レジストリ・リース通信で起こり得る想定内の失敗を
//! 表す。`kind()`と`status_code()`でトランスポート層が応答を組み立てられる。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// 失敗の分類
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// 対象が存在しない
    NotFound,
    /// 既に存在する
    Conflict,
    /// 型が要求と一致しない
    TypeMismatch,
    /// 引数が不正
    InvalidArgument,
    /// タイムアウト
    Timeout,
    /// 通信失敗
    TransportFailure,
    /// 想定外の失敗
    Unexpected,
}

impl ErrorKind {
    /// トランスポート層向けのステータスヒント
    pub fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::TypeMismatch => 422,
            Self::InvalidArgument => 400,
            Self::Timeout => 504,
            Self::TransportFailure => 502,
            Self::Unexpected => 500,
        }
    }

    /// ステータスコードから分類を逆引きする
    pub fn from_status_code(code: u16) -> Option<Self> {
        match code {
            404 => Some(Self::NotFound),
            409 => Some(Self::Conflict),
            422 => Some(Self::TypeMismatch),
            400 => Some(Self::InvalidArgument),
            504 => Some(Self::Timeout),
            502 => Some(Self::TransportFailure),
            500 => Some(Self::Unexpected),
            _ => None,
        }
    }
}

/// Model / registry error type
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Element or registration not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate idShort or identifier
    #[error("Conflict: {0} already exists")]
    Conflict(String),

    /// Resolved element has a different type
    #[error("Type mismatch at {path}: expected {expected}, found {actual}")]
    TypeMismatch {
        /// Resolved path
        path: String,
        /// Requested capability
        expected: String,
        /// Actual model type
        actual: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Timeout error
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Transport error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ModelError {
    /// エラー分類を返す
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::TransportFailure,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Returns the transport status hint for this error.
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// 分類とメッセージからエラーを復元する
    ///
    /// 型不一致の詳細はメッセージに含まれるため`path`にそのまま格納する。
    pub fn from_kind(kind: ErrorKind, text: impl Into<String>) -> Self {
        let text = text.into();
        match kind {
            ErrorKind::NotFound => Self::NotFound(text),
            ErrorKind::Conflict => Self::Conflict(text),
            ErrorKind::TypeMismatch => Self::TypeMismatch {
                path: text,
                expected: String::new(),
                actual: String::new(),
            },
            ErrorKind::InvalidArgument => Self::InvalidArgument(text),
            ErrorKind::Timeout => Self::Timeout(text),
            ErrorKind::TransportFailure => Self::Transport(text),
            ErrorKind::Unexpected => Self::Unexpected(text),
        }
    }
}

impl From<CommonError> for ModelError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::Validation(msg) => Self::InvalidArgument(msg),
            other => Self::Unexpected(other.to_string()),
        }
    }
}

/// Result type alias (Common)
pub type CommonResult<T> = Result<T, CommonError>;

/// Result type alias (Model)
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_error_display() {
        let error = CommonError::Config("test config error".to_string());
        assert_eq!(error.to_string(), "Configuration error: test config error");
    }

    #[test]
    fn test_model_error_not_found_names_path() {
        let error = ModelError::NotFound("TestCollection/Missing".to_string());
        assert!(error.to_string().contains("TestCollection/Missing"));
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_model_error_conflict_names_id() {
        let error = ModelError::Conflict("AAS-1".to_string());
        assert_eq!(error.to_string(), "Conflict: AAS-1 already exists");
    }

    #[test]
    fn test_error_from_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let common_error: CommonError = json_error.into();
        assert!(matches!(common_error, CommonError::Serialization(_)));

        let model_error: ModelError = common_error.into();
        assert_eq!(model_error.kind(), ErrorKind::Unexpected);
    }

    #[test]
    fn test_model_error_status_code() {
        assert_eq!(ModelError::NotFound("x".into()).status_code(), 404);
        assert_eq!(ModelError::Conflict("x".into()).status_code(), 409);
        assert_eq!(
            ModelError::TypeMismatch {
                path: "a".into(),
                expected: "Property".into(),
                actual: "Blob".into()
            }
            .status_code(),
            422
        );
        assert_eq!(ModelError::InvalidArgument("x".into()).status_code(), 400);
        assert_eq!(ModelError::Timeout("x".into()).status_code(), 504);
        assert_eq!(ModelError::Transport("x".into()).status_code(), 502);
        assert_eq!(ModelError::Unexpected("x".into()).status_code(), 500);
    }

    #[test]
    fn test_status_code_round_trip() {
        for kind in [
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::TypeMismatch,
            ErrorKind::InvalidArgument,
            ErrorKind::Timeout,
            ErrorKind::TransportFailure,
            ErrorKind::Unexpected,
        ] {
            assert_eq!(ErrorKind::from_status_code(kind.status_code()), Some(kind));
        }
        assert_eq!(ErrorKind::from_status_code(200), None);
    }
}

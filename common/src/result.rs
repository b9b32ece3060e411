//! 結果エンベロープ
//!
//! すべてのコア操作は例外を投げる代わりに`OpResult`を返す。
//! 失敗は常に1件以上のError/Exceptionメッセージを伴い、呼び出し側は
//! 内側のメッセージを捨てずに自分のメッセージを追記していく。

use crate::error::{ErrorKind, ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// メッセージ種別
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageType {
    /// 情報
    Info,
    /// 警告
    Warning,
    /// エラー
    Error,
    /// 例外（想定外の失敗）
    Exception,
    /// 成功
    Success,
}

impl MessageType {
    /// 失敗を表す種別か
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Error | Self::Exception)
    }
}

/// エンベロープに積まれる1件のメッセージ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// 種別
    pub message_type: MessageType,
    /// トランスポート層向けのステータスヒント
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// 本文
    pub text: String,
}

impl Message {
    /// 情報メッセージを作成
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Info,
            code: None,
            text: text.into(),
        }
    }

    /// 分類付きのエラーメッセージを作成
    pub fn error(kind: ErrorKind, text: impl Into<String>) -> Self {
        let message_type = match kind {
            ErrorKind::Unexpected => MessageType::Exception,
            _ => MessageType::Error,
        };
        Self {
            message_type,
            code: Some(kind.status_code()),
            text: text.into(),
        }
    }

    /// コードから分類を取り出す
    pub fn kind(&self) -> Option<ErrorKind> {
        if !self.message_type.is_failure() {
            return None;
        }
        Some(
            self.code
                .and_then(ErrorKind::from_status_code)
                .unwrap_or(ErrorKind::Unexpected),
        )
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{:?} {}] {}", self.message_type, code, self.text),
            None => write!(f, "[{:?}] {}", self.message_type, self.text),
        }
    }
}

/// 成否・エンティティ・メッセージ列をまとめた結果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct OpResult<T> {
    /// 成否
    pub success: bool,
    /// 返却値（ペイロードを約束しない操作では空）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<T>,
    /// 呼び出し階層を通じて蓄積されたメッセージ
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl<T> OpResult<T> {
    /// エンティティ付きの成功
    pub fn ok(entity: T) -> Self {
        Self {
            success: true,
            entity: Some(entity),
            messages: Vec::new(),
        }
    }

    /// ペイロードなしの成功（Delete等）
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            entity: None,
            messages: Vec::new(),
        }
    }

    /// 分類付きの失敗
    pub fn fail(kind: ErrorKind, text: impl Into<String>) -> Self {
        Self {
            success: false,
            entity: None,
            messages: vec![Message::error(kind, text)],
        }
    }

    /// `ModelError`から失敗を作成
    pub fn from_error(err: &ModelError) -> Self {
        Self::fail(err.kind(), err.to_string())
    }

    /// 情報メッセージを追記
    pub fn with_info(mut self, text: impl Into<String>) -> Self {
        self.messages.push(Message::info(text));
        self
    }

    /// 成功した場合のみエンティティを変換する
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OpResult<U> {
        OpResult {
            success: self.success,
            entity: self.entity.map(f),
            messages: self.messages,
        }
    }

    /// 失敗した内側の結果に自分のメッセージを追記し、型を付け替える
    ///
    /// 追記するメッセージの分類は内側の最初のエラーを引き継ぐ。
    pub fn wrap_failure<U>(self, text: impl Into<String>) -> OpResult<U> {
        let kind = self.error_kind().unwrap_or(ErrorKind::Unexpected);
        let mut messages = self.messages;
        messages.push(Message::error(kind, text));
        OpResult {
            success: false,
            entity: None,
            messages,
        }
    }

    /// 最初の失敗メッセージの分類
    pub fn error_kind(&self) -> Option<ErrorKind> {
        if self.success {
            return None;
        }
        self.messages
            .iter()
            .find_map(Message::kind)
            .or(Some(ErrorKind::Unexpected))
    }

    /// 全メッセージを連結した文字列
    pub fn message_text(&self) -> String {
        self.messages
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `?`で扱える形に変換する
    pub fn into_result(self) -> ModelResult<Option<T>> {
        if self.success {
            return Ok(self.entity);
        }
        let kind = self.error_kind().unwrap_or(ErrorKind::Unexpected);
        let text = self
            .messages
            .iter()
            .filter(|m| m.message_type.is_failure())
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Err(ModelError::from_kind(kind, text))
    }
}

impl<T> From<ModelError> for OpResult<T> {
    fn from(err: ModelError) -> Self {
        Self::from_error(&err)
    }
}

impl<T> From<ModelResult<T>> for OpResult<T> {
    fn from(result: ModelResult<T>) -> Self {
        match result {
            Ok(entity) => Self::ok(entity),
            Err(err) => Self::from_error(&err),
        }
    }
}

//! 結果エンベロープのHTTP応答への変換（`http`フィーチャー）

use crate::error::ModelError;
use crate::result::OpResult;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// `OpResult`をそのままJSON本文として返す応答
///
/// 失敗時のステータスは最初のエラーメッセージの分類から決める。
pub struct Envelope<T> {
    result: OpResult<T>,
    success_status: StatusCode,
}

impl<T> Envelope<T> {
    /// 成功時200
    pub fn ok(result: OpResult<T>) -> Self {
        Self {
            result,
            success_status: StatusCode::OK,
        }
    }

    /// 成功時201
    pub fn created(result: OpResult<T>) -> Self {
        Self {
            result,
            success_status: StatusCode::CREATED,
        }
    }

    /// JSON本文の解析失敗
    pub fn rejected(rejection: JsonRejection) -> Self {
        Self::ok(ModelError::InvalidArgument(rejection.body_text()).into())
    }

    fn status(&self) -> StatusCode {
        match self.result.error_kind() {
            None => self.success_status,
            Some(kind) => StatusCode::from_u16(kind.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self.result)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_status_follows_error_kind() {
        let conflict: OpResult<()> = OpResult::fail(ErrorKind::Conflict, "AAS-1");
        assert_eq!(Envelope::created(conflict).status(), StatusCode::CONFLICT);

        let created = OpResult::ok(1);
        assert_eq!(Envelope::created(created).status(), StatusCode::CREATED);

        let mismatch: OpResult<()> = OpResult::fail(ErrorKind::TypeMismatch, "x");
        assert_eq!(
            Envelope::ok(mismatch).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}

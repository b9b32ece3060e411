//! 要素APIハンドラー
//!
//! `*id_short_path`は"/"区切りのidShortパス（リスト内は数値インデックス）。

use super::ContentQuery;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use twinreg_common::error::ModelError;
use twinreg_common::http::Envelope;
use twinreg_common::identifier::Identifier;
use twinreg_common::model::Element;
use twinreg_common::result::OpResult;

fn parse_element(body: Value) -> Result<Element, ModelError> {
    serde_json::from_value(body)
        .map_err(|e| ModelError::InvalidArgument(format!("invalid element: {}", e)))
}

/// GET /submodels/:sm_id/submodel/submodelElements - ルート直下の要素
pub async fn list_elements(
    State(state): State<AppState>,
    Path(sm_id): Path<String>,
) -> Envelope<Vec<Element>> {
    let id = Identifier::new(sm_id);
    Envelope::ok(state.repository.retrieve_elements(&id).await)
}

/// POST /submodels/:sm_id/submodel/submodelElements - ルート直下に作成
pub async fn create_root_element(
    State(state): State<AppState>,
    Path(sm_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Envelope<Element> {
    create_under(state, sm_id, String::new(), payload).await
}

/// POST /submodels/:sm_id/submodel/submodelElements/*id_short_path - 子要素を作成
pub async fn create_child_element(
    State(state): State<AppState>,
    Path((sm_id, path)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Envelope<Element> {
    create_under(state, sm_id, path, payload).await
}

async fn create_under(
    state: AppState,
    sm_id: String,
    parent_path: String,
    payload: Result<Json<Value>, JsonRejection>,
) -> Envelope<Element> {
    let Json(body) = match payload {
        Ok(json) => json,
        Err(rejection) => return Envelope::rejected(rejection),
    };
    let element = match parse_element(body) {
        Ok(element) => element,
        Err(err) => return Envelope::ok(err.into()),
    };
    let id = Identifier::new(sm_id);
    Envelope::created(state.repository.create_element(&id, &parent_path, element).await)
}

/// GET /submodels/:sm_id/submodel/submodelElements/*id_short_path
///
/// `?content=value`で値のみを返す。
pub async fn get_element(
    State(state): State<AppState>,
    Path((sm_id, path)): Path<(String, String)>,
    Query(query): Query<ContentQuery>,
) -> Response {
    let id = Identifier::new(sm_id);
    if query.is_value() {
        Envelope::ok(state.repository.retrieve_value(&id, &path).await).into_response()
    } else {
        Envelope::ok(state.repository.retrieve_element(&id, &path).await).into_response()
    }
}

/// PUT /submodels/:sm_id/submodel/submodelElements/*id_short_path
///
/// 要素の作成または置き換え。`?content=value`では値のみを更新する。
pub async fn put_element(
    State(state): State<AppState>,
    Path((sm_id, path)): Path<(String, String)>,
    Query(query): Query<ContentQuery>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(json) => json,
        Err(rejection) => return Envelope::<()>::rejected(rejection).into_response(),
    };
    let id = Identifier::new(sm_id);

    if query.is_value() {
        return Envelope::ok(state.repository.update_value(&id, &path, body).await)
            .into_response();
    }

    let result: OpResult<Element> = match parse_element(body) {
        Ok(element) => {
            state
                .repository
                .create_or_update_element(&id, &path, element)
                .await
        }
        Err(err) => err.into(),
    };
    Envelope::ok(result).into_response()
}

/// DELETE /submodels/:sm_id/submodel/submodelElements/*id_short_path
pub async fn delete_element(
    State(state): State<AppState>,
    Path((sm_id, path)): Path<(String, String)>,
) -> Envelope<()> {
    let id = Identifier::new(sm_id);
    Envelope::ok(state.repository.delete_element(&id, &path).await)
}

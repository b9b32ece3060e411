//! シェルディスクリプタAPIハンドラー

use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use twinreg_common::descriptor::ShellDescriptor;
use twinreg_common::http::Envelope;
use twinreg_common::identifier::Identifier;

/// GET /registry/api/v1/registry - 全シェル一覧
pub async fn list_shells(State(state): State<AppState>) -> Envelope<Vec<ShellDescriptor>> {
    Envelope::ok(state.store.retrieve_registrations().await)
}

/// POST /registry/api/v1/registry - シェル登録
pub async fn create_shell(
    State(state): State<AppState>,
    payload: Result<Json<ShellDescriptor>, JsonRejection>,
) -> Envelope<ShellDescriptor> {
    match payload {
        Ok(Json(descriptor)) => {
            Envelope::created(state.store.create_registration(descriptor).await)
        }
        Err(rejection) => Envelope::rejected(rejection),
    }
}

/// GET /registry/api/v1/registry/:aas_id - シェル取得
pub async fn get_shell(
    State(state): State<AppState>,
    Path(aas_id): Path<String>,
) -> Envelope<ShellDescriptor> {
    let id = Identifier::new(aas_id);
    Envelope::ok(state.store.retrieve_registration(&id).await)
}

/// PUT /registry/api/v1/registry/:aas_id - シェル登録または更新
pub async fn put_shell(
    State(state): State<AppState>,
    Path(aas_id): Path<String>,
    payload: Result<Json<ShellDescriptor>, JsonRejection>,
) -> Envelope<ShellDescriptor> {
    let Json(descriptor) = match payload {
        Ok(json) => json,
        Err(rejection) => return Envelope::rejected(rejection),
    };
    let id = Identifier::new(aas_id);
    Envelope::ok(state.store.create_or_update_registration(&id, descriptor).await)
}

/// DELETE /registry/api/v1/registry/:aas_id - シェル削除
pub async fn delete_shell(
    State(state): State<AppState>,
    Path(aas_id): Path<String>,
) -> Envelope<()> {
    let id = Identifier::new(aas_id);
    Envelope::ok(state.store.delete_registration(&id).await)
}

//! サブモデルAPIハンドラー

use crate::AppState;
use axum::extract::{Path, State};
use twinreg_common::http::Envelope;
use twinreg_common::identifier::Identifier;
use twinreg_common::model::Submodel;

/// GET /submodels - 提供中のサブモデル一覧
pub async fn list_submodels(State(state): State<AppState>) -> Envelope<Vec<Submodel>> {
    Envelope::ok(state.repository.list_submodels().await)
}

/// GET /submodels/:sm_id/submodel - サブモデル全体
pub async fn get_submodel(
    State(state): State<AppState>,
    Path(sm_id): Path<String>,
) -> Envelope<Submodel> {
    let id = Identifier::new(sm_id);
    Envelope::ok(state.repository.retrieve_submodel(&id).await)
}

//! サブモデルディスクリプタAPIハンドラー

use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use twinreg_common::descriptor::SubmodelDescriptor;
use twinreg_common::http::Envelope;
use twinreg_common::identifier::Identifier;

/// GET /registry/api/v1/registry/:aas_id/submodels
pub async fn list_submodels(
    State(state): State<AppState>,
    Path(aas_id): Path<String>,
) -> Envelope<Vec<SubmodelDescriptor>> {
    let aas_id = Identifier::new(aas_id);
    Envelope::ok(state.store.retrieve_submodel_registrations(&aas_id).await)
}

/// POST /registry/api/v1/registry/:aas_id/submodels
pub async fn create_submodel(
    State(state): State<AppState>,
    Path(aas_id): Path<String>,
    payload: Result<Json<SubmodelDescriptor>, JsonRejection>,
) -> Envelope<SubmodelDescriptor> {
    let Json(descriptor) = match payload {
        Ok(json) => json,
        Err(rejection) => return Envelope::rejected(rejection),
    };
    let aas_id = Identifier::new(aas_id);
    Envelope::created(
        state
            .store
            .create_submodel_registration(&aas_id, descriptor)
            .await,
    )
}

/// GET /registry/api/v1/registry/:aas_id/submodels/:sm_id
pub async fn get_submodel(
    State(state): State<AppState>,
    Path((aas_id, sm_id)): Path<(String, String)>,
) -> Envelope<SubmodelDescriptor> {
    let (aas_id, sm_id) = (Identifier::new(aas_id), Identifier::new(sm_id));
    Envelope::ok(
        state
            .store
            .retrieve_submodel_registration(&aas_id, &sm_id)
            .await,
    )
}

/// PUT /registry/api/v1/registry/:aas_id/submodels/:sm_id
pub async fn put_submodel(
    State(state): State<AppState>,
    Path((aas_id, sm_id)): Path<(String, String)>,
    payload: Result<Json<SubmodelDescriptor>, JsonRejection>,
) -> Envelope<SubmodelDescriptor> {
    let Json(descriptor) = match payload {
        Ok(json) => json,
        Err(rejection) => return Envelope::rejected(rejection),
    };
    let (aas_id, sm_id) = (Identifier::new(aas_id), Identifier::new(sm_id));
    Envelope::ok(
        state
            .store
            .create_or_update_submodel_registration(&aas_id, &sm_id, descriptor)
            .await,
    )
}

/// DELETE /registry/api/v1/registry/:aas_id/submodels/:sm_id
pub async fn delete_submodel(
    State(state): State<AppState>,
    Path((aas_id, sm_id)): Path<(String, String)>,
) -> Envelope<()> {
    let (aas_id, sm_id) = (Identifier::new(aas_id), Identifier::new(sm_id));
    Envelope::ok(
        state
            .store
            .delete_submodel_registration(&aas_id, &sm_id)
            .await,
    )
}

//! REST APIハンドラー
//!
//! シェル/サブモデルディスクリプタの登録・取得・削除API

pub mod shells;
pub mod submodels;

use crate::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// APIのベースパス
pub const BASE_PATH: &str = "/registry/api/v1/registry";

/// APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(shells::list_shells).post(shells::create_shell))
        .route(
            "/:aas_id",
            get(shells::get_shell)
                .put(shells::put_shell)
                .delete(shells::delete_shell),
        )
        .route(
            "/:aas_id/submodels",
            get(submodels::list_submodels).post(submodels::create_submodel),
        )
        .route(
            "/:aas_id/submodels/:sm_id",
            get(submodels::get_submodel)
                .put(submodels::put_submodel)
                .delete(submodels::delete_submodel),
        );

    Router::new()
        .nest(BASE_PATH, api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

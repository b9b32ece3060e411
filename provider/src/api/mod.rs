//! サブモデル提供HTTP API
//!
//! サブモデルと要素をパスで読み書きするエンドポイント

pub mod elements;
pub mod submodels;

use crate::AppState;
use axum::{routing::get, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// `?content=`クエリ
#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    /// `value`なら値のみの表現を扱う
    #[serde(default)]
    pub content: Option<String>,
}

impl ContentQuery {
    /// 値のみの表現が要求されているか
    pub fn is_value(&self) -> bool {
        self.content.as_deref() == Some("value")
    }
}

/// APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/submodels", get(submodels::list_submodels))
        .route("/submodels/:sm_id/submodel", get(submodels::get_submodel))
        .route(
            "/submodels/:sm_id/submodel/submodelElements",
            get(elements::list_elements).post(elements::create_root_element),
        )
        .route(
            "/submodels/:sm_id/submodel/submodelElements/*id_short_path",
            get(elements::get_element)
                .post(elements::create_child_element)
                .put(elements::put_element)
                .delete(elements::delete_element),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

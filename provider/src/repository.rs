//! サブモデルリポジトリ
//!
//! サブモデルをIDで保持する。各サブモデルは個別の`RwLock`の内側にあり、
//! 構造変更は1つずつ直列化され、読み取りは並行に行える。別のサブモデルへの
//! 操作は互いを待たない。

use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use twinreg_common::{
    error::{ModelError, ModelResult},
    identifier::Identifier,
    model::{Element, Submodel},
    result::OpResult,
};

type SharedSubmodel = Arc<RwLock<Submodel>>;

/// サブモデルリポジトリ
#[derive(Clone, Default)]
pub struct SubmodelRepository {
    submodels: Arc<RwLock<IndexMap<Identifier, SharedSubmodel>>>,
}

impl SubmodelRepository {
    /// 空のリポジトリを作成
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, id: &Identifier) -> ModelResult<SharedSubmodel> {
        self.submodels
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ModelError::NotFound(format!("submodel '{}'", id)))
    }

    /// サブモデルを追加（IDが既に存在すればConflict）
    pub async fn add_submodel(&self, submodel: Submodel) -> OpResult<Submodel> {
        if !submodel.id.is_valid() {
            return ModelError::InvalidArgument("submodel id must not be empty".into()).into();
        }
        let mut submodels = self.submodels.write().await;
        if submodels.contains_key(&submodel.id) {
            return ModelError::Conflict(submodel.id.to_string()).into();
        }
        info!(
            submodel_id = %submodel.id,
            elements = submodel.submodel_elements.len(),
            "Submodel added"
        );
        submodels.insert(submodel.id.clone(), Arc::new(RwLock::new(submodel.clone())));
        OpResult::ok(submodel)
    }

    /// サブモデルを取得
    pub async fn retrieve_submodel(&self, id: &Identifier) -> OpResult<Submodel> {
        match self.entry(id).await {
            Ok(shared) => OpResult::ok(shared.read().await.clone()),
            Err(err) => err.into(),
        }
    }

    /// 全サブモデルを取得
    pub async fn list_submodels(&self) -> OpResult<Vec<Submodel>> {
        let entries: Vec<SharedSubmodel> = self.submodels.read().await.values().cloned().collect();
        let mut submodels = Vec::with_capacity(entries.len());
        for shared in entries {
            submodels.push(shared.read().await.clone());
        }
        OpResult::ok(submodels)
    }

    /// サブモデルを削除
    pub async fn remove_submodel(&self, id: &Identifier) -> OpResult<()> {
        match self.submodels.write().await.shift_remove(id) {
            Some(_) => {
                info!(submodel_id = %id, "Submodel removed");
                OpResult::ok_empty()
            }
            None => ModelError::NotFound(format!("submodel '{}'", id)).into(),
        }
    }

    /// ルート直下の要素一覧
    pub async fn retrieve_elements(&self, id: &Identifier) -> OpResult<Vec<Element>> {
        self.read(id, |submodel| {
            OpResult::ok(submodel.elements().iter().cloned().collect())
        })
        .await
    }

    /// パスで要素を取得
    pub async fn retrieve_element(&self, id: &Identifier, path: &str) -> OpResult<Element> {
        self.read(id, |submodel| submodel.elements().retrieve(path)).await
    }

    /// 親パスの下に要素を作成（""はルート直下）
    pub async fn create_element(
        &self,
        id: &Identifier,
        parent_path: &str,
        element: Element,
    ) -> OpResult<Element> {
        self.write(id, |submodel| submodel.elements_mut().create_at(parent_path, element))
            .await
    }

    /// 既存要素を置き換え
    pub async fn update_element(
        &self,
        id: &Identifier,
        path: &str,
        element: Element,
    ) -> OpResult<Element> {
        self.write(id, |submodel| submodel.elements_mut().update(path, element))
            .await
    }

    /// 要素を作成または置き換え
    pub async fn create_or_update_element(
        &self,
        id: &Identifier,
        path: &str,
        element: Element,
    ) -> OpResult<Element> {
        self.write(id, |submodel| {
            submodel.elements_mut().create_or_update(path, element)
        })
        .await
    }

    /// 要素を部分木ごと削除
    pub async fn delete_element(&self, id: &Identifier, path: &str) -> OpResult<()> {
        self.write(id, |submodel| submodel.elements_mut().delete(path))
            .await
    }

    /// 要素の値のみを取得
    pub async fn retrieve_value(&self, id: &Identifier, path: &str) -> OpResult<Value> {
        self.read(id, |submodel| {
            submodel
                .elements()
                .resolve(path)
                .and_then(Element::value_only)
                .into()
        })
        .await
    }

    /// 要素の値のみを更新
    pub async fn update_value(&self, id: &Identifier, path: &str, value: Value) -> OpResult<()> {
        self.write(id, |submodel| {
            submodel
                .elements_mut()
                .resolve_mut(path)
                .and_then(|element| element.set_value_only(value))
                .into()
        })
        .await
    }

    async fn read<T>(
        &self,
        id: &Identifier,
        op: impl FnOnce(&Submodel) -> OpResult<T>,
    ) -> OpResult<T> {
        let shared = match self.entry(id).await {
            Ok(shared) => shared,
            Err(err) => return err.into(),
        };
        let submodel = shared.read().await;
        with_context(op(&*submodel), id)
    }

    async fn write<T>(
        &self,
        id: &Identifier,
        op: impl FnOnce(&mut Submodel) -> OpResult<T>,
    ) -> OpResult<T> {
        let shared = match self.entry(id).await {
            Ok(shared) => shared,
            Err(err) => return err.into(),
        };
        let mut submodel = shared.write().await;
        with_context(op(&mut *submodel), id)
    }
}

/// 失敗時にどのサブモデルでの操作かを追記する
fn with_context<T>(result: OpResult<T>, id: &Identifier) -> OpResult<T> {
    if result.success {
        result
    } else {
        result.wrap_failure(format!("operation on submodel '{}' failed", id))
    }
}

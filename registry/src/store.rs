//! レジストリストア
//!
//! シェルIDからシェルディスクリプタへのカタログ。シェルごとにサブモデル
//! ディスクリプタの入れ子カタログを持つ。メモリ内のみで管理する。

use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use twinreg_common::{
    descriptor::{ShellDescriptor, SubmodelDescriptor},
    error::{ModelError, ModelResult},
    identifier::Identifier,
    result::OpResult,
};

/// レジストリストアの契約
///
/// すべての操作は想定内の失敗（NotFound/Conflict等）を`OpResult`で返す。
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// 新規登録（IDが既に存在すればConflict）
    async fn create_registration(&self, descriptor: ShellDescriptor) -> OpResult<ShellDescriptor>;

    /// 既存登録の置き換え（存在しなければNotFound）
    async fn update_registration(
        &self,
        id: &Identifier,
        descriptor: ShellDescriptor,
    ) -> OpResult<ShellDescriptor>;

    /// 登録または置き換え（どちらが起きたかはメッセージで伝える）
    async fn create_or_update_registration(
        &self,
        id: &Identifier,
        descriptor: ShellDescriptor,
    ) -> OpResult<ShellDescriptor>;

    /// 登録を取得
    async fn retrieve_registration(&self, id: &Identifier) -> OpResult<ShellDescriptor>;

    /// 全登録を取得
    async fn retrieve_registrations(&self) -> OpResult<Vec<ShellDescriptor>>;

    /// 登録を削除（サブモデル登録は連動削除しない）
    async fn delete_registration(&self, id: &Identifier) -> OpResult<()>;

    /// サブモデルを新規登録
    async fn create_submodel_registration(
        &self,
        aas_id: &Identifier,
        descriptor: SubmodelDescriptor,
    ) -> OpResult<SubmodelDescriptor>;

    /// サブモデル登録を置き換え
    async fn update_submodel_registration(
        &self,
        aas_id: &Identifier,
        submodel_id: &Identifier,
        descriptor: SubmodelDescriptor,
    ) -> OpResult<SubmodelDescriptor>;

    /// サブモデルを登録または置き換え
    async fn create_or_update_submodel_registration(
        &self,
        aas_id: &Identifier,
        submodel_id: &Identifier,
        descriptor: SubmodelDescriptor,
    ) -> OpResult<SubmodelDescriptor>;

    /// サブモデル登録を取得
    async fn retrieve_submodel_registration(
        &self,
        aas_id: &Identifier,
        submodel_id: &Identifier,
    ) -> OpResult<SubmodelDescriptor>;

    /// シェル配下の全サブモデル登録を取得
    async fn retrieve_submodel_registrations(
        &self,
        aas_id: &Identifier,
    ) -> OpResult<Vec<SubmodelDescriptor>>;

    /// サブモデル登録を削除
    async fn delete_submodel_registration(
        &self,
        aas_id: &Identifier,
        submodel_id: &Identifier,
    ) -> OpResult<()>;
}

#[derive(Default)]
struct Catalog {
    /// `submodel_descriptors`は空にして保持し、取得時に組み立てる
    shells: HashMap<Identifier, ShellDescriptor>,
    submodels: HashMap<Identifier, IndexMap<Identifier, SubmodelDescriptor>>,
}

impl Catalog {
    fn assemble(&self, shell: &ShellDescriptor) -> ShellDescriptor {
        let mut assembled = shell.clone();
        assembled.submodel_descriptors = self
            .submodels
            .get(&shell.id)
            .map(|nested| nested.values().cloned().collect())
            .unwrap_or_default();
        assembled
    }

    /// シェル本体を格納し、内包するサブモデルを入れ子カタログへ移す
    fn store_shell(&mut self, mut descriptor: ShellDescriptor) -> ShellDescriptor {
        let nested = self.submodels.entry(descriptor.id.clone()).or_default();
        for submodel in descriptor.submodel_descriptors.drain(..) {
            nested.insert(submodel.id.clone(), submodel);
        }
        let id = descriptor.id.clone();
        self.shells.insert(id.clone(), descriptor);
        self.assemble(&self.shells[&id])
    }

    fn require_shell(&self, aas_id: &Identifier) -> ModelResult<()> {
        if self.shells.contains_key(aas_id) {
            Ok(())
        } else {
            Err(ModelError::NotFound(format!("shell descriptor '{}'", aas_id)))
        }
    }

    fn nested_mut(&mut self, aas_id: &Identifier) -> &mut IndexMap<Identifier, SubmodelDescriptor> {
        self.submodels.entry(aas_id.clone()).or_default()
    }
}

/// メモリ内レジストリ
///
/// カタログ全体を1つのロックで保護する。ロック保持中にawaitしないため、
/// 無関係なキーの操作が待たされるのはマップ操作1回分に限られる。
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryRegistry {
    /// 空のレジストリを作成
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate_id(id: &Identifier) -> ModelResult<()> {
    if id.is_valid() {
        Ok(())
    } else {
        Err(ModelError::InvalidArgument("identifier must not be empty".to_string()))
    }
}

fn ensure_same_id(path_id: &Identifier, body_id: &Identifier) -> ModelResult<()> {
    if path_id == body_id {
        Ok(())
    } else {
        Err(ModelError::InvalidArgument(format!(
            "identifier in body '{}' does not match '{}'",
            body_id, path_id
        )))
    }
}

#[async_trait]
impl RegistryStore for InMemoryRegistry {
    async fn create_registration(&self, descriptor: ShellDescriptor) -> OpResult<ShellDescriptor> {
        if let Err(err) = validate_id(&descriptor.id) {
            return err.into();
        }
        let mut catalog = self.catalog.write().await;
        if catalog.shells.contains_key(&descriptor.id) {
            debug!(aas_id = %descriptor.id, "Shell descriptor already registered");
            return ModelError::Conflict(descriptor.id.to_string()).into();
        }
        let id = descriptor.id.clone();
        let stored = catalog.store_shell(descriptor);
        info!(aas_id = %id, endpoints = stored.endpoints.len(), "Shell descriptor registered");
        OpResult::ok(stored)
    }

    async fn update_registration(
        &self,
        id: &Identifier,
        descriptor: ShellDescriptor,
    ) -> OpResult<ShellDescriptor> {
        if let Err(err) = ensure_same_id(id, &descriptor.id) {
            return err.into();
        }
        let mut catalog = self.catalog.write().await;
        if let Err(err) = catalog.require_shell(id) {
            return err.into();
        }
        let stored = catalog.store_shell(descriptor);
        info!(aas_id = %id, "Shell descriptor updated");
        OpResult::ok(stored)
    }

    async fn create_or_update_registration(
        &self,
        id: &Identifier,
        descriptor: ShellDescriptor,
    ) -> OpResult<ShellDescriptor> {
        if let Err(err) = validate_id(id).and_then(|_| ensure_same_id(id, &descriptor.id)) {
            return err.into();
        }
        let mut catalog = self.catalog.write().await;
        let existed = catalog.shells.contains_key(id);
        let stored = catalog.store_shell(descriptor);
        let branch = if existed { "updated" } else { "created" };
        info!(aas_id = %id, branch, "Shell descriptor upserted");
        OpResult::ok(stored).with_info(format!("Shell descriptor '{}' {}", id, branch))
    }

    async fn retrieve_registration(&self, id: &Identifier) -> OpResult<ShellDescriptor> {
        let catalog = self.catalog.read().await;
        match catalog.shells.get(id) {
            Some(shell) => OpResult::ok(catalog.assemble(shell)),
            None => ModelError::NotFound(format!("shell descriptor '{}'", id)).into(),
        }
    }

    async fn retrieve_registrations(&self) -> OpResult<Vec<ShellDescriptor>> {
        let catalog = self.catalog.read().await;
        let mut shells: Vec<ShellDescriptor> =
            catalog.shells.values().map(|s| catalog.assemble(s)).collect();
        shells.sort_by(|a, b| a.id.cmp(&b.id));
        OpResult::ok(shells)
    }

    async fn delete_registration(&self, id: &Identifier) -> OpResult<()> {
        let mut catalog = self.catalog.write().await;
        match catalog.shells.remove(id) {
            Some(_) => {
                info!(aas_id = %id, "Shell descriptor deleted");
                OpResult::ok_empty()
            }
            None => ModelError::NotFound(format!("shell descriptor '{}'", id)).into(),
        }
    }

    async fn create_submodel_registration(
        &self,
        aas_id: &Identifier,
        descriptor: SubmodelDescriptor,
    ) -> OpResult<SubmodelDescriptor> {
        if let Err(err) = validate_id(&descriptor.id) {
            return err.into();
        }
        let mut catalog = self.catalog.write().await;
        if let Err(err) = catalog.require_shell(aas_id) {
            return err.into();
        }
        let nested = catalog.nested_mut(aas_id);
        if nested.contains_key(&descriptor.id) {
            return ModelError::Conflict(descriptor.id.to_string()).into();
        }
        info!(aas_id = %aas_id, submodel_id = %descriptor.id, "Submodel descriptor registered");
        nested.insert(descriptor.id.clone(), descriptor.clone());
        OpResult::ok(descriptor)
    }

    async fn update_submodel_registration(
        &self,
        aas_id: &Identifier,
        submodel_id: &Identifier,
        descriptor: SubmodelDescriptor,
    ) -> OpResult<SubmodelDescriptor> {
        if let Err(err) = ensure_same_id(submodel_id, &descriptor.id) {
            return err.into();
        }
        let mut catalog = self.catalog.write().await;
        if let Err(err) = catalog.require_shell(aas_id) {
            return err.into();
        }
        match catalog.nested_mut(aas_id).get_mut(submodel_id) {
            Some(slot) => {
                *slot = descriptor.clone();
                info!(aas_id = %aas_id, submodel_id = %submodel_id, "Submodel descriptor updated");
                OpResult::ok(descriptor)
            }
            None => ModelError::NotFound(format!("submodel descriptor '{}'", submodel_id)).into(),
        }
    }

    async fn create_or_update_submodel_registration(
        &self,
        aas_id: &Identifier,
        submodel_id: &Identifier,
        descriptor: SubmodelDescriptor,
    ) -> OpResult<SubmodelDescriptor> {
        if let Err(err) =
            validate_id(submodel_id).and_then(|_| ensure_same_id(submodel_id, &descriptor.id))
        {
            return err.into();
        }
        let mut catalog = self.catalog.write().await;
        if let Err(err) = catalog.require_shell(aas_id) {
            return err.into();
        }
        let existed = catalog
            .nested_mut(aas_id)
            .insert(submodel_id.clone(), descriptor.clone())
            .is_some();
        let branch = if existed { "updated" } else { "created" };
        info!(aas_id = %aas_id, submodel_id = %submodel_id, branch, "Submodel descriptor upserted");
        OpResult::ok(descriptor)
            .with_info(format!("Submodel descriptor '{}' {}", submodel_id, branch))
    }

    async fn retrieve_submodel_registration(
        &self,
        aas_id: &Identifier,
        submodel_id: &Identifier,
    ) -> OpResult<SubmodelDescriptor> {
        let catalog = self.catalog.read().await;
        if let Err(err) = catalog.require_shell(aas_id) {
            return err.into();
        }
        catalog
            .submodels
            .get(aas_id)
            .and_then(|nested| nested.get(submodel_id))
            .cloned()
            .ok_or_else(|| ModelError::NotFound(format!("submodel descriptor '{}'", submodel_id)))
            .into()
    }

    async fn retrieve_submodel_registrations(
        &self,
        aas_id: &Identifier,
    ) -> OpResult<Vec<SubmodelDescriptor>> {
        let catalog = self.catalog.read().await;
        if let Err(err) = catalog.require_shell(aas_id) {
            return err.into();
        }
        let submodels = catalog
            .submodels
            .get(aas_id)
            .map(|nested| nested.values().cloned().collect())
            .unwrap_or_default();
        OpResult::ok(submodels)
    }

    async fn delete_submodel_registration(
        &self,
        aas_id: &Identifier,
        submodel_id: &Identifier,
    ) -> OpResult<()> {
        let mut catalog = self.catalog.write().await;
        if let Err(err) = catalog.require_shell(aas_id) {
            return err.into();
        }
        match catalog.nested_mut(aas_id).shift_remove(submodel_id) {
            Some(_) => {
                info!(aas_id = %aas_id, submodel_id = %submodel_id, "Submodel descriptor deleted");
                OpResult::ok_empty()
            }
            None => ModelError::NotFound(format!("submodel descriptor '{}'", submodel_id)).into(),
        }
    }
}

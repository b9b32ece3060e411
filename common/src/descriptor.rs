//! サービスディスクリプタ
//!
//! 公開された要素ツリーの到達先（エンドポイント）とメタデータ。
//! シェル（AAS）ディスクリプタはサブモデルディスクリプタを内包する。

use crate::identifier::{Identifier, Reference};
use crate::model::{AdministrativeInformation, LangString};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// エンドポイント
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// 論理インターフェース名（例: "SUBMODEL-3.0"）
    pub interface: String,
    /// アドレス（スキームは解釈しない）
    pub address: String,
    /// プロトコル（例: "http"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

impl Endpoint {
    /// エンドポイントを作成
    pub fn new(interface: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            address: address.into(),
            protocol: None,
        }
    }

    /// プロトコルを設定
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }
}

/// アドレスで重複排除されたエンドポイント集合
///
/// 同じアドレスの追加はインターフェース名が異なっても重複とみなし、
/// 先に登録されたものを残す。JSONでは配列として表現する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    by_address: IndexMap<String, Endpoint>,
}

impl Endpoints {
    /// 空の集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加（新規なら`true`、既存アドレスなら何もせず`false`）
    pub fn add(&mut self, endpoint: Endpoint) -> bool {
        if self.by_address.contains_key(&endpoint.address) {
            return false;
        }
        self.by_address.insert(endpoint.address.clone(), endpoint);
        true
    }

    /// アドレスで削除（存在しなくてもエラーにしない）
    pub fn remove(&mut self, address: &str) -> Option<Endpoint> {
        self.by_address.shift_remove(address)
    }

    /// アドレスが登録済みか
    pub fn contains(&self, address: &str) -> bool {
        self.by_address.contains_key(address)
    }

    /// アドレスで取得
    pub fn get(&self, address: &str) -> Option<&Endpoint> {
        self.by_address.get(address)
    }

    /// 登録順に列挙
    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.by_address.values()
    }

    /// 件数
    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    /// 空か
    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}

impl FromIterator<Endpoint> for Endpoints {
    fn from_iter<I: IntoIterator<Item = Endpoint>>(iter: I) -> Self {
        let mut endpoints = Self::new();
        for endpoint in iter {
            endpoints.add(endpoint);
        }
        endpoints
    }
}

impl Serialize for Endpoints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for Endpoints {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let list = Vec::<Endpoint>::deserialize(deserializer)?;
        Ok(list.into_iter().collect())
    }
}

/// サブモデルディスクリプタ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmodelDescriptor {
    /// サブモデルID
    pub id: Identifier,
    /// ローカル名
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id_short: String,
    /// 説明
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<LangString>,
    /// 版情報
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administration: Option<AdministrativeInformation>,
    /// セマンティックID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_id: Option<Reference>,
    /// エンドポイント
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl SubmodelDescriptor {
    /// エンドポイントなしのディスクリプタ
    pub fn new(id: impl Into<Identifier>, id_short: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            id_short: id_short.into(),
            description: Vec::new(),
            administration: None,
            semantic_id: None,
            endpoints: Endpoints::new(),
        }
    }

    /// エンドポイントを追加して返す
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.add(endpoint);
        self
    }
}

/// シェル（AAS）ディスクリプタ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShellDescriptor {
    /// シェルID
    pub id: Identifier,
    /// ローカル名
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id_short: String,
    /// 説明
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<LangString>,
    /// 版情報
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administration: Option<AdministrativeInformation>,
    /// アセットID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_asset_id: Option<String>,
    /// エンドポイント
    #[serde(default)]
    pub endpoints: Endpoints,
    /// 内包するサブモデルディスクリプタ
    #[serde(default)]
    pub submodel_descriptors: Vec<SubmodelDescriptor>,
}

impl ShellDescriptor {
    /// 空のディスクリプタ
    pub fn new(id: impl Into<Identifier>, id_short: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            id_short: id_short.into(),
            description: Vec::new(),
            administration: None,
            global_asset_id: None,
            endpoints: Endpoints::new(),
            submodel_descriptors: Vec::new(),
        }
    }

    /// エンドポイントを追加して返す
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.add(endpoint);
        self
    }

    /// サブモデルディスクリプタを追加して返す（同じIDは置き換え）
    pub fn with_submodel(mut self, descriptor: SubmodelDescriptor) -> Self {
        self.upsert_submodel(descriptor);
        self
    }

    /// サブモデルディスクリプタを追加または置き換える
    pub fn upsert_submodel(&mut self, descriptor: SubmodelDescriptor) {
        match self
            .submodel_descriptors
            .iter_mut()
            .find(|d| d.id == descriptor.id)
        {
            Some(existing) => *existing = descriptor,
            None => self.submodel_descriptors.push(descriptor),
        }
    }
}

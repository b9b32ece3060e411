//! サブモデル
//!
//! グローバルIDを持つ要素ツリーのルート。

use super::container::ElementContainer;
use super::element::Element;
use super::meta::{AdministrativeInformation, LangString, ModelingKind, Qualifier};
use crate::error::ModelResult;
use crate::identifier::{Identifier, Reference};
use serde::{Deserialize, Serialize};

/// サブモデル
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submodel {
    /// グローバルID
    pub id: Identifier,
    /// ローカル名
    #[serde(default)]
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
    /// テンプレート/インスタンス
    #[serde(default)]
    pub kind: ModelingKind,
    /// 修飾子
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<Qualifier>,
    /// ルート要素コンテナ
    #[serde(default)]
    pub submodel_elements: ElementContainer,
}

impl Submodel {
    /// 要素を持たないサブモデル
    pub fn new(id: impl Into<Identifier>, id_short: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            id_short: id_short.into(),
            description: Vec::new(),
            administration: None,
            semantic_id: None,
            kind: ModelingKind::default(),
            qualifiers: Vec::new(),
            submodel_elements: ElementContainer::new(),
        }
    }

    /// ルート直下に要素を追加したサブモデルを返す
    pub fn with_elements(
        mut self,
        elements: impl IntoIterator<Item = Element>,
    ) -> ModelResult<Self> {
        for element in elements {
            self.submodel_elements.insert_child(element)?;
        }
        Ok(self)
    }

    /// 版情報を設定
    pub fn with_administration(mut self, administration: AdministrativeInformation) -> Self {
        self.administration = Some(administration);
        self
    }

    /// ルート要素コンテナ
    pub fn elements(&self) -> &ElementContainer {
        &self.submodel_elements
    }

    /// ルート要素コンテナ（可変）
    pub fn elements_mut(&mut self) -> &mut ElementContainer {
        &mut self.submodel_elements
    }
}

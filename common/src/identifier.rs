//! 識別子と参照
//!
//! Identifier（グローバル一意ID）、Key、Reference（キー列による参照）

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// グローバル一意な不透明ID
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// 新しい識別子を作成
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 文字列として参照
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 空白のみ・空文字でないか
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// キー種別
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum KeyType {
    AnnotatedRelationshipElement,
    AssetAdministrationShell,
    BasicEventElement,
    Blob,
    Capability,
    ConceptDescription,
    DataElement,
    Entity,
    EventElement,
    File,
    FragmentReference,
    GlobalReference,
    Identifiable,
    MultiLanguageProperty,
    Operation,
    Property,
    Range,
    Referable,
    ReferenceElement,
    RelationshipElement,
    Submodel,
    SubmodelElement,
    SubmodelElementCollection,
    SubmodelElementList,
}

/// 参照を構成するキー（種別, 値）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Key {
    /// キー種別
    #[serde(rename = "type")]
    pub key_type: KeyType,
    /// キー値
    pub value: String,
}

impl Key {
    /// 新しいキーを作成
    pub fn new(key_type: KeyType, value: impl Into<String>) -> Self {
        Self {
            key_type,
            value: value.into(),
        }
    }
}

/// 参照種別
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ReferenceType {
    /// モデル内要素への参照
    #[default]
    ModelReference,
    /// 外部（グローバル）参照
    ExternalReference,
}

/// 順序付きキー列による参照
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// 参照種別
    #[serde(rename = "type")]
    pub reference_type: ReferenceType,
    /// キー列
    pub keys: Vec<Key>,
    /// 参照先のセマンティックID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referred_semantic_id: Option<Box<Reference>>,
}

impl Reference {
    /// 単一キーの外部参照（semanticId等）
    pub fn external(value: impl Into<String>) -> Self {
        Self {
            reference_type: ReferenceType::ExternalReference,
            keys: vec![Key::new(KeyType::GlobalReference, value)],
            referred_semantic_id: None,
        }
    }

    /// モデル参照
    pub fn model(keys: Vec<Key>) -> Self {
        Self {
            reference_type: ReferenceType::ModelReference,
            keys,
            referred_semantic_id: None,
        }
    }

    /// 先頭キー
    pub fn first_key(&self) -> Option<&Key> {
        self.keys.first()
    }

    /// 末尾キー（参照先そのもの）
    pub fn last_key(&self) -> Option<&Key> {
        self.keys.last()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .keys
            .iter()
            .map(|k| format!("({:?}){}", k.key_type, k.value))
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&rendered)
    }
}

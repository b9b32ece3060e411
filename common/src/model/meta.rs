//! 要素・Identifiableに共通するメタ情報

use crate::identifier::Reference;
use serde::{Deserialize, Serialize};

/// 多言語テキスト
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LangString {
    /// 言語タグ（例: "en", "ja"）
    pub language: String,
    /// テキスト
    pub text: String,
}

impl LangString {
    /// 新しい多言語テキストを作成
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

/// 管理情報（バージョン/リビジョン）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AdministrativeInformation {
    /// バージョン
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// リビジョン
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

/// モデリング種別
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ModelingKind {
    /// テンプレート
    Template,
    /// インスタンス
    #[default]
    Instance,
}

/// 修飾子
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Qualifier {
    /// 修飾子の種類
    #[serde(rename = "type")]
    pub qualifier_type: String,
    /// 値のデータ型（xs:string等）
    pub value_type: String,
    /// 値
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// セマンティックID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_id: Option<Reference>,
}

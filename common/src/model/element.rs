//! 要素（SubmodelElement）
//!
//! 閉じたタグ付き共用体`ElementValue`で14種類の要素を表現する。
//! ワイヤ上の`modelType`タグから`ModelType`→コンストラクタへ直接ディスパッチするため、
//! 型名文字列によるリフレクションは不要。

use super::container::ElementContainer;
use super::meta::{LangString, ModelingKind, Qualifier};
use crate::error::{ModelError, ModelResult};
use crate::identifier::Reference;
use crate::result::OpResult;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// 要素の型タグ
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ModelType {
    /// 単一値プロパティ
    Property,
    /// 範囲
    Range,
    /// ファイル参照
    File,
    /// バイナリ
    Blob,
    /// 参照要素
    ReferenceElement,
    /// 関係
    RelationshipElement,
    /// 注釈付き関係
    AnnotatedRelationshipElement,
    /// 能力
    Capability,
    /// イベント
    BasicEventElement,
    /// エンティティ
    Entity,
    /// 操作
    Operation,
    /// コレクション（idShortでキー付け）
    SubmodelElementCollection,
    /// リスト（位置でキー付け）
    SubmodelElementList,
    /// 多言語プロパティ
    MultiLanguageProperty,
}

impl ModelType {
    /// 全ての型タグ
    pub const ALL: [ModelType; 14] = [
        Self::Property,
        Self::Range,
        Self::File,
        Self::Blob,
        Self::ReferenceElement,
        Self::RelationshipElement,
        Self::AnnotatedRelationshipElement,
        Self::Capability,
        Self::BasicEventElement,
        Self::Entity,
        Self::Operation,
        Self::SubmodelElementCollection,
        Self::SubmodelElementList,
        Self::MultiLanguageProperty,
    ];

    /// ワイヤ上のタグ文字列
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Property => "Property",
            Self::Range => "Range",
            Self::File => "File",
            Self::Blob => "Blob",
            Self::ReferenceElement => "ReferenceElement",
            Self::RelationshipElement => "RelationshipElement",
            Self::AnnotatedRelationshipElement => "AnnotatedRelationshipElement",
            Self::Capability => "Capability",
            Self::BasicEventElement => "BasicEventElement",
            Self::Entity => "Entity",
            Self::Operation => "Operation",
            Self::SubmodelElementCollection => "SubmodelElementCollection",
            Self::SubmodelElementList => "SubmodelElementList",
            Self::MultiLanguageProperty => "MultiLanguageProperty",
        }
    }

    /// 子要素を持てる型か
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Self::SubmodelElementCollection
                | Self::SubmodelElementList
                | Self::Entity
                | Self::AnnotatedRelationshipElement
        )
    }

    /// 型タグから空の値を生成する（ファクトリ）
    pub fn instantiate(self) -> ElementValue {
        match self {
            Self::Property => ElementValue::Property(Property::default()),
            Self::Range => ElementValue::Range(Range::default()),
            Self::File => ElementValue::File(File::default()),
            Self::Blob => ElementValue::Blob(Blob::default()),
            Self::ReferenceElement => ElementValue::ReferenceElement(ReferenceElement::default()),
            Self::RelationshipElement => {
                ElementValue::RelationshipElement(RelationshipElement::default())
            }
            Self::AnnotatedRelationshipElement => {
                ElementValue::AnnotatedRelationshipElement(AnnotatedRelationshipElement::default())
            }
            Self::Capability => ElementValue::Capability(Capability::default()),
            Self::BasicEventElement => ElementValue::BasicEventElement(BasicEvent::default()),
            Self::Entity => ElementValue::Entity(Entity::default()),
            Self::Operation => ElementValue::Operation(Operation::default()),
            Self::SubmodelElementCollection => {
                ElementValue::SubmodelElementCollection(Collection::default())
            }
            Self::SubmodelElementList => ElementValue::SubmodelElementList(ElementList::default()),
            Self::MultiLanguageProperty => {
                ElementValue::MultiLanguageProperty(MultiLanguageProperty::default())
            }
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::InvalidArgument(format!("unknown modelType '{}'", s)))
    }
}

/// 単一値プロパティ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// 値のデータ型
    #[serde(default = "default_value_type")]
    pub value_type: String,
    /// 値
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// 値のセマンティックID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_id: Option<Reference>,
}

impl Default for Property {
    fn default() -> Self {
        Self {
            value_type: default_value_type(),
            value: None,
            value_id: None,
        }
    }
}

fn default_value_type() -> String {
    "xs:string".to_string()
}

/// 範囲
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    /// 値のデータ型
    #[serde(default = "default_value_type")]
    pub value_type: String,
    /// 下限
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    /// 上限
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

impl Default for Range {
    fn default() -> Self {
        Self {
            value_type: default_value_type(),
            min: None,
            max: None,
        }
    }
}

/// ファイル参照
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// MIMEタイプ
    #[serde(default)]
    pub content_type: String,
    /// パスまたはURI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// バイナリ（ワイヤ上はBase64）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// MIMEタイプ
    #[serde(default)]
    pub content_type: String,
    /// 内容
    #[serde(default, with = "base64_bytes")]
    pub value: Vec<u8>,
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// 参照要素
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReferenceElement {
    /// 参照先
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Reference>,
}

/// 関係
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RelationshipElement {
    /// 関係の第一要素
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<Reference>,
    /// 関係の第二要素
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<Reference>,
}

/// 注釈付き関係
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AnnotatedRelationshipElement {
    /// 関係の第一要素
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<Reference>,
    /// 関係の第二要素
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<Reference>,
    /// 注釈
    #[serde(default)]
    pub annotations: ElementContainer,
}

/// 能力
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Capability {}

/// イベント
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BasicEvent {
    /// 監視対象
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed: Option<Reference>,
}

/// エンティティ種別
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EntityType {
    /// 共同管理エンティティ
    #[default]
    CoManagedEntity,
    /// 自己管理エンティティ
    SelfManagedEntity,
}

/// エンティティ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// 種別
    #[serde(default)]
    pub entity_type: EntityType,
    /// アセットID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_asset_id: Option<String>,
    /// ステートメント（子要素）
    #[serde(default)]
    pub statements: ElementContainer,
}

/// 操作の入出力変数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationVariable {
    /// 変数の型を表す要素
    pub value: Element,
}

/// 操作
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// 入力変数
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_variables: Vec<OperationVariable>,
    /// 出力変数
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_variables: Vec<OperationVariable>,
    /// 入出力変数
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inoutput_variables: Vec<OperationVariable>,
}

/// コレクション
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Collection {
    /// 子要素
    #[serde(default)]
    pub value: ElementContainer,
}

/// リスト
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementList {
    /// 順序に意味があるか
    #[serde(default = "default_true")]
    pub order_relevant: bool,
    /// 要素の型
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_value_list_element: Option<ModelType>,
    /// 子要素（位置でアクセス）
    #[serde(
        default = "ElementContainer::positional",
        deserialize_with = "ElementContainer::deserialize_positional"
    )]
    pub value: ElementContainer,
}

impl Default for ElementList {
    fn default() -> Self {
        Self {
            order_relevant: true,
            type_value_list_element: None,
            value: ElementContainer::positional(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// 多言語プロパティ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MultiLanguageProperty {
    /// 言語ごとの値
    #[serde(default)]
    pub value: Vec<LangString>,
}

/// 型タグ付きの要素本体
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "modelType")]
pub enum ElementValue {
    Property(Property),
    Range(Range),
    File(File),
    Blob(Blob),
    ReferenceElement(ReferenceElement),
    RelationshipElement(RelationshipElement),
    AnnotatedRelationshipElement(AnnotatedRelationshipElement),
    Capability(Capability),
    BasicEventElement(BasicEvent),
    Entity(Entity),
    Operation(Operation),
    SubmodelElementCollection(Collection),
    SubmodelElementList(ElementList),
    MultiLanguageProperty(MultiLanguageProperty),
}

impl ElementValue {
    /// 型タグ
    pub fn model_type(&self) -> ModelType {
        match self {
            Self::Property(_) => ModelType::Property,
            Self::Range(_) => ModelType::Range,
            Self::File(_) => ModelType::File,
            Self::Blob(_) => ModelType::Blob,
            Self::ReferenceElement(_) => ModelType::ReferenceElement,
            Self::RelationshipElement(_) => ModelType::RelationshipElement,
            Self::AnnotatedRelationshipElement(_) => ModelType::AnnotatedRelationshipElement,
            Self::Capability(_) => ModelType::Capability,
            Self::BasicEventElement(_) => ModelType::BasicEventElement,
            Self::Entity(_) => ModelType::Entity,
            Self::Operation(_) => ModelType::Operation,
            Self::SubmodelElementCollection(_) => ModelType::SubmodelElementCollection,
            Self::SubmodelElementList(_) => ModelType::SubmodelElementList,
            Self::MultiLanguageProperty(_) => ModelType::MultiLanguageProperty,
        }
    }
}

/// `retrieve_as`で要求できる具象型
pub trait ElementKind: Clone {
    /// 対応する型タグ
    const MODEL_TYPE: ModelType;

    /// 値から具象型を取り出す
    fn from_value(value: &ElementValue) -> Option<&Self>;

    /// 値から具象型を可変で取り出す
    fn from_value_mut(value: &mut ElementValue) -> Option<&mut Self>;
}

macro_rules! element_kind {
    ($ty:ty, $variant:ident) => {
        impl ElementKind for $ty {
            const MODEL_TYPE: ModelType = ModelType::$variant;

            fn from_value(value: &ElementValue) -> Option<&Self> {
                match value {
                    ElementValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_value_mut(value: &mut ElementValue) -> Option<&mut Self> {
                match value {
                    ElementValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for ElementValue {
            fn from(inner: $ty) -> Self {
                ElementValue::$variant(inner)
            }
        }
    };
}

element_kind!(Property, Property);
element_kind!(Range, Range);
element_kind!(File, File);
element_kind!(Blob, Blob);
element_kind!(ReferenceElement, ReferenceElement);
element_kind!(RelationshipElement, RelationshipElement);
element_kind!(AnnotatedRelationshipElement, AnnotatedRelationshipElement);
element_kind!(Capability, Capability);
element_kind!(BasicEvent, BasicEventElement);
element_kind!(Entity, Entity);
element_kind!(Operation, Operation);
element_kind!(Collection, SubmodelElementCollection);
element_kind!(ElementList, SubmodelElementList);
element_kind!(MultiLanguageProperty, MultiLanguageProperty);

/// 要素
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// 兄弟間で一意なローカル名（リストの子のみ空を許可）
    #[serde(default)]
    pub id_short: String,
    /// カテゴリ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// 説明
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<LangString>,
    /// セマンティックID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_id: Option<Reference>,
    /// 修飾子
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<Qualifier>,
    /// テンプレート/インスタンス
    #[serde(default)]
    pub kind: ModelingKind,
    /// 型タグ付き本体
    #[serde(flatten)]
    pub value: ElementValue,
}

impl Element {
    /// 型タグから空の要素を作成
    pub fn new(id_short: impl Into<String>, model_type: ModelType) -> Self {
        Self::with_value(id_short, model_type.instantiate())
    }

    /// 本体を指定して要素を作成
    pub fn with_value(id_short: impl Into<String>, value: impl Into<ElementValue>) -> Self {
        Self {
            id_short: id_short.into(),
            category: None,
            description: Vec::new(),
            semantic_id: None,
            qualifiers: Vec::new(),
            kind: ModelingKind::Instance,
            value: value.into(),
        }
    }

    /// 文字列プロパティ
    pub fn property(id_short: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_value(
            id_short,
            Property {
                value: Some(value.into()),
                ..Property::default()
            },
        )
    }

    /// 子要素を持つコレクション
    ///
    /// 子要素のidShortが重複する場合はConflictを返す。
    pub fn collection(
        id_short: impl Into<String>,
        children: impl IntoIterator<Item = Element>,
    ) -> ModelResult<Self> {
        let value = ElementContainer::from_elements(children)?;
        Ok(Self::with_value(id_short, Collection { value }))
    }

    /// 位置でアクセスするリスト
    pub fn list(id_short: impl Into<String>, items: impl IntoIterator<Item = Element>) -> Self {
        Self::with_value(
            id_short,
            ElementList {
                value: ElementContainer::from_items(items),
                ..ElementList::default()
            },
        )
    }

    /// セマンティックIDを設定
    pub fn with_semantic_id(mut self, semantic_id: Reference) -> Self {
        self.semantic_id = Some(semantic_id);
        self
    }

    /// 型タグ
    pub fn model_type(&self) -> ModelType {
        self.value.model_type()
    }

    /// 具象型として参照
    pub fn downcast<T: ElementKind>(&self) -> Option<&T> {
        T::from_value(&self.value)
    }

    /// 具象型として可変参照
    pub fn downcast_mut<T: ElementKind>(&mut self) -> Option<&mut T> {
        T::from_value_mut(&mut self.value)
    }

    /// 子要素コンテナ（コレクション・リスト・エンティティ・注釈付き関係）
    pub fn children(&self) -> Option<&ElementContainer> {
        match &self.value {
            ElementValue::SubmodelElementCollection(c) => Some(&c.value),
            ElementValue::SubmodelElementList(l) => Some(&l.value),
            ElementValue::Entity(e) => Some(&e.statements),
            ElementValue::AnnotatedRelationshipElement(a) => Some(&a.annotations),
            _ => None,
        }
    }

    /// 子要素コンテナを可変で参照
    pub fn children_mut(&mut self) -> Option<&mut ElementContainer> {
        match &mut self.value {
            ElementValue::SubmodelElementCollection(c) => Some(&mut c.value),
            ElementValue::SubmodelElementList(l) => Some(&mut l.value),
            ElementValue::Entity(e) => Some(&mut e.statements),
            ElementValue::AnnotatedRelationshipElement(a) => Some(&mut a.annotations),
            _ => None,
        }
    }

    /// この要素を起点にパスを解決する
    pub fn retrieve(&self, path: &str) -> OpResult<Element> {
        match self.children() {
            Some(children) => children.retrieve(path),
            None => ModelError::NotFound(format!(
                "{}/{} ({} has no children)",
                self.id_short,
                path.trim_start_matches('/'),
                self.model_type()
            ))
            .into(),
        }
    }

    /// 値のみの表現（Property/Range/File/MultiLanguageProperty/ReferenceElement）
    pub fn value_only(&self) -> ModelResult<Value> {
        match &self.value {
            ElementValue::Property(p) => Ok(json!(p.value)),
            ElementValue::Range(r) => Ok(json!({ "min": r.min, "max": r.max })),
            ElementValue::File(f) => Ok(json!(f.value)),
            ElementValue::MultiLanguageProperty(m) => {
                serde_json::to_value(&m.value).map_err(|e| ModelError::Unexpected(e.to_string()))
            }
            ElementValue::ReferenceElement(r) => {
                serde_json::to_value(&r.value).map_err(|e| ModelError::Unexpected(e.to_string()))
            }
            _ => Err(self.value_mismatch()),
        }
    }

    /// 値のみを更新する
    pub fn set_value_only(&mut self, value: Value) -> ModelResult<()> {
        let invalid = |e: serde_json::Error| ModelError::InvalidArgument(e.to_string());
        let mismatch = self.value_mismatch();
        match &mut self.value {
            ElementValue::Property(p) => {
                p.value = scalar_to_string(value)?;
            }
            ElementValue::Range(r) => {
                let bounds: RangeValue = serde_json::from_value(value).map_err(invalid)?;
                r.min = scalar_to_string(bounds.min)?;
                r.max = scalar_to_string(bounds.max)?;
            }
            ElementValue::File(f) => {
                f.value = scalar_to_string(value)?;
            }
            ElementValue::MultiLanguageProperty(m) => {
                m.value = serde_json::from_value(value).map_err(invalid)?;
            }
            ElementValue::ReferenceElement(r) => {
                r.value = serde_json::from_value(value).map_err(invalid)?;
            }
            _ => return Err(mismatch),
        }
        Ok(())
    }

    fn value_mismatch(&self) -> ModelError {
        ModelError::TypeMismatch {
            path: self.id_short.clone(),
            expected: "value-bearing element".to_string(),
            actual: self.model_type().to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RangeValue {
    #[serde(default)]
    min: Value,
    #[serde(default)]
    max: Value,
}

/// JSONスカラーを文字列値に変換する（数値・真偽値も受け付ける）
fn scalar_to_string(value: Value) -> ModelResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(ModelError::InvalidArgument(format!(
            "expected a scalar value, got {}",
            other
        ))),
    }
}

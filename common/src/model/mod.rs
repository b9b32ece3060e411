//! 要素ツリー
//!
//! 型付き要素・子要素コンテナ・サブモデル。

pub mod container;
pub mod element;
pub mod meta;
pub mod submodel;

pub use container::ElementContainer;
pub use element::{
    AnnotatedRelationshipElement, BasicEvent, Blob, Capability, Collection, Element,
    ElementKind, ElementList, ElementValue, Entity, EntityType, File, ModelType,
    MultiLanguageProperty, Operation, OperationVariable, Property, Range, ReferenceElement,
    RelationshipElement,
};
pub use meta::{AdministrativeInformation, LangString, ModelingKind, Qualifier};
pub use submodel::Submodel;

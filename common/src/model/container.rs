//! 要素コンテナ
//!
//! idShortをキーとする子要素の集合。リスト（位置アクセス）では空のidShortを許可する。
//!
//! パス解決は"/"区切りのトークンを左から1段ずつ下る反復処理で、各段は
//! idShortインデックス（`IndexMap`）によりO(1)で引ける。途中で解決できない
//! トークンがあれば、部分一致ではなくNotFoundを返す。
//!
//! 子要素は親が所有する（追加で所有権が移る）。パスは親への逆参照を持たず、
//! 走査時にルートから組み立てる。

use super::element::{Element, ElementKind};
use crate::error::{ModelError, ModelResult};
use crate::result::OpResult;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq)]
enum Children {
    Keyed(IndexMap<String, Element>),
    Positional(Vec<Element>),
}

/// 子要素コンテナ
#[derive(Debug, Clone, PartialEq)]
pub struct ElementContainer {
    children: Children,
}

impl Default for ElementContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementContainer {
    /// idShortでキー付けされた空のコンテナ
    pub fn new() -> Self {
        Self {
            children: Children::Keyed(IndexMap::new()),
        }
    }

    /// 位置でアクセスする空のコンテナ（リスト用）
    pub fn positional() -> Self {
        Self {
            children: Children::Positional(Vec::new()),
        }
    }

    /// 要素列からキー付きコンテナを構築する（idShort重複はConflict）
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> ModelResult<Self> {
        let mut container = Self::new();
        for element in elements {
            container.insert_child(element)?;
        }
        Ok(container)
    }

    /// 要素列から位置アクセスのコンテナを構築する
    pub fn from_items(items: impl IntoIterator<Item = Element>) -> Self {
        Self {
            children: Children::Positional(items.into_iter().collect()),
        }
    }

    /// 位置アクセスのコンテナか
    pub fn is_positional(&self) -> bool {
        matches!(self.children, Children::Positional(_))
    }

    /// 直下の子要素数
    pub fn len(&self) -> usize {
        match &self.children {
            Children::Keyed(map) => map.len(),
            Children::Positional(items) => items.len(),
        }
    }

    /// 子要素がないか
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 直下の子要素を順に返す
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Element> + '_> {
        match &self.children {
            Children::Keyed(map) => Box::new(map.values()),
            Children::Positional(items) => Box::new(items.iter()),
        }
    }

    // ------------------------------------------------------------------
    // 直下の子要素
    // ------------------------------------------------------------------

    /// 直下の子要素を取得（存在しなくてもエラーにしない）
    ///
    /// 位置アクセスのコンテナでは数値トークンをインデックスとして扱う。
    pub fn get_child(&self, token: &str) -> Option<&Element> {
        match &self.children {
            Children::Keyed(map) => map.get(token),
            Children::Positional(items) => {
                position_of(items, token).and_then(|index| items.get(index))
            }
        }
    }

    /// 直下の子要素を可変で取得
    pub fn get_child_mut(&mut self, token: &str) -> Option<&mut Element> {
        match &mut self.children {
            Children::Keyed(map) => map.get_mut(token),
            Children::Positional(items) => {
                position_of(items, token).and_then(move |index| items.get_mut(index))
            }
        }
    }

    /// 直下に子要素が存在するか
    pub fn has_child(&self, token: &str) -> bool {
        self.get_child(token).is_some()
    }

    /// パスが解決できるか
    pub fn has_child_path(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }

    /// 直下に要素を追加する
    ///
    /// キー付きコンテナではidShortが空または重複する場合に失敗する。
    /// 位置アクセスのコンテナでは常に末尾へ追加する。
    pub fn insert_child(&mut self, element: Element) -> ModelResult<&Element> {
        match &mut self.children {
            Children::Keyed(map) => {
                if element.id_short.is_empty() {
                    return Err(ModelError::InvalidArgument(
                        "idShort must not be empty outside of a list".to_string(),
                    ));
                }
                if map.contains_key(&element.id_short) {
                    return Err(ModelError::Conflict(element.id_short));
                }
                let (index, _) = map.insert_full(element.id_short.clone(), element);
                map.get_index(index)
                    .map(|(_, e)| e)
                    .ok_or_else(|| ModelError::Unexpected("inserted element vanished".into()))
            }
            Children::Positional(items) => {
                items.push(element);
                items
                    .last()
                    .ok_or_else(|| ModelError::Unexpected("inserted element vanished".into()))
            }
        }
    }

    /// 直下の子要素を取り除く（順序は保持）
    pub fn remove_child(&mut self, token: &str) -> Option<Element> {
        match &mut self.children {
            Children::Keyed(map) => map.shift_remove(token),
            Children::Positional(items) => {
                position_of(items, token).map(|index| items.remove(index))
            }
        }
    }

    /// 直下の子要素を置き換える
    fn replace_child(
        &mut self,
        token: &str,
        mut element: Element,
    ) -> ModelResult<Option<&Element>> {
        let keyed = !self.is_positional();
        let Some(slot) = self.get_child_mut(token) else {
            return Ok(None);
        };
        if keyed {
            adopt_id_short(&mut element, token)?;
        }
        *slot = element;
        Ok(Some(slot))
    }

    // ------------------------------------------------------------------
    // パス解決
    // ------------------------------------------------------------------

    /// パスを解決して要素を参照する
    pub fn resolve(&self, path: &str) -> ModelResult<&Element> {
        let tokens = split_path(path)?;
        let mut container = self;
        let mut found: Option<&Element> = None;
        for token in &tokens {
            if let Some(element) = found {
                container = element
                    .children()
                    .ok_or_else(|| unresolved(path, token))?;
            }
            found = Some(
                container
                    .get_child(token)
                    .ok_or_else(|| unresolved(path, token))?,
            );
        }
        found.ok_or_else(empty_path)
    }

    /// パスを解決して要素を可変で参照する
    pub fn resolve_mut(&mut self, path: &str) -> ModelResult<&mut Element> {
        let tokens = split_path(path)?;
        let (last, parents) = tokens.split_last().ok_or_else(empty_path)?;
        let container = self.descend_mut(path, parents)?;
        container
            .get_child_mut(last)
            .ok_or_else(|| unresolved(path, last))
    }

    fn descend_mut<'a>(
        &'a mut self,
        path: &str,
        tokens: &[&str],
    ) -> ModelResult<&'a mut ElementContainer> {
        let mut container = self;
        for token in tokens {
            container = container
                .get_child_mut(token)
                .and_then(Element::children_mut)
                .ok_or_else(|| unresolved(path, token))?;
        }
        Ok(container)
    }

    // ------------------------------------------------------------------
    // CRUD（結果エンベロープ）
    // ------------------------------------------------------------------

    /// 直下に要素を作成する
    pub fn create(&mut self, element: Element) -> OpResult<Element> {
        self.insert_child(element).cloned().into()
    }

    /// 親パスの下に要素を作成する（""または"/"は自身）
    pub fn create_at(&mut self, parent_path: &str, element: Element) -> OpResult<Element> {
        if parent_path.trim_matches('/').is_empty() {
            return self.create(element);
        }
        let result = self.resolve_mut(parent_path).and_then(|parent| {
            let actual = parent.model_type();
            let children = parent.children_mut().ok_or_else(|| ModelError::TypeMismatch {
                path: parent_path.to_string(),
                expected: "container".to_string(),
                actual: actual.to_string(),
            })?;
            children.insert_child(element).cloned()
        });
        result.into()
    }

    /// パスで要素を取得する
    pub fn retrieve(&self, path: &str) -> OpResult<Element> {
        self.resolve(path).cloned().into()
    }

    /// パスで要素を取得し、要求した具象型であることを確認する
    pub fn retrieve_as<T: ElementKind>(&self, path: &str) -> OpResult<T> {
        let result = self.resolve(path).and_then(|element| {
            element
                .downcast::<T>()
                .cloned()
                .ok_or_else(|| ModelError::TypeMismatch {
                    path: path.to_string(),
                    expected: T::MODEL_TYPE.to_string(),
                    actual: element.model_type().to_string(),
                })
        });
        result.into()
    }

    /// パスで子要素を持つ要素を取得し、そのコンテナを返す
    pub fn retrieve_container(&self, path: &str) -> OpResult<ElementContainer> {
        let result = self.resolve(path).and_then(|element| {
            element
                .children()
                .cloned()
                .ok_or_else(|| ModelError::TypeMismatch {
                    path: path.to_string(),
                    expected: "container".to_string(),
                    actual: element.model_type().to_string(),
                })
        });
        result.into()
    }

    /// 部分木を前順（親→子）で平坦化して返す
    pub fn retrieve_all(&self) -> OpResult<Vec<Element>> {
        self.retrieve_all_matching(|_| true)
    }

    /// 条件に合う要素のみを前順で返す
    pub fn retrieve_all_matching<F>(&self, predicate: F) -> OpResult<Vec<Element>>
    where
        F: Fn(&Element) -> bool,
    {
        let elements = self
            .flatten()
            .into_iter()
            .filter(|(_, element)| predicate(element))
            .map(|(_, element)| element.clone())
            .collect();
        OpResult::ok(elements)
    }

    /// パス付きで部分木を前順に平坦化する（パスは"/"始まり）
    pub fn flatten(&self) -> Vec<(String, &Element)> {
        let mut out = Vec::new();
        self.walk("", &mut |path, element| out.push((path.to_string(), element)));
        out
    }

    /// 全要素を前順に訪問する（途中終了なし）
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&str, &Element),
    {
        self.walk("", &mut |path, element| visitor(path, element));
    }

    fn walk<'a>(&'a self, prefix: &str, visit: &mut dyn FnMut(&str, &'a Element)) {
        let positional = self.is_positional();
        for (index, element) in self.iter().enumerate() {
            let path = if positional {
                format!("{}/{}", prefix, index)
            } else {
                format!("{}/{}", prefix, element.id_short)
            };
            visit(&path, element);
            if let Some(children) = element.children() {
                children.walk(&path, visit);
            }
        }
    }

    /// 既存要素を置き換える（存在しなければNotFound）
    pub fn update(&mut self, path: &str, element: Element) -> OpResult<Element> {
        let result = split_path(path).and_then(|tokens| {
            let (last, parents) = tokens.split_last().ok_or_else(empty_path)?;
            let container = self.descend_mut(path, parents)?;
            container
                .replace_child(last, element)?
                .cloned()
                .ok_or_else(|| unresolved(path, last))
        });
        result.into()
    }

    /// 存在すれば置き換え、なければ作成する
    ///
    /// どちらの分岐かは戻り値の形ではなくメッセージで伝える。
    pub fn create_or_update(&mut self, path: &str, mut element: Element) -> OpResult<Element> {
        let result = split_path(path).and_then(|tokens| {
            let (last, parents) = tokens.split_last().ok_or_else(empty_path)?;
            let container = self.descend_mut(path, parents)?;
            if container.has_child(last) {
                let updated = container
                    .replace_child(last, element)?
                    .cloned()
                    .ok_or_else(|| unresolved(path, last))?;
                return Ok((updated, "updated"));
            }
            if container.is_positional() {
                // リストへの追加は末尾インデックス指定のみ
                if last.parse::<usize>().ok() != Some(container.len()) {
                    return Err(unresolved(path, last));
                }
            } else {
                adopt_id_short(&mut element, last)?;
            }
            let created = container.insert_child(element)?.clone();
            Ok((created, "created"))
        });
        match result {
            Ok((element, branch)) => {
                let text = format!("Element '{}' {}", path.trim_matches('/'), branch);
                OpResult::ok(element).with_info(text)
            }
            Err(err) => err.into(),
        }
    }

    /// パスで指定した部分木を削除する
    pub fn delete(&mut self, path: &str) -> OpResult<()> {
        let result = split_path(path).and_then(|tokens| {
            let (last, parents) = tokens.split_last().ok_or_else(empty_path)?;
            let container = self.descend_mut(path, parents)?;
            container
                .remove_child(last)
                .map(|_| ())
                .ok_or_else(|| unresolved(path, last))
        });
        match result {
            Ok(()) => OpResult::ok_empty(),
            Err(err) => err.into(),
        }
    }

    /// 位置アクセスのコンテナとしてデシリアライズする（リスト用）
    pub fn deserialize_positional<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Vec::<Element>::deserialize(deserializer)?;
        Ok(Self::from_items(items))
    }
}

impl Serialize for ElementContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for ElementContainer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let elements = Vec::<Element>::deserialize(deserializer)?;
        Self::from_elements(elements).map_err(serde::de::Error::custom)
    }
}

/// パスをトークンに分割する（先頭・末尾の"/"は無視）
fn split_path(path: &str) -> ModelResult<Vec<&str>> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Err(empty_path());
    }
    Ok(trimmed.split('/').collect())
}

fn position_of(items: &[Element], token: &str) -> Option<usize> {
    if let Ok(index) = token.parse::<usize>() {
        return (index < items.len()).then_some(index);
    }
    items
        .iter()
        .position(|e| !e.id_short.is_empty() && e.id_short == token)
}

/// 空のidShortはパスのトークンを採用し、食い違いは拒否する
fn adopt_id_short(element: &mut Element, token: &str) -> ModelResult<()> {
    if element.id_short.is_empty() {
        element.id_short = token.to_string();
        return Ok(());
    }
    if element.id_short != token {
        return Err(ModelError::InvalidArgument(format!(
            "idShort '{}' does not match path segment '{}'",
            element.id_short, token
        )));
    }
    Ok(())
}

fn unresolved(path: &str, token: &str) -> ModelError {
    ModelError::NotFound(format!(
        "{} (unresolved segment '{}')",
        path.trim_matches('/'),
        token
    ))
}

fn empty_path() -> ModelError {
    ModelError::InvalidArgument("path must contain at least one idShort".to_string())
}

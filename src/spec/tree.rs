//! Tree-map form of a field spec: the canonical shape for merging and lookups.
//!
//! JSON shape:
//! {
//!   "company": { "zip": {}, "country": {} },
//!   "id": {}
//! }
//!
//! An empty object is a leaf. In memory a leaf is `FieldNode::Leaf` and a
//! `FieldNode::Node` always holds a non-empty tree.

use crate::error::{self, SpecError};
use crate::spec::{FieldEntry, FieldSpec};

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldNode {
    Leaf,
    Node(FieldTree),
}

impl FieldNode {
    /// Wrap a sub-tree, collapsing an empty one into a leaf.
    pub fn from_tree(tree: FieldTree) -> Self {
        if tree.is_empty() {
            Self::Leaf
        } else {
            Self::Node(tree)
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    pub fn children(&self) -> Option<&FieldTree> {
        match self {
            Self::Leaf => None,
            Self::Node(tree) => Some(tree),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldNode> {
        self.children().and_then(|tree| tree.get(name))
    }

    /// A leaf adds no constraint, so the other side wins; two nodes merge.
    pub fn merge(&self, other: &FieldNode) -> FieldNode {
        match (self, other) {
            (Self::Leaf, node) | (node, Self::Leaf) => node.clone(),
            (Self::Node(a), Self::Node(b)) => Self::Node(a.merge(b)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTree(BTreeMap<String, FieldNode>);

impl FieldTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, node: FieldNode) -> Option<FieldNode> {
        self.0.insert(name.into(), node)
    }

    pub fn get(&self, name: &str) -> Option<&FieldNode> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Whether a dotted chain of names (`["company", "zip"]`) is selected.
    pub fn contains_path<S: AsRef<str>>(&self, path: &[S]) -> bool {
        let Some((first, rest)) = path.split_first() else {
            return true;
        };
        match self.get(first.as_ref()) {
            None => false,
            Some(_) if rest.is_empty() => true,
            Some(FieldNode::Leaf) => false,
            Some(FieldNode::Node(tree)) => tree.contains_path(rest),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, FieldNode> {
        self.0.iter()
    }

    /// Convert back to nested sequence form, ordered by name.
    pub fn to_spec(&self) -> FieldSpec {
        self.0
            .iter()
            .map(|(name, node)| match node {
                FieldNode::Leaf => FieldEntry::Leaf(name.clone()),
                FieldNode::Node(tree) => FieldEntry::Branch(name.clone(), tree.to_spec()),
            })
            .collect()
    }

    /// Union of two trees. Neither input is touched; the result is a new tree.
    ///
    /// Names present on one side only are carried over as-is. Names present on
    /// both keep the more specific sub-tree, and two sub-trees merge
    /// recursively.
    pub fn merge(&self, other: &FieldTree) -> FieldTree {
        let mut merged = self.0.clone();
        for (name, theirs) in &other.0 {
            let node = match merged.get(name) {
                Some(ours) => ours.merge(theirs),
                None => theirs.clone(),
            };
            merged.insert(name.clone(), node);
        }
        Self(merged)
    }

    /// Fold `merge` over any number of trees.
    pub fn merge_all<'a>(trees: impl IntoIterator<Item = &'a FieldTree>) -> FieldTree {
        trees
            .into_iter()
            .fold(FieldTree::new(), |acc, tree| acc.merge(tree))
    }

    /// Read a tree from its JSON shape. Every level must be an object.
    pub fn from_value(value: &Value) -> Result<Self, SpecError> {
        parse_tree(value, error::ROOT_PATH)
    }

    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(name, node)| {
                let value = match node {
                    FieldNode::Leaf => Value::Object(Map::new()),
                    FieldNode::Node(tree) => tree.to_value(),
                };
                (name.clone(), value)
            })
            .collect();
        Value::Object(map)
    }
}

impl FromIterator<(String, FieldNode)> for FieldTree {
    fn from_iter<I: IntoIterator<Item = (String, FieldNode)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FieldTree {
    type Item = (&'a String, &'a FieldNode);
    type IntoIter = std::collections::btree_map::Iter<'a, String, FieldNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn parse_tree(value: &Value, path: &str) -> Result<FieldTree, SpecError> {
    let Value::Object(map) = value else {
        return Err(SpecError::TypeMismatch {
            path: path.to_string(),
            found: error::json_kind(value),
        });
    };

    let mut tree = FieldTree::new();
    for (name, child) in map {
        let sub = parse_tree(child, &error::key_path(path, name))?;
        tree.insert(name.clone(), FieldNode::from_tree(sub));
    }
    Ok(tree)
}

impl Serialize for FieldNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf => serializer.serialize_map(Some(0))?.end(),
            Self::Node(tree) => tree.serialize(serializer),
        }
    }
}

impl Serialize for FieldTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, node) in &self.0 {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FieldTree::from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tree(value: Value) -> FieldTree {
        FieldTree::from_value(&value).unwrap()
    }

    fn samples() -> Vec<FieldTree> {
        vec![
            tree(json!({})),
            tree(json!({"a": {}, "b": {"x": {}}})),
            tree(json!({"b": {}, "c": {}})),
            tree(json!({"b": {"y": {"deep": {}}}, "a": {"k": {}}})),
            tree(json!({"company": {"zip": {}, "country": {}}, "id": {}})),
        ]
    }

    #[test]
    fn leaf_does_not_overwrite_node() {
        let a = tree(json!({"a": {}, "b": {"x": {}}}));
        let b = tree(json!({"b": {}, "c": {}}));
        assert_eq!(a.merge(&b), tree(json!({"a": {}, "b": {"x": {}}, "c": {}})));
        assert_eq!(b.merge(&a), tree(json!({"a": {}, "b": {"x": {}}, "c": {}})));
    }

    #[test]
    fn nodes_merge_recursively() {
        let a = tree(json!({"company": {"zip": {}, "owner": {"id": {}}}}));
        let b = tree(json!({"company": {"country": {}, "owner": {"name": {}}}}));
        assert_eq!(
            a.merge(&b),
            tree(json!({
                "company": {"zip": {}, "country": {}, "owner": {"id": {}, "name": {}}}
            }))
        );
    }

    #[test]
    fn merge_leaves_inputs_untouched() {
        let a = tree(json!({"a": {"x": {}}}));
        let b = tree(json!({"a": {"y": {}}, "b": {}}));
        let (a_before, b_before) = (a.clone(), b.clone());
        let _ = a.merge(&b);
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn merge_is_idempotent_commutative_and_associative() {
        let trees = samples();
        for a in &trees {
            assert_eq!(a.merge(a), *a);
            for b in &trees {
                assert_eq!(a.merge(b), b.merge(a));
                for c in &trees {
                    assert_eq!(a.merge(b).merge(c), a.merge(&b.merge(c)));
                }
            }
        }
    }

    #[test]
    fn merge_all_folds_every_tree() {
        let trees = samples();
        let all = FieldTree::merge_all(&trees);
        assert!(all.contains_path(&["company", "zip"]));
        assert!(all.contains_path(&["b", "y", "deep"]));
        assert!(all.contains_path(&["b", "x"]));
        assert!(all.contains_path(&["a", "k"]));
        assert!(all.contains("c"));
    }

    #[test]
    fn to_spec_then_to_tree_is_identity() {
        for t in samples() {
            assert_eq!(t.to_spec().to_tree(), t);
        }
    }

    #[test]
    fn to_spec_keeps_leaf_and_branch_classification() {
        let spec = tree(json!({"id": {}, "company": {"zip": {}}})).to_spec();
        assert_eq!(
            spec,
            FieldSpec::new(vec![
                FieldEntry::branch("company", [FieldEntry::leaf("zip")]),
                FieldEntry::leaf("id"),
            ])
        );
    }

    #[test]
    fn contains_path_stops_at_leaves() {
        let t = tree(json!({"company": {"zip": {}}, "id": {}}));
        assert!(t.contains_path(&["company"]));
        assert!(t.contains_path(&["company", "zip"]));
        assert!(!t.contains_path(&["id", "anything"]));
        assert!(!t.contains_path(&["missing"]));
        assert!(t.contains_path::<&str>(&[]));
    }

    #[test]
    fn rejects_non_object_positions() {
        assert_eq!(
            FieldTree::from_value(&json!(["id"])).unwrap_err(),
            SpecError::TypeMismatch { path: "$".into(), found: "array" }
        );
        assert_eq!(
            FieldTree::from_value(&json!({"company": {"zip": true}})).unwrap_err(),
            SpecError::TypeMismatch { path: "$.company.zip".into(), found: "boolean" }
        );
    }

    #[test]
    fn serializes_leaves_as_empty_objects() {
        let t = tree(json!({"company": {"zip": {}}, "id": {}}));
        assert_eq!(
            serde_json::to_string(&t).unwrap(),
            r#"{"company":{"zip":{}},"id":{}}"#
        );
        assert_eq!(serde_json::to_value(&t).unwrap(), t.to_value());
        let back: FieldTree = serde_json::from_value(t.to_value()).unwrap();
        assert_eq!(back, t);
    }
}

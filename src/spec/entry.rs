//! Nested sequence form of a field spec, the shape used to declare fields.
//!
//! JSON shape:
//! [
//!   "id",                               // leaf field
//!   ["company", ["zip", "country"]]     // field with nested sub-fields
//! ]
//!
//! Entries are either a bare name or a `[name, children]` pair. Anything else
//! is rejected with `SpecError::InvalidSpecEntry` instead of being coerced.

use crate::error::{self, SpecError};
use crate::spec::{FieldNode, FieldTree};

use serde::de::Deserializer;
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEntry {
    Leaf(String),
    Branch(String, FieldSpec),
}

impl FieldEntry {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::Leaf(name.into())
    }

    pub fn branch(name: impl Into<String>, children: impl IntoIterator<Item = FieldEntry>) -> Self {
        Self::Branch(name.into(), children.into_iter().collect())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Leaf(name) | Self::Branch(name, _) => name,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Leaf(name) => Value::String(name.clone()),
            Self::Branch(name, children) => {
                Value::Array(vec![Value::String(name.clone()), children.to_value()])
            }
        }
    }
}

/// Ordered field declaration. Entry names are expected to be distinct; when
/// they are not, the last one wins on conversion to tree form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpec(pub Vec<FieldEntry>);

impl FieldSpec {
    pub fn new(entries: Vec<FieldEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldEntry> {
        self.0.iter()
    }

    /// Convert to tree-map form, recursing into every pair.
    ///
    /// A pair with no children becomes a leaf.
    pub fn to_tree(&self) -> FieldTree {
        let mut tree = FieldTree::new();
        for entry in &self.0 {
            let node = match entry {
                FieldEntry::Leaf(_) => FieldNode::Leaf,
                FieldEntry::Branch(_, children) => FieldNode::from_tree(children.to_tree()),
            };
            tree.insert(entry.name(), node);
        }
        tree
    }

    /// Top-level names in declaration order.
    ///
    /// Only one level of nesting is stripped: pairs contribute their name and
    /// their children are dropped.
    pub fn flatten(&self) -> Vec<String> {
        self.0.iter().map(|entry| entry.name().to_string()).collect()
    }

    /// Read a spec from its JSON shape, failing on the first malformed entry.
    pub fn from_value(value: &Value) -> Result<Self, SpecError> {
        parse_spec(value, error::ROOT_PATH)
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().map(FieldEntry::to_value).collect())
    }
}

impl From<Vec<FieldEntry>> for FieldSpec {
    fn from(entries: Vec<FieldEntry>) -> Self {
        Self(entries)
    }
}

impl FromIterator<FieldEntry> for FieldSpec {
    fn from_iter<I: IntoIterator<Item = FieldEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FieldSpec {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn parse_spec(value: &Value, path: &str) -> Result<FieldSpec, SpecError> {
    let Value::Array(items) = value else {
        return Err(SpecError::InvalidSpecEntry {
            path: path.to_string(),
            reason: format!("a field spec must be an array, found {}", error::json_kind(value)),
        });
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| parse_entry(item, &error::index_path(path, idx)))
        .collect()
}

fn parse_entry(value: &Value, path: &str) -> Result<FieldEntry, SpecError> {
    let invalid = |reason: String| SpecError::InvalidSpecEntry {
        path: path.to_string(),
        reason,
    };

    match value {
        Value::String(name) => Ok(FieldEntry::Leaf(name.clone())),
        Value::Array(pair) => {
            let [name, children] = pair.as_slice() else {
                return Err(invalid(format!(
                    "a pair must have exactly 2 elements, found {}",
                    pair.len()
                )));
            };
            let Value::String(name) = name else {
                return Err(invalid(format!(
                    "pair name must be a string, found {}",
                    error::json_kind(name)
                )));
            };
            if !children.is_array() {
                return Err(invalid(format!(
                    "children of {:?} must be an array, found {}",
                    name,
                    error::json_kind(children)
                )));
            }
            let children = parse_spec(children, &error::key_path(path, name))?;
            Ok(FieldEntry::Branch(name.clone(), children))
        }
        other => Err(invalid(format!(
            "expected a name or [name, children] pair, found {}",
            error::json_kind(other)
        ))),
    }
}

impl Serialize for FieldEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(name) => serializer.serialize_str(name),
            Self::Branch(name, children) => {
                let mut pair = serializer.serialize_tuple(2)?;
                pair.serialize_element(name)?;
                pair.serialize_element(children)?;
                pair.end()
            }
        }
    }
}

impl Serialize for FieldSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.0)
    }
}

impl<'de> Deserialize<'de> for FieldEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        parse_entry(&value, error::ROOT_PATH).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for FieldSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FieldSpec::from_value(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn company_spec() -> FieldSpec {
        FieldSpec::new(vec![
            FieldEntry::branch(
                "company",
                [FieldEntry::Branch("zip".into(), FieldSpec::default()), FieldEntry::leaf("country")],
            ),
            FieldEntry::leaf("id"),
        ])
    }

    #[test]
    fn to_tree_nests_pairs_and_turns_empty_pairs_into_leaves() {
        let tree = company_spec().to_tree();
        let expected = FieldTree::from_value(&json!({
            "company": {"zip": {}, "country": {}},
            "id": {}
        }))
        .unwrap();
        assert_eq!(tree, expected);
        assert_eq!(tree.get("company").and_then(|n| n.get("zip")), Some(&FieldNode::Leaf));
    }

    #[test]
    fn flatten_strips_one_level_in_order() {
        let spec = FieldSpec::new(vec![
            FieldEntry::leaf("id"),
            FieldEntry::branch("company", [FieldEntry::leaf("zip")]),
        ]);
        assert_eq!(spec.flatten(), vec!["id".to_string(), "company".to_string()]);
    }

    #[test]
    fn flatten_keeps_leaf_only_specs_unchanged() {
        let spec: FieldSpec = ["b", "a", "c"].into_iter().map(FieldEntry::leaf).collect();
        let names: Vec<String> = spec.iter().map(|e| e.name().to_string()).collect();
        assert_eq!(spec.flatten(), names);
    }

    #[test]
    fn flatten_does_not_recurse() {
        let spec = FieldSpec::new(vec![FieldEntry::branch(
            "company",
            [FieldEntry::branch("address", [FieldEntry::leaf("zip")])],
        )]);
        assert_eq!(spec.flatten(), vec!["company".to_string()]);
    }

    #[test]
    fn parses_json_shape() {
        let spec = FieldSpec::from_value(&json!([["company", [["zip", []], "country"]], "id"]))
            .unwrap();
        assert_eq!(spec, company_spec());
        assert_eq!(spec.to_value(), json!([["company", [["zip", []], "country"]], "id"]));
    }

    #[test]
    fn serde_round_trips_through_json_text() {
        let text = serde_json::to_string(&company_spec()).unwrap();
        assert_eq!(text, r#"[["company",[["zip",[]],"country"]],"id"]"#);
        let back: FieldSpec = serde_json::from_str(&text).unwrap();
        assert_eq!(back, company_spec());
    }

    #[test]
    fn rejects_non_name_entries() {
        let err = FieldSpec::from_value(&json!(["id", 7])).unwrap_err();
        assert_eq!(
            err,
            SpecError::InvalidSpecEntry {
                path: "$[1]".into(),
                reason: "expected a name or [name, children] pair, found number".into(),
            }
        );
    }

    #[test]
    fn rejects_malformed_pairs() {
        let three = FieldSpec::from_value(&json!([["a", [], []]])).unwrap_err();
        assert!(matches!(three, SpecError::InvalidSpecEntry { ref path, .. } if path == "$[0]"));

        let bad_name = FieldSpec::from_value(&json!([[1, ["x"]]])).unwrap_err();
        assert!(bad_name.to_string().contains("pair name must be a string"));

        let bad_children = FieldSpec::from_value(&json!([["company", "zip"]])).unwrap_err();
        assert!(bad_children.to_string().contains("children of \"company\" must be an array"));
    }

    #[test]
    fn nested_errors_carry_full_path() {
        let err = FieldSpec::from_value(&json!(["id", ["company", ["zip", null]]])).unwrap_err();
        assert_eq!(
            err,
            SpecError::InvalidSpecEntry {
                path: "$[1].company[1]".into(),
                reason: "expected a name or [name, children] pair, found null".into(),
            }
        );
    }

    #[test]
    fn rejects_non_array_root() {
        let err = serde_json::from_str::<FieldSpec>(r#"{"id": {}}"#).unwrap_err();
        assert!(err.to_string().contains("a field spec must be an array, found object"));
    }
}

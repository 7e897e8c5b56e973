//! Read-only inline listing of objects: a fixed column list and one row per
//! object, with values turned into display strings.

use crate::spec::FieldSpec;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shown for values that are null or missing.
pub const EMPTY_VALUE_DISPLAY: &str = "-";

/// Anything that can be listed: a JSON object, a model row, ...
pub trait InlineObject {
    fn value(&self, field: &str) -> Option<Value>;

    /// Display value that replaces the raw one when present.
    fn humanized(&self, _field: &str) -> Option<String> {
        None
    }
}

/// A `"<field>_humanized"` key takes precedence over `"<field>"`.
impl InlineObject for Map<String, Value> {
    fn value(&self, field: &str) -> Option<Value> {
        self.get(field).cloned()
    }

    fn humanized(&self, field: &str) -> Option<String> {
        self.get(&format!("{}_humanized", field))
            .map(display_for_value)
    }
}

impl InlineObject for Value {
    fn value(&self, field: &str) -> Option<Value> {
        self.as_object().and_then(|obj| obj.value(field))
    }

    fn humanized(&self, field: &str) -> Option<String> {
        self.as_object().and_then(|obj| obj.humanized(field))
    }
}

pub fn display_for_value(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_VALUE_DISPLAY.to_string(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_for_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// `company_name` → `Company name`.
pub fn humanize_field_name(name: &str) -> String {
    let spaced = name.trim_matches('_').replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineLayout {
    #[default]
    Tabular,
    Responsive,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InlineObjectsView {
    pub name: String,

    /// Columns as (field key, header label).
    #[serde(default)]
    pub fields: Vec<(String, String)>,

    /// Class names attached to every row.
    #[serde(default)]
    pub obj_class_names: Vec<String>,

    #[serde(default)]
    pub layout: InlineLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataRow {
    pub cells: Vec<(String, String)>,
    pub class_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineContext {
    pub header_list: Vec<(String, String)>,
    pub data_list: Vec<DataRow>,
    pub class_names: Vec<String>,
}

impl InlineObjectsView {
    pub fn new(name: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self {
            name: name.into(),
            fields,
            obj_class_names: Vec::new(),
            layout: InlineLayout::default(),
        }
    }

    /// Columns from the top-level names of a field spec; nested sub-fields
    /// do not get columns of their own.
    pub fn from_field_spec(name: impl Into<String>, spec: &FieldSpec) -> Self {
        let fields = spec
            .flatten()
            .into_iter()
            .map(|key| {
                let label = humanize_field_name(&key);
                (key, label)
            })
            .collect();
        Self::new(name, fields)
    }

    pub fn header_list(&self) -> Vec<(String, String)> {
        self.fields.clone()
    }

    pub fn class_names(&self) -> Vec<String> {
        vec![self.name.to_lowercase()]
    }

    pub fn data_object<O: InlineObject + ?Sized>(&self, field: &str, obj: &O) -> String {
        if let Some(humanized) = obj.humanized(field) {
            return humanized;
        }
        obj.value(field)
            .map(|value| display_for_value(&value))
            .unwrap_or_else(|| EMPTY_VALUE_DISPLAY.to_string())
    }

    pub fn data_list<O: InlineObject>(&self, objects: &[O]) -> Vec<DataRow> {
        objects
            .iter()
            .map(|obj| DataRow {
                cells: self
                    .fields
                    .iter()
                    .map(|(key, _)| (key.clone(), self.data_object(key, obj)))
                    .collect(),
                class_names: self.obj_class_names.clone(),
            })
            .collect()
    }

    pub fn context<O: InlineObject>(&self, objects: &[O]) -> InlineContext {
        InlineContext {
            header_list: self.header_list(),
            data_list: self.data_list(objects),
            class_names: self.class_names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::FieldEntry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn view() -> InlineObjectsView {
        let mut view = InlineObjectsView::new(
            "CompanyInline",
            vec![
                ("company_name".into(), "Company name".into()),
                ("zip".into(), "ZIP code".into()),
                ("active".into(), "Active".into()),
            ],
        );
        view.obj_class_names = vec!["company".into()];
        view
    }

    #[test]
    fn rows_follow_column_order() {
        let objects = vec![
            json!({"zip": "11000", "company_name": "ACME", "active": true}),
            json!({"company_name": "Initech", "zip": null, "active": false}),
        ];
        let rows = view().data_list(&objects);
        assert_eq!(
            rows[0].cells,
            vec![
                ("company_name".to_string(), "ACME".to_string()),
                ("zip".to_string(), "11000".to_string()),
                ("active".to_string(), "Yes".to_string()),
            ]
        );
        assert_eq!(rows[1].cells[1].1, EMPTY_VALUE_DISPLAY);
        assert_eq!(rows[1].cells[2].1, "No");
        assert_eq!(rows[1].class_names, vec!["company".to_string()]);
    }

    #[test]
    fn humanized_value_wins() {
        let obj = json!({"zip": "11000", "zip_humanized": "110 00"});
        assert_eq!(view().data_object("zip", &obj), "110 00");
    }

    #[test]
    fn missing_values_use_placeholder() {
        let obj = json!({});
        assert_eq!(view().data_object("company_name", &obj), "-");
    }

    #[test]
    fn display_formats() {
        assert_eq!(display_for_value(&json!(["a", 1, null])), "a, 1, -");
        assert_eq!(display_for_value(&json!(2.5)), "2.5");
        assert_eq!(display_for_value(&json!({"k": 1})), r#"{"k":1}"#);
    }

    #[test]
    fn columns_from_field_spec_are_shallow() {
        let spec = FieldSpec::new(vec![
            FieldEntry::leaf("id"),
            FieldEntry::branch("company_name", [FieldEntry::leaf("zip")]),
            FieldEntry::leaf("_obj_name"),
        ]);
        let view = InlineObjectsView::from_field_spec("Invoices", &spec);
        assert_eq!(
            view.header_list(),
            vec![
                ("id".to_string(), "Id".to_string()),
                ("company_name".to_string(), "Company name".to_string()),
                ("_obj_name".to_string(), "Obj name".to_string()),
            ]
        );
    }

    #[test]
    fn context_collects_everything() {
        let ctx = view().context(&[json!({"company_name": "ACME"})]);
        assert_eq!(ctx.class_names, vec!["companyinline".to_string()]);
        assert_eq!(ctx.header_list.len(), 3);
        assert_eq!(ctx.data_list.len(), 1);
    }
}

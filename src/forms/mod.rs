//! Form helpers for REST submissions: flattening validation errors into a
//! response-friendly map, and filling omitted fields from initial values.

pub mod widget;

pub use widget::{Attrs, Widget, WidgetKind, add_class_name};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Error key under which whole-form errors are filed by validation.
pub const ALL_FIELDS_KEY: &str = "__all__";

/// Key used for whole-form errors in the flattened map.
pub const NON_FIELD_ERRORS_KEY: &str = "non-field-errors";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormErrors {
    #[serde(default)]
    pub field_errors: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub non_field_errors: Vec<String>,
}

impl FormErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field_errors.push(message.into());
    }

    /// `None` when valid. Otherwise the first message of every field, plus
    /// the whole-form errors under `non-field-errors`.
    pub fn is_invalid(&self) -> Option<BTreeMap<String, Value>> {
        let mut errors: BTreeMap<String, Value> = self
            .field_errors
            .iter()
            .filter(|(field, _)| field.as_str() != ALL_FIELDS_KEY)
            .filter_map(|(field, messages)| {
                messages
                    .first()
                    .map(|first| (field.clone(), Value::String(first.clone())))
            })
            .collect();

        if !self.non_field_errors.is_empty() {
            let messages = self
                .non_field_errors
                .iter()
                .cloned()
                .map(Value::String)
                .collect();
            errors.insert(NON_FIELD_ERRORS_KEY.to_string(), Value::Array(messages));
        }

        (!errors.is_empty()).then_some(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FormField {
    pub name: String,

    /// Field-level default, used when neither data nor form initial has a value.
    #[serde(default)]
    pub initial: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RestForm {
    #[serde(default)]
    pub fields: Vec<FormField>,

    /// Current values of the instance being edited.
    #[serde(default)]
    pub initial: Map<String, Value>,

    /// Submitted values.
    #[serde(default)]
    pub data: Map<String, Value>,

    #[serde(default)]
    pub errors: FormErrors,
}

impl RestForm {
    /// Submitted data completed with initial values, so a partial update
    /// validates like a full one. `self.data` is left as submitted.
    pub fn merge_from_initial(&self) -> Map<String, Value> {
        let mut data = self.data.clone();
        for field in &self.fields {
            if data.contains_key(&field.name) {
                continue;
            }
            let value = self
                .initial
                .get(&field.name)
                .or(field.initial.as_ref())
                .cloned()
                .unwrap_or(Value::Null);
            data.insert(field.name.clone(), value);
        }
        data
    }

    pub fn is_invalid(&self) -> Option<BTreeMap<String, Value>> {
        self.errors.is_invalid()
    }
}

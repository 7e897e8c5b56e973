//! Model introspection: the default REST field spec of a model, and the
//! registry mapping model labels to the handlers that expose them.

pub mod registry;

pub use registry::{HandlerRegistry, RawHandler, ResolvedHandler, RestConfig};

use crate::spec::{FieldEntry, FieldSpec};
use serde::Deserialize;

/// Sub-fields exposed for every related-object column by default.
pub const RELATED_DEFAULT_FIELDS: [&str; 3] = ["id", "_obj_name", "_rest_links"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelField {
    pub name: String,

    /// Column points at another model.
    #[serde(default)]
    pub related: bool,
}

impl ModelField {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            related: false,
        }
    }

    pub fn related(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            related: true,
        }
    }
}

/// Column-level description of a data model, as far as REST exposure needs it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelSpec {
    pub app_label: String,
    pub object_name: String,

    #[serde(default)]
    pub fields: Vec<ModelField>,
}

impl ModelSpec {
    /// Registry key: `"<app_label>.<object_name>"`, lowercased.
    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.object_name).to_lowercase()
    }
}

/// One entry per column; related columns expose their id, display name and
/// REST links.
pub fn default_rest_fields(model: &ModelSpec) -> FieldSpec {
    model
        .fields
        .iter()
        .map(|field| {
            if field.related {
                FieldEntry::branch(
                    field.name.clone(),
                    RELATED_DEFAULT_FIELDS.into_iter().map(FieldEntry::leaf),
                )
            } else {
                FieldEntry::leaf(field.name.clone())
            }
        })
        .collect()
}

//! Handler registry config (handlers.json).
//!
//! JSON shape:
//! {
//!   "models": [
//!     {
//!       "app_label": "crm",
//!       "object_name": "Customer",
//!       "fields": [{ "name": "id" }, { "name": "company", "related": true }]
//!     }
//!   ],
//!   "handlers": [
//!     {
//!       "name": "CustomerHandler",
//!       "model": "crm.customer",                     // optional
//!       "fields": ["id", ["company", ["name"]]],      // optional, defaults to model columns
//!       "extra_fields": [["company", ["country"]]]    // optional
//!     }
//!   ]
//! }
//!
//! We validate model labels and handler names, resolve every handler's field
//! tree, and index handlers by model label.

use crate::Result;
use crate::model::{ModelSpec, default_rest_fields};
use crate::spec::{FieldSpec, FieldTree};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct RestConfig {
    #[serde(default)]
    pub models: Vec<ModelSpec>,

    #[serde(default)]
    pub handlers: Vec<RawHandler>,
}

/// Raw handler shape as it appears in handlers.json.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHandler {
    pub name: String,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub fields: Option<FieldSpec>,

    #[serde(default)]
    pub extra_fields: FieldSpec,
}

/// Handler bound to a model, with its declared fields unioned into one tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedHandler {
    pub name: String,
    pub model: String,
    pub fields: FieldTree,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, ResolvedHandler>,
}

impl RestConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read handler config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parse handler config {}", path.display()))
    }

    /// Check model labels and handler names, then resolve each handler.
    pub fn validate_and_build(&self) -> Result<HandlerRegistry> {
        let mut models: BTreeMap<String, &ModelSpec> = BTreeMap::new();
        for model in &self.models {
            let label = model.label();
            if models.insert(label.clone(), model).is_some() {
                bail!("duplicate model label in handler config: {}", label);
            }
        }

        let mut names = BTreeSet::new();
        let mut handlers = BTreeMap::new();
        for raw in &self.handlers {
            if !names.insert(raw.name.as_str()) {
                bail!("duplicate handler name in handler config: {}", raw.name);
            }

            let Some(model_ref) = &raw.model else {
                warn!(handler = %raw.name, "handler has no model, skipping");
                continue;
            };
            let label = model_ref.to_lowercase();
            let Some(model) = models.get(&label) else {
                bail!("handler {} references unknown model {}", raw.name, model_ref);
            };

            let declared = match &raw.fields {
                Some(fields) => fields.clone(),
                None => default_rest_fields(model),
            };
            let fields = declared.to_tree().merge(&raw.extra_fields.to_tree());

            if let Some(prev) = handlers.insert(
                label.clone(),
                ResolvedHandler {
                    name: raw.name.clone(),
                    model: label.clone(),
                    fields,
                },
            ) {
                bail!(
                    "model {} is exposed by multiple handlers: {} and {}",
                    label,
                    prev.name,
                    raw.name
                );
            }
        }

        debug!(handlers = handlers.len(), "built handler registry");
        Ok(HandlerRegistry { handlers })
    }
}

impl HandlerRegistry {
    pub fn get(&self, label: &str) -> Option<&ResolvedHandler> {
        self.handlers.get(&label.to_lowercase())
    }

    pub fn fields_for(&self, label: &str) -> Option<&FieldTree> {
        self.get(label).map(|handler| &handler.fields)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedHandler)> {
        self.handlers.iter().map(|(label, h)| (label.as_str(), h))
    }
}

use thiserror::Error;

/// Contract violations raised while reading field specifications.
///
/// Specs are declared statically, so these surface when a declaration is
/// loaded, never while serving a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// A nested-sequence entry is neither a bare name nor a `[name, children]` pair.
    #[error("invalid field spec entry at {path}: {reason}")]
    InvalidSpecEntry { path: String, reason: String },

    /// A tree-map position holds something other than an object.
    #[error("expected a field tree object at {path}, found {found}")]
    TypeMismatch { path: String, found: &'static str },
}

/// Short JSON type name used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Path of the document root in error messages.
pub(crate) const ROOT_PATH: &str = "$";

/// `$.company` + `zip` → `$.company.zip`.
pub(crate) fn key_path(parent: &str, key: &str) -> String {
    format!("{}.{}", parent, key)
}

/// `$.company` + `1` → `$.company[1]`.
pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

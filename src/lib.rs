//! Field-selection specs for REST handlers, plus the small REST and form
//! helpers that sit around them.

pub mod error;
pub mod forms;
pub mod inline;
pub mod model;
pub mod render;
pub mod rest;
pub mod spec;

pub use error::SpecError;
pub use spec::{FieldEntry, FieldNode, FieldSpec, FieldTree};

pub type Result<T> = anyhow::Result<T>;

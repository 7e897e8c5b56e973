//! Field-spec layer: the two shapes of a field selection and the conversions
//! between them.
//!
//! It owns:
//! - nested sequence form (`FieldSpec`), used for declarations
//! - tree-map form (`FieldTree`), used for merging and membership tests

pub mod entry;
pub mod tree;

pub use entry::{FieldEntry, FieldSpec};
pub use tree::{FieldNode, FieldTree};

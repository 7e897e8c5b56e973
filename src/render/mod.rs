//! HTML rendering for inline object listings.

pub mod html;

pub use html::render_inline;

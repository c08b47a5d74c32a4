//! Room text: prop highlighting and markup formatting.

mod format;
mod props;
mod viewer;

pub use format::{
    DEFAULT_SERVER_NAME, Formatter, format_text, gate_capabilities, rewrite_tags,
    substitute_specifiers,
};
pub use props::parse_props;
pub use viewer::Viewer;

//! DrawIO diagram format adapter.
//!
//! Binds the platform-agnostic [`crate::diagram::DiagramTree`] to the DrawIO
//! `mxfile` XML format:
//!
//! - [`write_tree`] serializes a tree to an uncompressed `.drawio` document.
//! - [`read_tree`] parses a document back into a tree, classifying cells by
//!   fill colour and recovering containment from geometry.
//! - [`Style`] and [`StyleTable`] handle the `key=value;` style strings.

mod element;
mod reader;
mod style;
mod writer;

use thiserror::Error;

pub use element::DrawIOElement;
pub use reader::read_tree;
pub use style::{STYLE_DEFAULTS, Style, StyleDefaults, StyleTable};
pub use writer::write_tree;

/// Errors raised while reading or writing DrawIO XML.
#[derive(Debug, Error)]
pub enum DrawIoError {
    #[error("Failed to write diagram XML: {0}")]
    Write(#[from] std::io::Error),

    #[error("Malformed diagram XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Failed to decode diagram XML: {0}")]
    Decode(#[from] quick_xml::DeError),

    #[error("Diagram XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Unsupported diagram: {0}")]
    Unsupported(String),
}

/// Formats a coordinate the way DrawIO does: whole numbers without a
/// fractional part.
pub(crate) fn format_number(value: f32) -> String {
    if value == 0.0 {
        // Avoids writing `-0`.
        return "0".to_string();
    }
    value.to_string()
}

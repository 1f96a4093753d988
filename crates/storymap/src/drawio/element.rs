//! The DrawIO vertex record shared by the writer and the reader.

use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, Event},
};

use storymap_core::geometry::Boundary;

use crate::{
    diagram::{DiagramNode, NodeKind},
    drawio::{DrawIoError, Style, StyleTable, format_number},
};

/// Id of the structural cell every vertex hangs off.
pub(crate) const LAYER_CELL_ID: &str = "1";

/// Id of the structural root cell.
pub(crate) const ROOT_CELL_ID: &str = "0";

/// One `mxCell` vertex: id, label, style and absolute geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawIOElement {
    id: String,
    value: String,
    style: Style,
    boundary: Boundary,
}

impl DrawIOElement {
    pub fn new(id: impl Into<String>, value: impl Into<String>, style: Style, boundary: Boundary) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            style,
            boundary,
        }
    }

    /// Stamps the table style for the node's kind onto its geometry.
    pub fn from_node(node: &DiagramNode, styles: &StyleTable) -> Self {
        let style = styles.style_for(node.kind().formatting_rules().style_key());
        Self::new(node.cell_id().as_str(), node.name(), style, node.boundary())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Determines the node kind from the fill colour, if any kind owns it.
    pub fn classify(&self, styles: &StyleTable) -> Option<NodeKind> {
        styles.classify(&self.style).map(NodeKind::from_style_key)
    }

    /// Writes the element as an `mxCell` with a nested `mxGeometry`.
    pub(crate) fn write_xml<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), DrawIoError> {
        let style = self.style.to_style_string();
        let mut cell = BytesStart::new("mxCell");
        cell.push_attribute(("id", self.id.as_str()));
        cell.push_attribute(("value", self.value.as_str()));
        cell.push_attribute(("style", style.as_str()));
        cell.push_attribute(("vertex", "1"));
        cell.push_attribute(("parent", LAYER_CELL_ID));
        writer.write_event(Event::Start(cell))?;

        let x = format_number(self.boundary.x());
        let y = format_number(self.boundary.y());
        let width = format_number(self.boundary.width());
        let height = format_number(self.boundary.height());
        let mut geometry = BytesStart::new("mxGeometry");
        geometry.push_attribute(("x", x.as_str()));
        geometry.push_attribute(("y", y.as_str()));
        geometry.push_attribute(("width", width.as_str()));
        geometry.push_attribute(("height", height.as_str()));
        geometry.push_attribute(("as", "geometry"));
        writer.write_event(Event::Empty(geometry))?;

        writer.write_event(Event::End(BytesEnd::new("mxCell")))?;
        Ok(())
    }
}

/// Returns true if a raw style string marks the label as HTML.
///
/// [`Style`] does not keep the `html` key, so this looks at the raw string.
pub(crate) fn has_html_label(style: &str) -> bool {
    style.split(';').any(|entry| entry.trim() == "html=1")
}

/// Decodes a cell label: HTML labels are reduced to their visible text,
/// anything else is kept verbatim.
pub(crate) fn label_text(value: &str, style: &str) -> String {
    if has_html_label(style) {
        plain_text(value)
    } else {
        value.to_string()
    }
}

/// Reduces an HTML label to its visible text.
///
/// DrawIO stores labels as HTML when `html=1` is set. Tags are removed,
/// line breaks and block boundaries become spaces, common entities are
/// decoded and whitespace is collapsed.
pub(crate) fn plain_text(value: &str) -> String {
    let mut text = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        match rest[start..].find('>') {
            Some(end) => {
                text.push(' ');
                rest = &rest[start + end + 1..];
            }
            None => {
                rest = &rest[start..];
                break;
            }
        }
    }
    text.push_str(rest);

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

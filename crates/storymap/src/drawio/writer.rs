//! Serializes a diagram tree to DrawIO XML.

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, Event},
};

use log::debug;

use crate::{
    diagram::DiagramTree,
    drawio::{
        DrawIoError, StyleTable,
        element::{DrawIOElement, LAYER_CELL_ID, ROOT_CELL_ID},
    },
};

/// Renders `tree` as an uncompressed DrawIO document.
///
/// Vertices are written in depth-first order from the roots, followed by
/// detached nodes. Every vertex hangs off the default layer with absolute
/// geometry; containment is carried by geometry alone.
///
/// # Errors
///
/// Returns [`DrawIoError`] if the XML cannot be produced.
pub fn write_tree(tree: &DiagramTree, styles: &StyleTable) -> Result<String, DrawIoError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut mxfile = BytesStart::new("mxfile");
    mxfile.push_attribute(("host", "storymap"));
    writer.write_event(Event::Start(mxfile))?;

    let mut diagram = BytesStart::new("diagram");
    diagram.push_attribute(("id", "story-map"));
    diagram.push_attribute(("name", "Story Map"));
    writer.write_event(Event::Start(diagram))?;

    let mut model = BytesStart::new("mxGraphModel");
    model.push_attribute(("grid", "1"));
    model.push_attribute(("gridSize", "10"));
    model.push_attribute(("guides", "1"));
    model.push_attribute(("page", "0"));
    writer.write_event(Event::Start(model))?;
    writer.write_event(Event::Start(BytesStart::new("root")))?;

    let mut root_cell = BytesStart::new("mxCell");
    root_cell.push_attribute(("id", ROOT_CELL_ID));
    writer.write_event(Event::Empty(root_cell))?;

    let mut layer_cell = BytesStart::new("mxCell");
    layer_cell.push_attribute(("id", LAYER_CELL_ID));
    layer_cell.push_attribute(("parent", ROOT_CELL_ID));
    writer.write_event(Event::Empty(layer_cell))?;

    let order = tree.depth_first().into_iter().chain(tree.detached());
    let mut count = 0;
    for id in order {
        DrawIOElement::from_node(tree.node(id), styles).write_xml(&mut writer)?;
        count += 1;
    }

    writer.write_event(Event::End(BytesEnd::new("root")))?;
    writer.write_event(Event::End(BytesEnd::new("mxGraphModel")))?;
    writer.write_event(Event::End(BytesEnd::new("diagram")))?;
    writer.write_event(Event::End(BytesEnd::new("mxfile")))?;

    debug!(vertices = count; "Diagram XML written");
    Ok(String::from_utf8(writer.into_inner())?)
}

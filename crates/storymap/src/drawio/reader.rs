//! Parses DrawIO XML back into a diagram tree.
//!
//! Structure is recovered in four passes:
//!
//! 1. Vertex cells are decoded; edges, structural cells and cells with
//!    unusable geometry are skipped. Geometry nested under another vertex is
//!    made absolute.
//! 2. Each cell is classified by its fill colour. Unknown colours are
//!    decorations this crate does not own and are dropped.
//! 3. Parents are inferred from geometry: a node belongs to the smallest
//!    container of an allowed kind whose boundary holds its centre.
//! 4. Sequential order is re-derived from reading order `(y, x)` within each
//!    sibling list.
//!
//! Cells that end up without a parent are kept as detached nodes so their
//! geometry can still be saved.

use std::collections::HashMap;

use log::{debug, trace, warn};
use quick_xml::{Reader, de, events::Event};
use serde::Deserialize;

use storymap_core::{geometry::Boundary, identifier::CellId};

use crate::{
    diagram::{DiagramNode, DiagramTree, NodeId, NodeKind},
    drawio::{
        DrawIoError, Style, StyleTable,
        element::{DrawIOElement, LAYER_CELL_ID, ROOT_CELL_ID, label_text},
    },
};

// =============================================================================
// Raw document model
// =============================================================================

#[derive(Debug, Deserialize)]
struct MxFile {
    #[serde(rename = "diagram", default)]
    diagrams: Vec<DiagramPage>,
}

#[derive(Debug, Deserialize)]
struct DiagramPage {
    #[serde(rename = "mxGraphModel", default)]
    model: Option<GraphModel>,
    #[serde(rename = "$text", default)]
    payload: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GraphModel {
    #[serde(default)]
    root: GraphRoot,
}

#[derive(Debug, Default, Deserialize)]
struct GraphRoot {
    #[serde(rename = "mxCell", default)]
    cells: Vec<RawCell>,
}

#[derive(Debug, Deserialize)]
struct RawCell {
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@value", default)]
    value: String,
    #[serde(rename = "@style", default)]
    style: String,
    #[serde(rename = "@vertex", default)]
    vertex: Option<String>,
    #[serde(rename = "@parent", default)]
    parent: Option<String>,
    #[serde(rename = "mxGeometry", default)]
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "@x", default)]
    x: Option<String>,
    #[serde(rename = "@y", default)]
    y: Option<String>,
    #[serde(rename = "@width", default)]
    width: Option<String>,
    #[serde(rename = "@height", default)]
    height: Option<String>,
}

impl RawCell {
    fn is_vertex(&self) -> bool {
        self.vertex.as_deref() == Some("1")
            && !self.id.is_empty()
            && self.id != ROOT_CELL_ID
            && self.id != LAYER_CELL_ID
    }

    /// Id of the enclosing vertex, if the geometry is relative to one.
    fn vertex_parent(&self) -> Option<&str> {
        self.parent
            .as_deref()
            .filter(|parent| *parent != ROOT_CELL_ID && *parent != LAYER_CELL_ID)
    }
}

impl RawGeometry {
    /// Missing coordinates default to zero; sizes are required.
    fn to_boundary(&self) -> Option<Boundary> {
        fn number(value: &str) -> Option<f32> {
            value.trim().parse::<f32>().ok().filter(|v| v.is_finite())
        }
        let coordinate = |value: &Option<String>| match value {
            None => Some(0.0),
            Some(text) => number(text),
        };
        let size = |value: &Option<String>| value.as_deref().and_then(number);

        Some(Boundary::new(
            coordinate(&self.x)?,
            coordinate(&self.y)?,
            size(&self.width)?,
            size(&self.height)?,
        ))
    }
}

// =============================================================================
// Entry point
// =============================================================================

/// Parses an uncompressed DrawIO document into a diagram tree.
///
/// Accepts either a full `<mxfile>` (the first page is read) or a bare
/// `<mxGraphModel>`.
///
/// # Errors
///
/// Returns [`DrawIoError`] if the XML is malformed or the document is
/// compressed. Problems with individual cells are logged and the cell is
/// skipped instead.
pub fn read_tree(xml: &str, styles: &StyleTable) -> Result<DiagramTree, DrawIoError> {
    let raw_cells = parse_cells(xml)?;
    let elements = resolve_elements(&raw_cells);
    let cells = classify_elements(elements, styles);
    let parents = infer_parents(&cells);
    let mut tree = assemble(&cells, &parents);
    rederive_order(&mut tree);

    debug!(
        cells = raw_cells.len(),
        nodes = tree.len(),
        detached = tree.detached().len();
        "Diagram XML parsed"
    );
    Ok(tree)
}

fn parse_cells(xml: &str) -> Result<Vec<RawCell>, DrawIoError> {
    match root_element_name(xml)?.as_deref() {
        Some("mxfile") => {
            let file: MxFile = de::from_str(xml)?;
            let mut pages = file.diagrams.into_iter();
            let Some(page) = pages.next() else {
                return Ok(Vec::new());
            };
            if pages.len() > 0 {
                warn!(ignored_pages = pages.len(); "Only the first diagram page is read");
            }
            match page.model {
                Some(model) => Ok(model.root.cells),
                None if page.payload.as_deref().is_some_and(|p| !p.trim().is_empty()) => {
                    Err(DrawIoError::Unsupported(
                        "compressed diagram payloads are not supported; \
                         save the diagram uncompressed"
                            .to_string(),
                    ))
                }
                None => Ok(Vec::new()),
            }
        }
        Some("mxGraphModel") => {
            let model: GraphModel = de::from_str(xml)?;
            Ok(model.root.cells)
        }
        Some(other) => Err(DrawIoError::Unsupported(format!(
            "expected <mxfile> or <mxGraphModel>, found <{other}>"
        ))),
        None => Err(DrawIoError::Unsupported(
            "document has no root element".to_string(),
        )),
    }
}

fn root_element_name(xml: &str) -> Result<Option<String>, DrawIoError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                return Ok(Some(
                    String::from_utf8_lossy(element.name().as_ref()).into_owned(),
                ));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

// =============================================================================
// Passes
// =============================================================================

/// Decodes vertex cells and resolves their geometry to absolute coordinates.
fn resolve_elements(raw_cells: &[RawCell]) -> Vec<DrawIOElement> {
    let mut relative: HashMap<&str, (Option<&str>, Boundary)> = HashMap::new();
    let mut vertices = Vec::new();

    for cell in raw_cells.iter().filter(|cell| cell.is_vertex()) {
        let Some(boundary) = cell.geometry.as_ref().and_then(RawGeometry::to_boundary) else {
            warn!(cell_id = cell.id.as_str(); "Skipping cell with missing or malformed geometry");
            continue;
        };
        relative.insert(cell.id.as_str(), (cell.vertex_parent(), boundary));
        vertices.push(cell);
    }

    vertices
        .into_iter()
        .filter_map(|cell| {
            let (parent, boundary) = relative.get(cell.id.as_str()).copied()?;
            let (dx, dy) = absolute_offset(parent, &relative);
            Some(DrawIOElement::new(
                cell.id.as_str(),
                label_text(&cell.value, &cell.style),
                Style::from_style_string(&cell.style),
                boundary.translate(dx, dy),
            ))
        })
        .collect()
}

/// Sums the origins of every enclosing vertex.
fn absolute_offset<'a>(
    mut parent: Option<&'a str>,
    relative: &HashMap<&str, (Option<&'a str>, Boundary)>,
) -> (f32, f32) {
    let (mut dx, mut dy) = (0.0, 0.0);
    let mut hops = 0;
    while let Some(id) = parent {
        let Some((next, boundary)) = relative.get(id) else {
            break;
        };
        dx += boundary.x();
        dy += boundary.y();
        parent = *next;
        hops += 1;
        if hops > relative.len() {
            warn!(cell_id = id; "Cyclic parent references in diagram geometry");
            break;
        }
    }
    (dx, dy)
}

#[derive(Debug)]
struct LoadedCell {
    element: DrawIOElement,
    kind: NodeKind,
}

impl LoadedCell {
    fn boundary(&self) -> Boundary {
        self.element.boundary()
    }
}

fn classify_elements(elements: Vec<DrawIOElement>, styles: &StyleTable) -> Vec<LoadedCell> {
    elements
        .into_iter()
        .filter_map(|element| match element.classify(styles) {
            Some(kind) => {
                trace!(cell_id = element.id(), kind:%; "Classified cell");
                Some(LoadedCell { element, kind })
            }
            None => {
                warn!(cell_id = element.id(); "Skipping cell with unrecognised style");
                None
            }
        })
        .collect()
}

/// Picks a parent index for every cell; roots and orphans get `None`.
fn infer_parents(cells: &[LoadedCell]) -> Vec<Option<usize>> {
    (0..cells.len())
        .map(|index| {
            let cell = &cells[index];
            match cell.kind {
                NodeKind::Epic | NodeKind::Increment => None,
                NodeKind::SubEpic => {
                    let area = cell.boundary().area();
                    innermost(cells, index, |c| {
                        c.kind == NodeKind::SubEpic && c.boundary().area() > area
                    })
                    .or_else(|| innermost(cells, index, |c| c.kind == NodeKind::Epic))
                }
                NodeKind::Story(_) => innermost(cells, index, |c| c.kind == NodeKind::SubEpic)
                    .or_else(|| innermost(cells, index, |c| c.kind == NodeKind::Increment)),
                NodeKind::Actor => innermost(cells, index, |c| c.kind == NodeKind::SubEpic),
                NodeKind::AcceptanceCriterion => story_above(cells, index),
            }
        })
        .collect()
}

/// Smallest cell matching `accepts` whose boundary holds the centre of `child`.
fn innermost(
    cells: &[LoadedCell],
    child: usize,
    accepts: impl Fn(&LoadedCell) -> bool,
) -> Option<usize> {
    let center = cells[child].boundary().center();
    cells
        .iter()
        .enumerate()
        .filter(|(index, cell)| {
            *index != child && accepts(cell) && cell.boundary().contains_position(center)
        })
        .min_by(|(_, a), (_, b)| a.boundary().area().total_cmp(&b.boundary().area()))
        .map(|(index, _)| index)
}

/// Nearest story above an acceptance criterion whose column holds the
/// criterion's left edge. Criteria are drawn flush with their story but may
/// be wider than it.
fn story_above(cells: &[LoadedCell], criterion: usize) -> Option<usize> {
    let boundary = cells[criterion].boundary();
    let left = boundary.x();
    cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| {
            let story = cell.boundary();
            cell.kind.is_story()
                && story.x() <= left
                && left < story.right()
                && story.center().y() < boundary.y()
        })
        .min_by(|(_, a), (_, b)| {
            let gap_a = boundary.y() - a.boundary().bottom();
            let gap_b = boundary.y() - b.boundary().bottom();
            gap_a.abs().total_cmp(&gap_b.abs())
        })
        .map(|(index, _)| index)
}

/// Inserts cells so that every parent precedes its children.
fn assemble(cells: &[LoadedCell], parents: &[Option<usize>]) -> DiagramTree {
    let mut tree = DiagramTree::new();
    let mut ids: Vec<Option<NodeId>> = vec![None; cells.len()];

    let mut insertion: Vec<usize> = (0..cells.len()).collect();
    insertion.sort_by(|&a, &b| {
        insertion_rank(cells[a].kind)
            .cmp(&insertion_rank(cells[b].kind))
            // Larger sub-epics first so an enclosing sub-epic precedes the nested one.
            .then_with(|| cells[b].boundary().area().total_cmp(&cells[a].boundary().area()))
    });

    for index in insertion {
        let cell = &cells[index];
        let node = DiagramNode::create(
            cell.kind,
            cell.element.value(),
            CellId::new(cell.element.id()),
            0.0,
            cell.boundary(),
        );

        let parent_id = parents[index].and_then(|parent| ids[parent]);
        let result = match (cell.kind.containment_rules().may_be_root(), parent_id) {
            (true, _) => tree.add_root(node),
            (false, Some(parent_id)) => tree.add_child(parent_id, node),
            (false, None) => {
                warn!(
                    cell_id = cell.element.id(),
                    name = cell.element.value(),
                    kind:% = cell.kind;
                    "Cell lies outside every container; keeping it detached"
                );
                tree.add_detached(node)
            }
        };

        match result {
            Ok(id) => ids[index] = Some(id),
            Err(err) => warn!(cell_id = cell.element.id(), err:%; "Skipping cell"),
        }
    }
    tree
}

fn insertion_rank(kind: NodeKind) -> u8 {
    match kind {
        NodeKind::Epic | NodeKind::Increment => 0,
        NodeKind::SubEpic => 1,
        NodeKind::Story(_) => 2,
        NodeKind::Actor => 3,
        NodeKind::AcceptanceCriterion => 4,
    }
}

/// Sorts each sibling list by reading order and numbers it per kind.
fn rederive_order(tree: &mut DiagramTree) {
    let lists: Vec<Option<NodeId>> = std::iter::once(None).chain(tree.ids().map(Some)).collect();

    for parent in lists {
        tree.sort_children_by(parent, |a, b| a.position().reading_order(b.position()));

        let siblings = match parent {
            Some(id) => tree.children(id).to_vec(),
            None => tree.roots().to_vec(),
        };
        let mut counters: HashMap<&'static str, f64> = HashMap::new();
        for id in siblings {
            let counter = counters.entry(tree.node(id).kind().as_str()).or_insert(0.0);
            *counter += 1.0;
            tree.node_mut(id).set_sequential_order(*counter);
        }
    }
}

#[cfg(test)]
mod tests {
    use storymap_core::story_graph::StoryType;

    use super::*;

    const EPIC: &str = "fillColor=#e1d5e7;";
    const SUB_EPIC: &str = "fillColor=#dae8fc;";
    const STORY: &str = "fillColor=#fff2cc;";
    const CRITERION: &str = "fillColor=#f5f5f5;";
    const LANE: &str = "fillColor=#eeeeee;";

    fn vertex(id: &str, value: &str, style: &str, geometry: &str) -> String {
        format!(
            r#"<mxCell id="{id}" value="{value}" style="{style}" vertex="1" parent="1"><mxGeometry {geometry} as="geometry"/></mxCell>"#
        )
    }

    fn model(cells: &[String]) -> String {
        format!(
            r#"<mxGraphModel><root><mxCell id="0"/><mxCell id="1" parent="0"/>{}</root></mxGraphModel>"#,
            cells.concat()
        )
    }

    fn read(xml: &str) -> DiagramTree {
        read_tree(xml, &StyleTable::default()).unwrap()
    }

    fn names(tree: &DiagramTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| tree.node(id).name().to_string()).collect()
    }

    fn checkout_cells() -> Vec<String> {
        vec![
            vertex("epic/checkout", "Checkout", EPIC, r#"x="20" y="20" width="150" height="170""#),
            vertex("epic/checkout/pay", "Pay", SUB_EPIC, r#"x="30" y="70" width="130" height="110""#),
            vertex("epic/checkout/pay/confirm", "Confirm", STORY, r#"x="100" y="120" width="50" height="50""#),
            vertex("epic/checkout/pay/enter-card", "Enter Card", STORY, r#"x="40" y="120" width="50" height="50""#),
        ]
    }

    #[test]
    fn test_containment_inferred_from_geometry() {
        let tree = read(&model(&checkout_cells()));

        let epic = tree.find_by_cell_id("epic/checkout").unwrap();
        let pay = tree.find_by_cell_id("epic/checkout/pay").unwrap();
        assert_eq!(tree.roots(), [epic]);
        assert_eq!(tree.children(epic), [pay]);
        assert_eq!(names(&tree, tree.children(pay)), ["Enter Card", "Confirm"]);
    }

    #[test]
    fn test_order_rederived_from_reading_order() {
        let tree = read(&model(&checkout_cells()));
        let card = tree.find_by_cell_id("epic/checkout/pay/enter-card").unwrap();
        let confirm = tree.find_by_cell_id("epic/checkout/pay/confirm").unwrap();

        assert_eq!(tree.node(card).sequential_order(), 1.0);
        assert_eq!(tree.node(confirm).sequential_order(), 2.0);
    }

    #[test]
    fn test_mxfile_wrapper_accepted() {
        let xml = format!(
            r#"<?xml version="1.0"?><mxfile host="app"><diagram id="a" name="Page-1">{}</diagram></mxfile>"#,
            model(&checkout_cells())
        );

        assert_eq!(read(&xml).len(), 4);
    }

    #[test]
    fn test_compressed_payload_unsupported() {
        let xml = r#"<mxfile><diagram id="a" name="Page-1">7VhNb9owGP41OQ4lMSRwJKHtDps0iUlbj2lsEmtOnDmmwH79bMcmDglbpVHUSs0BeJ/XX+/zPK/tEIC03H9mUV18pQiTwHfRPgAXge974TwUXxI5tMh04rZAzggyjY7AGv/GBtTNthjhptdQUEoErvtgRqsKZ6KHRYzRXb/ZhpL+rHWU4xNgnUXkFP2BkShadO5HHf4F47ywM3vhos2UkW1sKmmKCNGdA4GbAKSMUtH+Kvcpj1Z7lpe1328ke1wYZ5lwz4a2U9Zm/S5bhmVLxq1zWYBOacpQeUMc4awQ3Irrub6qYbfFW8uZEWWxIP+qaT8V2TmVrUPlbKBgLbN8tGVJ2owKmBcCV+cpQzTRzW1oGVthSFA45UOkrYuBH3w1QrnQbhW+uJFn5EnLJYzx8sXJgqwGPgTr0xwV7CgM+OW3cC1ajVbm8owwr4Zf6CKPKE3yUxAwP8kTAXFPxTRmVLnUyRibqeoDjBpnbIVfqKd1xGiEj/Bs=</diagram></mxfile>"#;
        let err = read_tree(xml, &StyleTable::default()).unwrap_err();

        assert!(matches!(err, DrawIoError::Unsupported(_)));
    }

    #[test]
    fn test_unexpected_root_unsupported() {
        let err = read_tree("<svg/>", &StyleTable::default()).unwrap_err();
        assert!(matches!(err, DrawIoError::Unsupported(_)));
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(read_tree("<mxGraphModel><root>", &StyleTable::default()).is_err());
    }

    #[test]
    fn test_bad_geometry_skips_cell() {
        let mut cells = checkout_cells();
        cells.push(vertex("no-width", "No Width", STORY, r#"x="40" y="120" height="50""#));
        cells.push(vertex("nan", "Bad", STORY, r#"x="abc" y="120" width="50" height="50""#));
        cells.push(r#"<mxCell id="no-geometry" value="X" style="fillColor=#fff2cc;" vertex="1" parent="1"/>"#.to_string());

        let tree = read(&model(&cells));

        assert_eq!(tree.len(), 4);
        assert!(tree.find_by_cell_id("no-width").is_none());
    }

    #[test]
    fn test_missing_coordinates_default_to_zero() {
        let tree = read(&model(&[vertex("e", "E", EPIC, r#"width="100" height="40""#)]));
        let epic = tree.find_by_cell_id("e").unwrap();

        assert_eq!(tree.node(epic).boundary(), Boundary::new(0.0, 0.0, 100.0, 40.0));
    }

    #[test]
    fn test_edges_and_unknown_styles_skipped() {
        let mut cells = checkout_cells();
        cells.push(
            r#"<mxCell id="edge" style="endArrow=classic;" edge="1" parent="1" source="a" target="b"><mxGeometry relative="1" as="geometry"/></mxCell>"#
                .to_string(),
        );
        cells.push(vertex("note", "Sticky", "fillColor=#123456;", r#"x="0" y="0" width="10" height="10""#));

        let tree = read(&model(&cells));

        assert_eq!(tree.len(), 4);
        assert!(tree.find_by_cell_id("note").is_none());
    }

    #[test]
    fn test_nested_geometry_made_absolute() {
        let cells = [
            vertex("e", "E", EPIC, r#"x="100" y="100" width="200" height="200""#),
            r#"<mxCell id="s" value="S" style="fillColor=#dae8fc;" vertex="1" parent="e"><mxGeometry x="10" y="50" width="100" height="100" as="geometry"/></mxCell>"#.to_string(),
        ];
        let tree = read(&model(&cells));
        let sub_epic = tree.find_by_cell_id("s").unwrap();

        assert_eq!(tree.node(sub_epic).boundary(), Boundary::new(110.0, 150.0, 100.0, 100.0));
        assert_eq!(tree.parent(sub_epic), tree.find_by_cell_id("e"));
    }

    #[test]
    fn test_nested_sub_epics_pick_innermost() {
        let cells = [
            vertex("e", "E", EPIC, r#"x="0" y="0" width="400" height="400""#),
            vertex("outer", "Outer", SUB_EPIC, r#"x="10" y="50" width="300" height="300""#),
            vertex("inner", "Inner", SUB_EPIC, r#"x="20" y="100" width="100" height="200""#),
            vertex("s1", "S1", STORY, r#"x="30" y="200" width="50" height="50""#),
        ];
        let tree = read(&model(&cells));
        let outer = tree.find_by_cell_id("outer").unwrap();
        let inner = tree.find_by_cell_id("inner").unwrap();
        let story = tree.find_by_cell_id("s1").unwrap();

        assert_eq!(tree.parent(inner), Some(outer));
        assert_eq!(tree.parent(story), Some(inner));
    }

    #[test]
    fn test_orphan_story_kept_detached() {
        let mut cells = checkout_cells();
        cells.push(vertex("lost", "Lost", STORY, r#"x="900" y="900" width="50" height="50""#));

        let tree = read(&model(&cells));
        let lost = tree.find_by_cell_id("lost").unwrap();

        assert_eq!(tree.parent(lost), None);
        assert_eq!(tree.detached(), [lost]);
    }

    #[test]
    fn test_criterion_attached_to_story_above() {
        let mut cells = checkout_cells();
        cells.push(vertex("ac", "Masked", CRITERION, r#"x="40" y="180" width="50" height="32""#));

        let tree = read(&model(&cells));
        let criterion = tree.find_by_cell_id("ac").unwrap();

        assert_eq!(tree.parent(criterion), tree.find_by_cell_id("epic/checkout/pay/enter-card"));
        assert_eq!(tree.node(criterion).kind(), NodeKind::AcceptanceCriterion);
    }

    #[test]
    fn test_wide_criterion_attached_by_left_edge() {
        let mut cells = checkout_cells();
        cells.push(vertex("ac", "Card number is masked", CRITERION, r#"x="40" y="230" width="146" height="32""#));

        let tree = read(&model(&cells));
        let criterion = tree.find_by_cell_id("ac").unwrap();

        assert_eq!(tree.parent(criterion), tree.find_by_cell_id("epic/checkout/pay/enter-card"));
    }

    #[test]
    fn test_story_in_lane() {
        let cells = [
            vertex("increment/mvp", "MVP", LANE, r#"x="0" y="0" width="400" height="80""#),
            vertex("increment/mvp/enter-card", "Enter Card", STORY, r#"x="140" y="15" width="50" height="50""#),
        ];
        let tree = read(&model(&cells));
        let lane = tree.find_by_cell_id("increment/mvp").unwrap();

        assert_eq!(names(&tree, tree.children(lane)), ["Enter Card"]);
        assert_eq!(
            tree.node(tree.children(lane)[0]).kind(),
            NodeKind::Story(StoryType::User)
        );
    }

    #[test]
    fn test_html_values_stripped() {
        let cells = [vertex(
            "e",
            "&lt;div&gt;Check&amp;nbsp;out&lt;/div&gt;",
            "html=1;fillColor=#e1d5e7;",
            r#"x="0" y="0" width="100" height="40""#,
        )];
        let tree = read(&model(&cells));

        assert_eq!(tree.node(tree.roots()[0]).name(), "Check out");
    }

    #[test]
    fn test_plain_values_kept_verbatim() {
        let cells = [
            vertex("e", "Handle &lt;Enter&gt; key", EPIC, r#"x="0" y="0" width="100" height="40""#),
            vertex("f", "Two  spaces &amp;nbsp; ", EPIC, r#"x="200" y="0" width="100" height="40""#),
        ];
        let tree = read(&model(&cells));

        assert_eq!(tree.node(tree.roots()[0]).name(), "Handle <Enter> key");
        assert_eq!(tree.node(tree.roots()[1]).name(), "Two  spaces &nbsp; ");
    }
}

//! Increment lanes.

use log::{trace, warn};

use storymap_core::{
    geometry::Boundary,
    identifier::CellId,
    story_graph::{Increment, StoryGraph, StoryNode},
};

use crate::{
    config::LayoutConfig,
    diagram::{DiagramError, DiagramNode, DiagramTree, NodeKind},
    layout::outline::Outline,
    layout_data::LayoutData,
};

/// Draws one horizontal lane per increment, highest priority on top.
///
/// Each lane holds copies of its stories at the x position the story has in
/// the outline, so the same story lines up vertically across lanes.
pub(super) fn render_lanes(
    graph: &StoryGraph,
    outline: &Outline,
    config: &LayoutConfig,
    saved: &LayoutData,
) -> Result<DiagramTree, DiagramError> {
    let mut increments: Vec<&Increment> = graph.increments().iter().collect();
    increments.sort_by(|a, b| a.priority().cmp(b.priority()));

    let outline_right = outline
        .tree
        .roots()
        .iter()
        .map(|root| outline.tree.node(*root).boundary().right())
        .fold(config.x_start(), f32::max);

    let all_stories = graph.all_stories();
    let rules = NodeKind::Increment.placement_rules(config);
    let lane_x = config.x_start() - config.lane_label_width();
    let lane_width = (outline_right + rules.padding() - lane_x).max(rules.default_size().width());
    let cell = config.cell_size();

    let mut tree = DiagramTree::new();
    for (index, increment) in increments.into_iter().enumerate() {
        let cell_id = tree.unique_cell_id(CellId::increment(increment.name()));
        let computed = Boundary::new(
            lane_x,
            config.epic_y() + index as f32 * (config.lane_height() + rules.spacing()),
            lane_width,
            config.lane_height(),
        );
        let lane_boundary = saved.get(cell_id.as_str()).unwrap_or(computed);
        let lane = tree.add_root(DiagramNode::create(
            NodeKind::Increment,
            increment.name(),
            cell_id.clone(),
            (index + 1) as f64,
            lane_boundary,
        ))?;

        for story_name in increment.stories() {
            let Some(position) = all_stories
                .iter()
                .position(|story| story.name() == story_name.as_str())
            else {
                warn!(
                    increment = increment.name(),
                    story = story_name.as_str();
                    "Increment refers to an unknown story, skipping"
                );
                continue;
            };
            let story = all_stories[position];
            let Some(placed) = outline.stories.get(position) else {
                continue;
            };
            let source = outline.tree.node(*placed).boundary();

            let copy_id = tree.unique_cell_id(cell_id.child(story.name()));
            let computed = Boundary::new(
                source.x(),
                lane_boundary.y() + (lane_boundary.height() - cell) / 2.0,
                cell,
                cell,
            );
            let boundary = saved.get(copy_id.as_str()).unwrap_or(computed);
            trace!(lane = increment.name(), story = story.name(), x = boundary.x(); "Placing story copy");
            tree.add_child(
                lane,
                DiagramNode::create(
                    NodeKind::Story(story.story_type()),
                    story.name(),
                    copy_id,
                    story.sequential_order(),
                    boundary,
                ),
            )?;
        }
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use storymap_core::story_graph::{Epic, Priority, Story, SubEpic};

    use super::*;
    use crate::layout::outline::OutlineRenderer;

    fn graph() -> StoryGraph {
        StoryGraph::new(
            vec![Epic::new("Checkout").with_sub_epic(
                SubEpic::new("Pay")
                    .with_story(Story::new("Enter Card"))
                    .with_story(Story::new("Confirm")),
            )],
            vec![
                Increment::new("Later", Priority::Rank(2)).with_story("Confirm"),
                Increment::new("MVP", Priority::Rank(1))
                    .with_story("Enter Card")
                    .with_story("Confirm")
                    .with_story("Ghost"),
            ],
        )
    }

    fn render(graph: &StoryGraph, saved: &LayoutData) -> DiagramTree {
        let config = LayoutConfig::default();
        let outline = OutlineRenderer::new(&config, saved, graph, false)
            .render(graph)
            .unwrap();
        render_lanes(graph, &outline, &config, saved).unwrap()
    }

    fn boundary_of(tree: &DiagramTree, cell_id: &str) -> Boundary {
        tree.node(tree.find_by_cell_id(cell_id).unwrap()).boundary()
    }

    #[test]
    fn test_lanes_sorted_by_priority() {
        let tree = render(&graph(), &LayoutData::new());
        let names: Vec<_> = tree.roots().iter().map(|id| tree.node(*id).name()).collect();

        assert_eq!(names, ["MVP", "Later"]);
        let mvp = boundary_of(&tree, "increment/mvp");
        let later = boundary_of(&tree, "increment/later");
        assert_approx_eq!(f32, mvp.x(), -100.0);
        assert_approx_eq!(f32, mvp.y(), 20.0);
        assert_approx_eq!(f32, later.y(), 110.0);
        // Outline ends at 170, plus padding.
        assert_approx_eq!(f32, mvp.right(), 180.0);
    }

    #[test]
    fn test_story_copies_keep_outline_x() {
        let tree = render(&graph(), &LayoutData::new());

        let first = boundary_of(&tree, "increment/mvp/confirm");
        let second = boundary_of(&tree, "increment/later/confirm");

        assert_approx_eq!(f32, first.x(), 100.0);
        assert_approx_eq!(f32, second.x(), 100.0);
        assert_approx_eq!(f32, first.y(), 20.0 + 15.0);
        assert!(boundary_of(&tree, "increment/mvp").contains_boundary(first));
    }

    #[test]
    fn test_unknown_story_is_skipped() {
        let tree = render(&graph(), &LayoutData::new());
        let mvp = tree.find_by_cell_id("increment/mvp").unwrap();

        assert_eq!(tree.children(mvp).len(), 2);
        assert!(tree.iter().all(|(_, node)| node.name() != "Ghost"));
    }

    #[test]
    fn test_only_lanes_are_drawn() {
        let tree = render(&graph(), &LayoutData::new());

        assert!(
            tree.iter()
                .all(|(_, node)| matches!(node.kind(), NodeKind::Increment | NodeKind::Story(_)))
        );
    }

    #[test]
    fn test_saved_lane_moves_its_stories() {
        let mut saved = LayoutData::new();
        saved.insert("increment/later", Boundary::new(-100.0, 500.0, 400.0, 100.0));

        let tree = render(&graph(), &saved);
        let copy = boundary_of(&tree, "increment/later/confirm");

        assert_approx_eq!(f32, copy.y(), 525.0);
    }
}

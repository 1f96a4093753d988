//! Row-based outline layout of epics, sub-epics, actors and stories.

use std::collections::HashSet;

use log::trace;

use storymap_core::{
    geometry::{Boundary, Position},
    identifier::{CellId, slugify},
    story_graph::{Epic, Story, StoryGraph, StoryNode, SubEpic},
};

use crate::{
    config::LayoutConfig,
    diagram::{DiagramError, DiagramNode, DiagramTree, NodeId, NodeKind},
    layout::{exploration, rows::RowPositions},
    layout_data::LayoutData,
};

/// Result of an outline pass.
#[derive(Debug)]
pub(super) struct Outline {
    pub(super) tree: DiagramTree,
    /// Story nodes in [`StoryGraph::all_stories`] order.
    pub(super) stories: Vec<NodeId>,
}

/// Places the story graph hierarchy into a fresh diagram tree.
///
/// Horizontal positions come from a left-to-right cursor, vertical ones from
/// [`RowPositions`]. A saved boundary always wins over a computed one, and a
/// computed node never starts inside a saved sibling. Unsaved containers are
/// sized from their children; a saved container keeps its boundary unless a
/// child computed in this pass falls outside it, in which case it is
/// extended to the right and down.
pub(super) struct OutlineRenderer<'a> {
    config: &'a LayoutConfig,
    saved: &'a LayoutData,
    rows: RowPositions,
    with_criteria: bool,
    tree: DiagramTree,
    stories: Vec<NodeId>,
    /// Nodes whose boundary was computed or adjusted in this pass.
    computed: HashSet<NodeId>,
}

impl<'a> OutlineRenderer<'a> {
    pub(super) fn new(
        config: &'a LayoutConfig,
        saved: &'a LayoutData,
        graph: &StoryGraph,
        with_criteria: bool,
    ) -> Self {
        Self {
            config,
            saved,
            rows: RowPositions::new(config, graph.max_sub_epic_depth()),
            with_criteria,
            tree: DiagramTree::new(),
            stories: Vec::new(),
            computed: HashSet::new(),
        }
    }

    pub(super) fn render(mut self, graph: &StoryGraph) -> Result<Outline, DiagramError> {
        let spacing = self.config.epic_spacing();
        let taken = self.saved_boundaries(graph.epics().iter().map(|epic| CellId::epic(epic.name())));

        let mut cursor = self.config.x_start();
        for epic in graph.epics() {
            let placed = self.place_epic(epic, clear_of(&taken, cursor, spacing))?;
            cursor = cursor.max(placed.right() + spacing);
        }
        Ok(Outline {
            tree: self.tree,
            stories: self.stories,
        })
    }

    fn place_epic(&mut self, epic: &Epic, x: f32) -> Result<Boundary, DiagramError> {
        let cell_id = self.tree.unique_cell_id(CellId::epic(epic.name()));
        let rules = NodeKind::Epic.placement_rules(self.config);
        let saved = self.saved.get(cell_id.as_str());

        let origin_x = saved.map_or(x, Boundary::x);
        let minimum = Boundary::new(
            origin_x,
            self.rows.epic_y(),
            rules.default_size().width(),
            rules.default_size().height(),
        );
        let id = self.tree.add_root(DiagramNode::create(
            NodeKind::Epic,
            epic.name(),
            cell_id.clone(),
            epic.sequential_order(),
            saved.unwrap_or(minimum),
        ))?;

        let spacing = self.config.cell_spacing();
        let taken = self.saved_boundaries(epic.sub_epics().iter().map(|child| cell_id.child(child.name())));

        let mut cursor = origin_x + rules.padding();
        for sub_epic in epic.sub_epics() {
            // Actors are drawn once per top-level sub-epic branch.
            let mut seen_actors = HashSet::new();
            let x = clear_of(&taken, cursor, spacing);
            let placed = self.place_sub_epic(sub_epic, id, &cell_id, 0, x, &mut seen_actors)?;
            cursor = cursor.max(placed.right() + spacing);
        }

        self.finish_container(id, saved, minimum, rules.padding())
    }

    fn place_sub_epic(
        &mut self,
        sub_epic: &SubEpic,
        parent: NodeId,
        parent_cell: &CellId,
        depth: usize,
        x: f32,
        seen_actors: &mut HashSet<String>,
    ) -> Result<Boundary, DiagramError> {
        let cell_id = self.tree.unique_cell_id(parent_cell.child(sub_epic.name()));
        let rules = NodeKind::SubEpic.placement_rules(self.config);
        let saved = self.saved.get(cell_id.as_str());

        let origin_x = saved.map_or(x, Boundary::x);
        let minimum = Boundary::new(
            origin_x,
            self.rows.sub_epic_y(depth),
            rules.default_size().width(),
            rules.default_size().height(),
        );
        let id = self.tree.add_child(
            parent,
            DiagramNode::create(
                NodeKind::SubEpic,
                sub_epic.name(),
                cell_id.clone(),
                sub_epic.sequential_order(),
                saved.unwrap_or(minimum),
            ),
        )?;

        let spacing = self.config.cell_spacing();
        let taken = self.saved_boundaries(sub_epic.sub_epics().iter().map(|child| cell_id.child(child.name())));

        let mut cursor = origin_x + rules.padding();
        for child in sub_epic.sub_epics() {
            let x = clear_of(&taken, cursor, spacing);
            let placed = self.place_sub_epic(child, id, &cell_id, depth + 1, x, seen_actors)?;
            cursor = cursor.max(placed.right() + spacing);
        }
        self.place_stories(sub_epic, id, &cell_id, cursor, saved, seen_actors)?;

        self.finish_container(id, saved, minimum, rules.padding())
    }

    /// Lays stories left to right from `start_x`.
    ///
    /// Saved stories keep their boundary and do not move the cursor; the
    /// others skip past any saved story on their line. When the sub-epic has
    /// a saved boundary its right edge is a hard limit: a story that would
    /// cross it starts a new line.
    fn place_stories(
        &mut self,
        sub_epic: &SubEpic,
        container: NodeId,
        container_cell: &CellId,
        start_x: f32,
        saved_container: Option<Boundary>,
        seen_actors: &mut HashSet<String>,
    ) -> Result<(), DiagramError> {
        let cell = self.config.cell_size();
        let spacing = self.config.cell_spacing();
        let stories: Vec<&Story> = sub_epic.stories().collect();

        let stack_height = if self.with_criteria {
            stories
                .iter()
                .map(|story| exploration::criteria_stack_height(story, self.config))
                .fold(0.0, f32::max)
        } else {
            0.0
        };
        let line_advance = cell + spacing + stack_height;
        let right_limit = saved_container.map(|boundary| {
            boundary.right() - NodeKind::SubEpic.placement_rules(self.config).padding()
        });

        let taken = self.saved_boundaries(stories.iter().map(|story| container_cell.child(story.name())));
        let line_height = cell + stack_height;

        let mut cursor = start_x;
        let mut y = self.rows.story_y();
        for story in stories {
            let slot_width = self.slot_width(story);
            let cell_id = self.tree.unique_cell_id(container_cell.child(story.name()));
            let saved = self.saved.get(cell_id.as_str());

            let boundary = match saved {
                Some(boundary) => boundary,
                None => {
                    let slot = |x: f32, y: f32| Boundary::new(x, y, slot_width, line_height);
                    let mut x = first_free_x(&taken, slot(cursor, y), spacing);
                    while right_limit.is_some_and(|limit| x + slot_width > limit) && x > start_x {
                        trace!(story = story.name(), y; "Wrapping story to a new line");
                        y += line_advance;
                        x = first_free_x(&taken, slot(start_x, y), spacing);
                    }
                    cursor = x + slot_width + spacing;
                    Boundary::new(x, y, cell, cell)
                }
            };
            let story_id = self.tree.add_child(
                container,
                DiagramNode::create(
                    NodeKind::Story(story.story_type()),
                    story.name(),
                    cell_id.clone(),
                    story.sequential_order(),
                    boundary,
                ),
            )?;
            self.stories.push(story_id);
            if saved.is_none() {
                self.computed.insert(story_id);
            }

            self.place_actors(story, container, container_cell, boundary, seen_actors)?;
            if self.with_criteria {
                self.place_criteria(story, story_id, &cell_id, boundary)?;
            }
        }
        Ok(())
    }

    /// Draws each actor the first time it appears in the current branch,
    /// in the actor row above the story. Several new actors on one story
    /// share the story's width.
    fn place_actors(
        &mut self,
        story: &Story,
        container: NodeId,
        container_cell: &CellId,
        story_boundary: Boundary,
        seen_actors: &mut HashSet<String>,
    ) -> Result<(), DiagramError> {
        let new_actors: Vec<&String> = story
            .users()
            .iter()
            .filter(|user| seen_actors.insert((*user).clone()))
            .collect();
        if new_actors.is_empty() {
            return Ok(());
        }

        let width = story_boundary.width() / new_actors.len() as f32;
        let height = NodeKind::Actor
            .placement_rules(self.config)
            .default_size()
            .height();
        for (index, user) in new_actors.into_iter().enumerate() {
            let cell_id = self.tree.unique_cell_id(
                container_cell.child_segment(&format!("actor-{}", slugify(user))),
            );
            let computed = Boundary::new(
                story_boundary.x() + index as f32 * width,
                self.rows.actor_y(),
                width,
                height,
            );
            let boundary = self.resolve(&cell_id, computed);
            let actor_id = self.tree.add_child(
                container,
                DiagramNode::create(NodeKind::Actor, user.as_str(), cell_id, (index + 1) as f64, boundary),
            )?;
            if boundary == computed {
                self.computed.insert(actor_id);
            }
        }
        Ok(())
    }

    /// Stacks acceptance criteria below a story.
    fn place_criteria(
        &mut self,
        story: &Story,
        story_id: NodeId,
        story_cell: &CellId,
        story_boundary: Boundary,
    ) -> Result<(), DiagramError> {
        let mut y = story_boundary.bottom() + self.config.row_gap();
        for (index, criterion) in story.acceptance_criteria().iter().enumerate() {
            let size = exploration::criterion_size(criterion.text(), self.config);
            let cell_id = self
                .tree
                .unique_cell_id(story_cell.child_segment(&format!("ac-{}", index + 1)));
            let computed = Boundary::new(story_boundary.x(), y, size.width(), size.height());
            let boundary = self.resolve(&cell_id, computed);
            let criterion_id = self.tree.add_child(
                story_id,
                DiagramNode::create(
                    NodeKind::AcceptanceCriterion,
                    criterion.text(),
                    cell_id,
                    (index + 1) as f64,
                    boundary,
                ),
            )?;
            if boundary == computed {
                self.computed.insert(criterion_id);
            }
            y += size.height() + self.config.ac_spacing();
        }
        Ok(())
    }

    fn slot_width(&self, story: &Story) -> f32 {
        if self.with_criteria {
            exploration::story_slot_width(story, self.config)
        } else {
            self.config.cell_size()
        }
    }

    fn resolve(&self, cell_id: &CellId, computed: Boundary) -> Boundary {
        self.saved.get(cell_id.as_str()).unwrap_or(computed)
    }

    /// Saved boundaries of a sibling list, looked up by the ids the siblings
    /// will be given.
    fn saved_boundaries(&self, cell_ids: impl Iterator<Item = CellId>) -> Vec<Boundary> {
        cell_ids
            .filter_map(|cell_id| self.saved.get(cell_id.as_str()))
            .collect()
    }

    /// Fixes a container's final boundary.
    ///
    /// An unsaved container spans its subtree plus padding and is never
    /// smaller than `minimum`. A saved one keeps its boundary, extended to
    /// the right and down only as far as needed to enclose descendants
    /// computed in this pass.
    fn finish_container(
        &mut self,
        id: NodeId,
        saved: Option<Boundary>,
        minimum: Boundary,
        padding: f32,
    ) -> Result<Boundary, DiagramError> {
        if let Some(boundary) = saved {
            return self.enclose_computed(id, boundary, padding);
        }
        self.computed.insert(id);

        let extent = self
            .tree
            .descendants(id)
            .into_iter()
            .map(|child| self.tree.node(child).boundary())
            .reduce(Boundary::merge);

        let boundary = match extent {
            Some(extent) => {
                let width = (extent.right() + padding - minimum.x()).max(minimum.width());
                let height = (extent.bottom() + padding - minimum.y()).max(minimum.height());
                minimum.with_width(width).with_height(height)
            }
            None => minimum,
        };
        self.tree.set_boundary(id, boundary)?;
        Ok(boundary)
    }

    fn enclose_computed(
        &mut self,
        id: NodeId,
        saved: Boundary,
        padding: f32,
    ) -> Result<Boundary, DiagramError> {
        let extent = self
            .tree
            .descendants(id)
            .into_iter()
            .filter(|child| self.computed.contains(child))
            .map(|child| self.tree.node(child).boundary())
            .reduce(Boundary::merge);
        let Some(extent) = extent else {
            return Ok(saved);
        };

        let width = saved.width().max(extent.right() + padding - saved.x());
        let height = saved.height().max(extent.bottom() + padding - saved.y());
        if width == saved.width() && height == saved.height() {
            return Ok(saved);
        }

        trace!(cell_id = self.tree.node(id).cell_id().as_str(), width, height; "Extending saved container");
        let boundary = saved.with_width(width).with_height(height);
        self.tree.set_boundary(id, boundary)?;
        self.computed.insert(id);
        Ok(boundary)
    }
}

/// Moves `x` past every saved sibling box that reaches beyond it.
///
/// Used for containers, whose final width is unknown until their children
/// are placed.
fn clear_of(taken: &[Boundary], x: f32, spacing: f32) -> f32 {
    taken
        .iter()
        .filter(|boundary| boundary.right() > x)
        .map(|boundary| boundary.right() + spacing)
        .fold(x, f32::max)
}

/// Slides `slot` right until it overlaps no saved sibling box and returns
/// its left edge.
fn first_free_x(taken: &[Boundary], mut slot: Boundary, spacing: f32) -> f32 {
    while let Some(blocker) = taken.iter().find(|boundary| slot.overlaps(**boundary)) {
        slot = slot.with_position(Position::new(blocker.right() + spacing, slot.y()));
    }
    slot.x()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use storymap_core::story_graph::StoryType;

    use super::*;

    fn render(graph: &StoryGraph, saved: &LayoutData, with_criteria: bool) -> Outline {
        let config = LayoutConfig::default();
        OutlineRenderer::new(&config, saved, graph, with_criteria)
            .render(graph)
            .unwrap()
    }

    fn boundary_of(outline: &Outline, cell_id: &str) -> Boundary {
        let id = outline.tree.find_by_cell_id(cell_id).unwrap();
        outline.tree.node(id).boundary()
    }

    fn checkout() -> StoryGraph {
        StoryGraph::new(
            vec![Epic::new("Checkout").with_sub_epic(
                SubEpic::new("Pay")
                    .with_story(Story::new("Enter Card").with_user("Shopper"))
                    .with_story(Story::new("Confirm").with_user("Shopper")),
            )],
            Vec::new(),
        )
    }

    #[test]
    fn test_checkout_geometry() {
        let outline = render(&checkout(), &LayoutData::new(), false);

        let card = boundary_of(&outline, "epic/checkout/pay/enter-card");
        let confirm = boundary_of(&outline, "epic/checkout/pay/confirm");
        let pay = boundary_of(&outline, "epic/checkout/pay");
        let epic = boundary_of(&outline, "epic/checkout");

        assert_eq!(card, Boundary::new(40.0, 170.0, 50.0, 50.0));
        assert_eq!(confirm, Boundary::new(100.0, 170.0, 50.0, 50.0));
        assert_eq!(pay, Boundary::new(30.0, 70.0, 130.0, 160.0));
        assert_eq!(epic, Boundary::new(20.0, 20.0, 150.0, 220.0));
        assert_eq!(outline.stories.len(), 2);
    }

    #[test]
    fn test_actor_drawn_once_per_branch() {
        let outline = render(&checkout(), &LayoutData::new(), false);
        let actors: Vec<_> = outline
            .tree
            .iter()
            .filter(|(_, node)| node.kind() == NodeKind::Actor)
            .collect();

        assert_eq!(actors.len(), 1);
        let (_, actor) = actors[0];
        assert_eq!(actor.cell_id().as_str(), "epic/checkout/pay/actor-shopper");
        assert_eq!(actor.boundary(), Boundary::new(40.0, 120.0, 50.0, 40.0));
    }

    #[test]
    fn test_empty_containers_keep_minimum_size() {
        let graph = StoryGraph::new(
            vec![
                Epic::new("Empty"),
                Epic::new("Shell").with_sub_epic(SubEpic::new("Nothing")),
            ],
            Vec::new(),
        );
        let outline = render(&graph, &LayoutData::new(), false);

        let empty = boundary_of(&outline, "epic/empty");
        assert_approx_eq!(f32, empty.width(), 100.0);
        assert_approx_eq!(f32, empty.height(), 40.0);

        let nothing = boundary_of(&outline, "epic/shell/nothing");
        assert_approx_eq!(f32, nothing.width(), 50.0);
        assert_approx_eq!(f32, boundary_of(&outline, "epic/shell").x(), 140.0);
    }

    #[test]
    fn test_saved_story_position_wins() {
        let mut saved = LayoutData::new();
        saved.insert("epic/checkout/pay/confirm", Boundary::new(300.0, 400.0, 60.0, 60.0));

        let outline = render(&checkout(), &saved, false);

        assert_eq!(
            boundary_of(&outline, "epic/checkout/pay/confirm"),
            Boundary::new(300.0, 400.0, 60.0, 60.0)
        );
        // The unsaved container grows to cover the moved story.
        let pay = boundary_of(&outline, "epic/checkout/pay");
        assert_approx_eq!(f32, pay.right(), 370.0);
        assert_approx_eq!(f32, pay.bottom(), 470.0);
    }

    #[test]
    fn test_new_nodes_skip_saved_siblings() {
        let saved = LayoutData::extract(&render(&checkout(), &LayoutData::new(), false).tree);
        let graph = StoryGraph::new(
            vec![
                Epic::new("Zero").with_sub_epic(SubEpic::new("Z").with_story(Story::new("Zed"))),
                Epic::new("Checkout").with_sub_epic(
                    SubEpic::new("Pay")
                        .with_story(Story::new("First"))
                        .with_story(Story::new("Enter Card").with_user("Shopper"))
                        .with_story(Story::new("Confirm").with_user("Shopper")),
                ),
            ],
            Vec::new(),
        );

        let outline = render(&graph, &saved, false);

        let zero = boundary_of(&outline, "epic/zero");
        let checkout = boundary_of(&outline, "epic/checkout");
        assert!(!zero.overlaps(checkout));
        assert_approx_eq!(f32, zero.x(), 190.0);

        let first = boundary_of(&outline, "epic/checkout/pay/first");
        for cell_id in ["epic/checkout/pay/enter-card", "epic/checkout/pay/confirm"] {
            let sibling = boundary_of(&outline, cell_id);
            assert_eq!(Some(sibling), saved.get(cell_id));
            assert!(!first.overlaps(sibling), "{cell_id}");
        }
        assert_eq!(first, Boundary::new(40.0, 230.0, 50.0, 50.0));

        // Saved containers keep their origin and grow to enclose the new story.
        let pay = boundary_of(&outline, "epic/checkout/pay");
        assert_eq!(pay.position(), saved.get("epic/checkout/pay").unwrap().position());
        assert!(pay.contains_boundary(first));
        assert!(checkout.contains_boundary(pay));
    }

    #[test]
    fn test_saved_container_untouched_when_children_fit() {
        let saved = LayoutData::extract(&render(&checkout(), &LayoutData::new(), false).tree);

        let outline = render(&checkout(), &saved, false);

        assert_eq!(LayoutData::extract(&outline.tree), saved);
    }

    #[test]
    fn test_saved_sub_epic_wraps_stories() {
        let graph = StoryGraph::new(
            vec![Epic::new("E").with_sub_epic(
                SubEpic::new("S")
                    .with_story(Story::new("A"))
                    .with_story(Story::new("B"))
                    .with_story(Story::new("C")),
            )],
            Vec::new(),
        );
        let mut saved = LayoutData::new();
        // Room for two cells: 30 + 10 padding, cells at 40 and 100, limit 150.
        saved.insert("epic/e/s", Boundary::new(30.0, 70.0, 130.0, 250.0));

        let outline = render(&graph, &saved, false);

        assert_eq!(boundary_of(&outline, "epic/e/s/a").position().y(), 170.0);
        assert_eq!(boundary_of(&outline, "epic/e/s/b").x(), 100.0);
        let wrapped = boundary_of(&outline, "epic/e/s/c");
        assert_approx_eq!(f32, wrapped.x(), 40.0);
        assert_approx_eq!(f32, wrapped.y(), 230.0);
    }

    #[test]
    fn test_nested_sub_epics_stack_rows() {
        let graph = StoryGraph::new(
            vec![Epic::new("E").with_sub_epic(
                SubEpic::new("Outer")
                    .with_sub_epic(SubEpic::new("Inner").with_story(Story::new("Deep")))
                    .with_story(Story::new("Own")),
            )],
            Vec::new(),
        );
        let outline = render(&graph, &LayoutData::new(), false);

        let outer = boundary_of(&outline, "epic/e/outer");
        let inner = boundary_of(&outline, "epic/e/outer/inner");
        let deep = boundary_of(&outline, "epic/e/outer/inner/deep");
        let own = boundary_of(&outline, "epic/e/outer/own");

        assert_approx_eq!(f32, inner.y(), outer.y() + 50.0);
        assert_approx_eq!(f32, deep.y(), own.y());
        assert!(own.x() > inner.right());
        assert!(outer.contains_boundary(inner));
        assert!(outer.contains_boundary(own));
    }

    #[test]
    fn test_duplicate_names_get_unique_ids() {
        let graph = StoryGraph::new(
            vec![Epic::new("E").with_sub_epic(
                SubEpic::new("S")
                    .with_story(Story::new("Same"))
                    .with_story(Story::new("Same")),
            )],
            Vec::new(),
        );
        let outline = render(&graph, &LayoutData::new(), false);

        assert!(outline.tree.find_by_cell_id("epic/e/s/same").is_some());
        assert!(outline.tree.find_by_cell_id("epic/e/s/same-2").is_some());
    }

    #[test]
    fn test_criteria_widen_story_slots() {
        let graph = StoryGraph::new(
            vec![Epic::new("E").with_sub_epic(
                SubEpic::new("S")
                    .with_story(
                        Story::new("A")
                            .with_type(StoryType::System)
                            .with_criterion("abcdefghijklmnopqrst"),
                    )
                    .with_story(Story::new("B")),
            )],
            Vec::new(),
        );
        let outline = render(&graph, &LayoutData::new(), true);

        let a = boundary_of(&outline, "epic/e/s/a");
        let criterion = boundary_of(&outline, "epic/e/s/a/ac-1");
        let b = boundary_of(&outline, "epic/e/s/b");

        assert_approx_eq!(f32, criterion.x(), a.x());
        assert_approx_eq!(f32, criterion.y(), a.bottom() + 10.0);
        assert_approx_eq!(f32, criterion.width(), 146.0);
        assert_approx_eq!(f32, b.x(), a.x() + 146.0 + 10.0);

        let s = boundary_of(&outline, "epic/e/s");
        assert!(s.contains_boundary(criterion));
    }
}

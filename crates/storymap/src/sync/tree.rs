//! Comparable snapshots of a story hierarchy.

use std::collections::HashSet;

use storymap_core::{
    identifier::{CellId, slugify},
    story_graph::{Story, StoryGraph, StoryNode, StoryNodeType, SubEpic},
};

use crate::diagram::{DiagramTree, NodeId, NodeKind};

/// One epic, sub-epic or story reduced to what reconciliation looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareNode {
    name: String,
    cell_id: CellId,
    node_type: StoryNodeType,
    sequential_order: f64,
    sub_epics: Vec<CompareNode>,
    stories: Vec<CompareNode>,
}

impl CompareNode {
    fn leaf(name: &str, cell_id: CellId, node_type: StoryNodeType, sequential_order: f64) -> Self {
        Self {
            name: name.to_string(),
            cell_id,
            node_type,
            sequential_order,
            sub_epics: Vec::new(),
            stories: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell_id(&self) -> &CellId {
        &self.cell_id
    }

    pub fn node_type(&self) -> StoryNodeType {
        self.node_type
    }

    pub fn sequential_order(&self) -> f64 {
        self.sequential_order
    }

    /// Child sub-epics. For an epic these are its top-level sub-epics.
    pub fn sub_epics(&self) -> &[CompareNode] {
        &self.sub_epics
    }

    pub fn stories(&self) -> &[CompareNode] {
        &self.stories
    }

    /// Every node below this one, sub-epics before stories at each level.
    pub fn descendants(&self) -> Vec<&CompareNode> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a CompareNode>) {
        for child in self.sub_epics.iter().chain(&self.stories) {
            out.push(child);
            child.collect_descendants(out);
        }
    }

    fn from_sub_epic(sub_epic: &SubEpic, cell_id: CellId) -> Self {
        let mut node = Self::leaf(
            sub_epic.name(),
            cell_id.clone(),
            StoryNodeType::SubEpic,
            sub_epic.sequential_order(),
        );
        node.sub_epics = sub_epic
            .sub_epics()
            .iter()
            .map(|child| Self::from_sub_epic(child, cell_id.child(child.name())))
            .collect();
        node.stories = sub_epic
            .stories()
            .map(|story| Self::from_story(story, &cell_id))
            .collect();
        node
    }

    fn from_story(story: &Story, parent: &CellId) -> Self {
        Self::leaf(
            story.name(),
            parent.child(story.name()),
            StoryNodeType::Story,
            story.sequential_order(),
        )
    }

    fn from_diagram(tree: &DiagramTree, id: NodeId, node_type: StoryNodeType) -> Self {
        let node = tree.node(id);
        let mut compare = Self::leaf(
            node.name(),
            node.cell_id().clone(),
            node_type,
            node.sequential_order(),
        );
        for child in tree.children(id) {
            match tree.node(*child).kind() {
                NodeKind::SubEpic => compare.sub_epics.push(Self::from_diagram(
                    tree,
                    *child,
                    StoryNodeType::SubEpic,
                )),
                NodeKind::Story(_) => compare.stories.push(Self::from_diagram(
                    tree,
                    *child,
                    StoryNodeType::Story,
                )),
                _ => {}
            }
        }
        compare
    }
}

/// One side of a reconciliation.
///
/// A tree holds either an epic forest or, for a diagram drawn as increment
/// lanes, a flat list of the stories the lanes deliver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompareTree {
    epics: Vec<CompareNode>,
    /// Stories outside any epic.
    stories: Vec<CompareNode>,
}

impl CompareTree {
    /// Snapshot of a story graph, with the cell ids the layout engine would
    /// generate for it.
    pub fn from_graph(graph: &StoryGraph) -> Self {
        let epics = graph
            .epics()
            .iter()
            .map(|epic| {
                let cell_id = CellId::epic(epic.name());
                let mut node = CompareNode::leaf(
                    epic.name(),
                    cell_id.clone(),
                    StoryNodeType::Epic,
                    epic.sequential_order(),
                );
                node.sub_epics = epic
                    .sub_epics()
                    .iter()
                    .map(|sub_epic| CompareNode::from_sub_epic(sub_epic, cell_id.child(sub_epic.name())))
                    .collect();
                node
            })
            .collect();
        Self {
            epics,
            stories: Vec::new(),
        }
    }

    /// Snapshot of the stories a graph schedules into at least one
    /// increment, flattened in hierarchy order. This is what an increment
    /// lane diagram of the graph shows.
    pub fn from_increments(graph: &StoryGraph) -> Self {
        let stories = graph
            .all_stories()
            .into_iter()
            .filter(|story| {
                graph
                    .increments()
                    .iter()
                    .any(|increment| increment.contains_story(story.name()))
            })
            .enumerate()
            .map(|(index, story)| {
                CompareNode::leaf(
                    story.name(),
                    CellId::new(slugify(story.name())),
                    StoryNodeType::Story,
                    (index + 1) as f64,
                )
            })
            .collect();
        Self {
            epics: Vec::new(),
            stories,
        }
    }

    /// Snapshot of a loaded diagram.
    ///
    /// Actors, acceptance criteria and detached nodes carry no hierarchy of
    /// their own and are skipped. Increment lanes are only read when the
    /// diagram has no epics; their story copies then become one flat list,
    /// keeping the first copy of each name.
    pub fn from_diagram(tree: &DiagramTree) -> Self {
        let epics: Vec<CompareNode> = tree
            .roots_of_kind(NodeKind::Epic)
            .map(|id| CompareNode::from_diagram(tree, id, StoryNodeType::Epic))
            .collect();
        if !epics.is_empty() {
            return Self {
                epics,
                stories: Vec::new(),
            };
        }

        let mut seen = HashSet::new();
        let stories = tree
            .roots_of_kind(NodeKind::Increment)
            .flat_map(|lane| tree.children(lane).iter().copied())
            .filter(|&id| matches!(tree.node(id).kind(), NodeKind::Story(_)))
            .filter(|&id| seen.insert(tree.node(id).name()))
            .enumerate()
            .map(|(index, id)| {
                let node = tree.node(id);
                CompareNode::leaf(
                    node.name(),
                    node.cell_id().clone(),
                    StoryNodeType::Story,
                    (index + 1) as f64,
                )
            })
            .collect();
        Self { epics, stories }
    }

    pub fn epics(&self) -> &[CompareNode] {
        &self.epics
    }

    /// Stories outside any epic. Only increment lane snapshots have any.
    pub fn stories(&self) -> &[CompareNode] {
        &self.stories
    }

    /// True for a snapshot of increment lanes rather than an epic forest.
    pub fn is_story_level(&self) -> bool {
        self.epics.is_empty() && !self.stories.is_empty()
    }

    /// Total number of epics, sub-epics and stories.
    pub fn node_count(&self) -> usize {
        self.epics
            .iter()
            .map(|epic| 1 + epic.descendants().len())
            .sum::<usize>()
            + self.stories.len()
    }

    /// Every name anywhere in the tree.
    pub(crate) fn collect_all_names(&self) -> HashSet<&str> {
        self.epics
            .iter()
            .flat_map(|epic| std::iter::once(epic).chain(epic.descendants()))
            .chain(&self.stories)
            .map(CompareNode::name)
            .collect()
    }
}

//! Platform-agnostic diagram tree.
//!
//! A [`DiagramTree`] is an arena of [`DiagramNode`]s addressed by
//! [`NodeId`]. Parent and child links are index lists kept by the arena, so
//! reparenting is a pair of list edits and no node owns another.
//!
//! Nodes without a parent are either roots (listed in [`DiagramTree::roots`])
//! or detached. Detached nodes are kept so that cells recovered from a
//! diagram file without any geometric parent still contribute their
//! geometry to saved layout data.
//!
//! Every node's cell id is unique inside a tree; the arena rejects
//! duplicates and offers [`DiagramTree::unique_cell_id`] to derive a free one.

mod node;
mod rules;

use std::{cmp::Ordering, collections::HashMap, fmt};

use thiserror::Error;

use storymap_core::{geometry::Boundary, identifier::CellId};

pub use node::{DiagramNode, NodeKind};
pub use rules::{ContainerKind, ContainmentRules, FormattingRules, PlacementRules, StyleKey};

// =============================================================================
// Identifiers and errors
// =============================================================================

/// Index of a node inside a [`DiagramTree`].
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Misuse of the diagram arena.
#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("Unknown diagram node {0}")]
    UnknownNode(NodeId),

    #[error("Duplicate cell id `{0}`")]
    DuplicateCellId(String),

    #[error("A {child} cannot be placed inside a {parent}")]
    InvalidParent { child: NodeKind, parent: NodeKind },

    #[error("A {0} cannot be a top-level node")]
    NotARoot(NodeKind),

    #[error("Cannot move `{0}` inside its own subtree")]
    Cycle(String),
}

// =============================================================================
// Arena
// =============================================================================

#[derive(Debug, Clone)]
struct Slot {
    node: DiagramNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An arena-backed tree of diagram nodes.
#[derive(Debug, Clone, Default)]
pub struct DiagramTree {
    slots: Vec<Slot>,
    roots: Vec<NodeId>,
    index: HashMap<CellId, NodeId>,
}

impl DiagramTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Adds a top-level node.
    ///
    /// # Errors
    ///
    /// Fails if the kind may not be a root or the cell id is taken.
    pub fn add_root(&mut self, node: DiagramNode) -> Result<NodeId, DiagramError> {
        if !node.kind().containment_rules().may_be_root() {
            return Err(DiagramError::NotARoot(node.kind()));
        }
        let id = self.insert(node, None)?;
        self.roots.push(id);
        Ok(id)
    }

    /// Appends `node` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is unknown, if the containment rules of the node's
    /// kind forbid the parent, or if the cell id is taken.
    pub fn add_child(&mut self, parent: NodeId, node: DiagramNode) -> Result<NodeId, DiagramError> {
        let parent_kind = self.get(parent)?.kind();
        check_containment(node.kind(), parent_kind)?;
        let id = self.insert(node, Some(parent))?;
        self.slots[parent.0].children.push(id);
        Ok(id)
    }

    /// Adds a node with neither a parent nor a place among the roots.
    ///
    /// # Errors
    ///
    /// Fails if the cell id is taken.
    pub fn add_detached(&mut self, node: DiagramNode) -> Result<NodeId, DiagramError> {
        self.insert(node, None)
    }

    /// Reparents `id` as the last child of `new_parent`.
    ///
    /// The node leaves its previous parent (or the root list) in the same
    /// call, so it never has two parents.
    ///
    /// # Errors
    ///
    /// Fails if either id is unknown, if the containment rules forbid the new
    /// parent, or if `new_parent` lies inside the subtree of `id`.
    pub fn move_to(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), DiagramError> {
        let kind = self.get(id)?.kind();
        let parent_kind = self.get(new_parent)?.kind();
        check_containment(kind, parent_kind)?;
        if id == new_parent || self.ancestors(new_parent).any(|ancestor| ancestor == id) {
            return Err(DiagramError::Cycle(self.slots[id.0].node.name().to_string()));
        }

        self.unlink(id);
        self.slots[id.0].parent = Some(new_parent);
        self.slots[new_parent.0].children.push(id);
        Ok(())
    }

    /// Turns `id` into a top-level node.
    ///
    /// # Errors
    ///
    /// Fails if the id is unknown or its kind may not be a root.
    pub fn make_root(&mut self, id: NodeId) -> Result<(), DiagramError> {
        let kind = self.get(id)?.kind();
        if !kind.containment_rules().may_be_root() {
            return Err(DiagramError::NotARoot(kind));
        }
        self.unlink(id);
        self.roots.push(id);
        Ok(())
    }

    /// Removes `id` from its parent or the root list. The node and its
    /// subtree stay in the arena.
    ///
    /// # Errors
    ///
    /// Fails if the id is unknown.
    pub fn detach(&mut self, id: NodeId) -> Result<(), DiagramError> {
        self.get(id)?;
        self.unlink(id);
        Ok(())
    }

    /// Returns the node for `id`.
    ///
    /// # Errors
    ///
    /// Fails if the id was not issued by this tree.
    pub fn get(&self, id: NodeId) -> Result<&DiagramNode, DiagramError> {
        self.slots
            .get(id.0)
            .map(|slot| &slot.node)
            .ok_or(DiagramError::UnknownNode(id))
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if the id was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &DiagramNode {
        &self.slots[id.0].node
    }

    /// Mutable access for crate-internal passes. Cell ids are not mutable
    /// through [`DiagramNode`], so the index stays consistent.
    ///
    /// # Panics
    ///
    /// Panics if the id was not issued by this tree.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut DiagramNode {
        &mut self.slots[id.0].node
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.0).and_then(|slot| slot.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slots
            .get(id.0)
            .map(|slot| slot.children.as_slice())
            .unwrap_or_default()
    }

    /// Top-level nodes in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Top-level nodes of one kind.
    pub fn roots_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.roots
            .iter()
            .copied()
            .filter(move |&id| self.node(id).kind() == kind)
    }

    /// Walks from the parent of `id` up to its root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Every node below `id` in depth-first pre-order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Every attached node in depth-first pre-order, starting from the roots.
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.slots.len());
        for &root in &self.roots {
            out.push(root);
            out.extend(self.descendants(root));
        }
        out
    }

    /// Nodes that are neither roots nor reachable from one.
    pub fn detached(&self) -> Vec<NodeId> {
        let mut attached = vec![false; self.slots.len()];
        for id in self.depth_first() {
            attached[id.0] = true;
        }
        self.ids().filter(|id| !attached[id.0]).collect()
    }

    /// Every id in the arena in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.slots.len()).map(NodeId)
    }

    /// Iterates `(id, node)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DiagramNode)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (NodeId(index), &slot.node))
    }

    pub fn find_by_cell_id(&self, cell_id: &str) -> Option<NodeId> {
        self.index.get(&CellId::new(cell_id)).copied()
    }

    /// Returns `candidate` if it is free, otherwise the first free
    /// `candidate-2`, `candidate-3`, ...
    pub fn unique_cell_id(&self, candidate: CellId) -> CellId {
        if !self.index.contains_key(&candidate) {
            return candidate;
        }
        let mut suffix = 2;
        loop {
            let id = candidate.with_suffix(suffix);
            if !self.index.contains_key(&id) {
                return id;
            }
            suffix += 1;
        }
    }

    /// Replaces the geometry of a node.
    ///
    /// # Errors
    ///
    /// Fails if the id is unknown.
    pub fn set_boundary(&mut self, id: NodeId, boundary: Boundary) -> Result<(), DiagramError> {
        self.get(id)?;
        self.slots[id.0].node.set_boundary(boundary);
        Ok(())
    }

    /// Replaces the sequential order of a node.
    ///
    /// # Errors
    ///
    /// Fails if the id is unknown.
    pub fn set_sequential_order(&mut self, id: NodeId, order: f64) -> Result<(), DiagramError> {
        self.get(id)?;
        self.slots[id.0].node.set_sequential_order(order);
        Ok(())
    }

    /// Sorts the children of `parent`, or the roots when `parent` is `None`.
    pub fn sort_children_by<F>(&mut self, parent: Option<NodeId>, mut compare: F)
    where
        F: FnMut(&DiagramNode, &DiagramNode) -> Ordering,
    {
        let mut list = match parent {
            Some(id) => match self.slots.get_mut(id.0) {
                Some(slot) => std::mem::take(&mut slot.children),
                None => return,
            },
            None => std::mem::take(&mut self.roots),
        };

        list.sort_by(|a, b| compare(&self.slots[a.0].node, &self.slots[b.0].node));

        match parent {
            Some(id) => self.slots[id.0].children = list,
            None => self.roots = list,
        }
    }

    fn insert(&mut self, node: DiagramNode, parent: Option<NodeId>) -> Result<NodeId, DiagramError> {
        if self.index.contains_key(node.cell_id()) {
            return Err(DiagramError::DuplicateCellId(node.cell_id().to_string()));
        }
        let id = NodeId(self.slots.len());
        self.index.insert(node.cell_id().clone(), id);
        self.slots.push(Slot {
            node,
            parent,
            children: Vec::new(),
        });
        Ok(id)
    }

    fn unlink(&mut self, id: NodeId) {
        match self.slots[id.0].parent.take() {
            Some(old_parent) => self.slots[old_parent.0].children.retain(|&child| child != id),
            None => self.roots.retain(|&root| root != id),
        }
    }
}

fn check_containment(child: NodeKind, parent: NodeKind) -> Result<(), DiagramError> {
    if child.containment_rules().allows_parent(parent) {
        Ok(())
    } else {
        Err(DiagramError::InvalidParent { child, parent })
    }
}

#[cfg(test)]
mod tests {
    use storymap_core::story_graph::StoryType;

    use super::*;

    fn node(kind: NodeKind, name: &str, cell_id: &str) -> DiagramNode {
        DiagramNode::create(kind, name, CellId::new(cell_id), 1.0, Boundary::default())
    }

    fn story(name: &str, cell_id: &str) -> DiagramNode {
        node(NodeKind::Story(StoryType::User), name, cell_id)
    }

    fn sample() -> (DiagramTree, NodeId, NodeId, NodeId) {
        let mut tree = DiagramTree::new();
        let epic = tree.add_root(node(NodeKind::Epic, "Checkout", "epic/checkout")).unwrap();
        let pay = tree
            .add_child(epic, node(NodeKind::SubEpic, "Pay", "epic/checkout/pay"))
            .unwrap();
        let card = tree
            .add_child(pay, story("Enter Card", "epic/checkout/pay/enter-card"))
            .unwrap();
        (tree, epic, pay, card)
    }

    #[test]
    fn test_build_and_navigate() {
        let (tree, epic, pay, card) = sample();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.roots(), [epic]);
        assert_eq!(tree.children(epic), [pay]);
        assert_eq!(tree.parent(card), Some(pay));
        assert_eq!(tree.ancestors(card).collect::<Vec<_>>(), [pay, epic]);
        assert_eq!(tree.descendants(epic), [pay, card]);
        assert_eq!(tree.depth_first(), [epic, pay, card]);
        assert_eq!(tree.find_by_cell_id("epic/checkout/pay"), Some(pay));
    }

    #[test]
    fn test_duplicate_cell_id_rejected() {
        let (mut tree, _, pay, _) = sample();
        let result = tree.add_child(pay, story("Other", "epic/checkout/pay/enter-card"));

        assert!(matches!(result, Err(DiagramError::DuplicateCellId(_))));
    }

    #[test]
    fn test_unique_cell_id_suffixes() {
        let (mut tree, _, pay, _) = sample();
        let candidate = CellId::new("epic/checkout/pay/enter-card");

        let second = tree.unique_cell_id(candidate.clone());
        assert_eq!(second.as_str(), "epic/checkout/pay/enter-card-2");

        tree.add_child(pay, story("Enter Card", second.as_str())).unwrap();
        let third = tree.unique_cell_id(candidate);
        assert_eq!(third.as_str(), "epic/checkout/pay/enter-card-3");
    }

    #[test]
    fn test_containment_rules_enforced() {
        let (mut tree, epic, _, card) = sample();

        let story_under_epic = tree.add_child(epic, story("Loose", "loose"));
        assert!(matches!(
            story_under_epic,
            Err(DiagramError::InvalidParent { .. })
        ));

        let epic_under_story = tree.add_child(card, node(NodeKind::Epic, "E", "e"));
        assert!(epic_under_story.is_err());

        let sub_epic_as_root = tree.add_root(node(NodeKind::SubEpic, "S", "s"));
        assert!(matches!(sub_epic_as_root, Err(DiagramError::NotARoot(_))));
    }

    #[test]
    fn test_move_to_reparents_atomically() {
        let (mut tree, epic, pay, card) = sample();
        let ship = tree
            .add_child(epic, node(NodeKind::SubEpic, "Ship", "epic/checkout/ship"))
            .unwrap();

        tree.move_to(card, ship).unwrap();

        assert!(tree.children(pay).is_empty());
        assert_eq!(tree.children(ship), [card]);
        assert_eq!(tree.parent(card), Some(ship));
    }

    #[test]
    fn test_move_into_own_subtree_rejected() {
        let (mut tree, epic, pay, _) = sample();
        let inner = tree
            .add_child(pay, node(NodeKind::SubEpic, "Inner", "epic/checkout/pay/inner"))
            .unwrap();

        assert!(matches!(tree.move_to(pay, inner), Err(DiagramError::Cycle(_))));
        assert_eq!(tree.children(epic), [pay]);
    }

    #[test]
    fn test_detached_nodes_are_listed() {
        let (mut tree, epic, pay, card) = sample();
        let orphan = tree.add_detached(story("Orphan", "orphan")).unwrap();
        tree.detach(pay).unwrap();

        assert!(tree.children(epic).is_empty());
        assert_eq!(tree.detached(), [pay, card, orphan]);
        assert_eq!(tree.depth_first(), [epic]);

        tree.move_to(pay, epic).unwrap();
        assert_eq!(tree.detached(), [orphan]);
    }

    #[test]
    fn test_sort_children_by_order() {
        let (mut tree, _, pay, card) = sample();
        let first = tree
            .add_child(pay, story("First", "epic/checkout/pay/first"))
            .unwrap();
        tree.set_sequential_order(card, 2.0).unwrap();
        tree.set_sequential_order(first, 1.0).unwrap();

        tree.sort_children_by(Some(pay), |a, b| {
            a.sequential_order().total_cmp(&b.sequential_order())
        });

        assert_eq!(tree.children(pay), [first, card]);
    }

    #[test]
    fn test_roots_of_kind() {
        let (mut tree, epic, _, _) = sample();
        let lane = tree
            .add_root(node(NodeKind::Increment, "MVP", "increment/mvp"))
            .unwrap();

        assert_eq!(tree.roots_of_kind(NodeKind::Epic).collect::<Vec<_>>(), [epic]);
        assert_eq!(tree.roots_of_kind(NodeKind::Increment).collect::<Vec<_>>(), [lane]);
    }
}

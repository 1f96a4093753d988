//! Sibling-list matching.
//!
//! Each sibling list is matched in four phases:
//!
//! 1. exact name matches;
//! 2. renames: leftovers at the same rank whose names appear nowhere in the
//!    other tree;
//! 3. leftover extracted nodes become new;
//! 4. leftover original nodes become removed.
//!
//! Nodes left over by phases 3 and 4 are held back until the whole tree has
//! been walked, so that a subtree that only changed parent can be paired up
//! as a move instead of being reported as removed in one place and new in
//! another.

use std::collections::HashSet;

use log::{debug, trace, warn};

use storymap_core::story_graph::StoryNodeType;

use crate::sync::{
    report::{Move, NodeChange, Rename, UpdateReport},
    tree::{CompareNode, CompareTree},
};

/// Confidence of a rename when both leftover lists have the same length.
const CONFIDENCE_ALIGNED: f64 = 1.0;
/// Confidence of a rename when the leftover lists differ in length.
const CONFIDENCE_SHIFTED: f64 = 0.75;

/// A node with the name of its parent, `""` for epics and loose stories.
#[derive(Debug, Clone, Copy)]
struct Placed<'a> {
    node: &'a CompareNode,
    parent: &'a str,
}

pub(super) struct Comparison<'a> {
    extracted_names: HashSet<&'a str>,
    original_names: HashSet<&'a str>,
    pending_new: Vec<Placed<'a>>,
    pending_removed: Vec<Placed<'a>>,
    report: UpdateReport,
}

impl<'a> Comparison<'a> {
    pub(super) fn new(extracted: &'a CompareTree, original: &'a CompareTree) -> Self {
        Self {
            extracted_names: extracted.collect_all_names(),
            original_names: original.collect_all_names(),
            pending_new: Vec::new(),
            pending_removed: Vec::new(),
            report: UpdateReport::default(),
        }
    }

    pub(super) fn run(mut self, extracted: &'a CompareTree, original: &'a CompareTree) -> UpdateReport {
        self.compare_siblings(extracted.epics(), original.epics(), "", "");
        self.compare_siblings(extracted.stories(), original.stories(), "", "");
        self.resolve_moves();
        self.flush_pending();
        self.report.finish();
        self.report
    }

    /// Compares one sibling list of a single tier.
    fn compare_siblings(
        &mut self,
        extracted: &'a [CompareNode],
        original: &'a [CompareNode],
        extracted_parent: &'a str,
        original_parent: &'a str,
    ) {
        let extracted = dedup_by_name(ranked(extracted));
        let original = ranked(original);

        let mut extracted_left: Vec<(usize, &'a CompareNode)> = Vec::new();
        let mut original_used = vec![false; original.len()];

        // Phase 1
        for (rank, node) in extracted {
            let found = (0..original.len())
                .find(|&index| !original_used[index] && original[index].1.name() == node.name());
            match found {
                Some(index) => {
                    original_used[index] = true;
                    self.report.matched_count += 1;
                    self.compare_children(node, original[index].1);
                }
                None => extracted_left.push((rank, node)),
            }
        }

        let original_left: Vec<(usize, &'a CompareNode)> = original
            .iter()
            .zip(&original_used)
            .filter(|(_, used)| !**used)
            .map(|(entry, _)| *entry)
            .collect();

        // Phase 2
        let confidence = if extracted_left.len() == original_left.len() {
            CONFIDENCE_ALIGNED
        } else {
            CONFIDENCE_SHIFTED
        };
        let mut original_taken = vec![false; original_left.len()];
        let mut unmatched = Vec::new();
        for (rank, node) in extracted_left {
            let partner = original_left
                .iter()
                .enumerate()
                .find(|(index, (original_rank, candidate))| {
                    !original_taken[*index]
                        && *original_rank == rank
                        && self.may_rename(node, candidate)
                })
                .map(|(index, (_, candidate))| (index, *candidate));
            match partner {
                Some((index, candidate)) => {
                    original_taken[index] = true;
                    trace!(from = candidate.name(), to = node.name(), rank; "Rename detected");
                    self.report.renames.push(Rename {
                        extracted: node.name().to_string(),
                        original: candidate.name().to_string(),
                        confidence,
                        parent: extracted_parent.to_string(),
                        node_type: node.node_type(),
                    });
                    self.compare_children(node, candidate);
                }
                None => unmatched.push(node),
            }
        }

        // Phases 3 and 4, deferred until moves are known.
        self.pending_new.extend(unmatched.into_iter().map(|node| Placed {
            node,
            parent: extracted_parent,
        }));
        self.pending_removed.extend(
            original_left
                .iter()
                .zip(original_taken)
                .filter(|(_, taken)| !taken)
                .map(|((_, node), _)| Placed {
                    node: *node,
                    parent: original_parent,
                }),
        );
    }

    fn compare_children(&mut self, extracted: &'a CompareNode, original: &'a CompareNode) {
        self.compare_siblings(
            extracted.sub_epics(),
            original.sub_epics(),
            extracted.name(),
            original.name(),
        );
        self.compare_siblings(
            extracted.stories(),
            original.stories(),
            extracted.name(),
            original.name(),
        );
    }

    /// A rename needs both names to be unknown on the other side, so a node
    /// that merely moved is never mistaken for a renamed sibling. Containers
    /// drawn by hand in the diagram tool are always new.
    fn may_rename(&self, extracted: &CompareNode, original: &CompareNode) -> bool {
        if extracted.node_type() != original.node_type() {
            return false;
        }
        if extracted.node_type() != StoryNodeType::Story && !extracted.cell_id().is_generated() {
            return false;
        }
        !self.original_names.contains(extracted.name()) && !self.extracted_names.contains(original.name())
    }

    /// Pairs pending new and removed subtrees that share a tier and name.
    ///
    /// Comparing the children of a moved pair can leave more nodes pending,
    /// so this repeats until no pair is found.
    fn resolve_moves(&mut self) {
        loop {
            let pair = self.pending_new.iter().enumerate().find_map(|(new_index, new)| {
                self.pending_removed
                    .iter()
                    .position(|removed| {
                        removed.node.node_type() == new.node.node_type()
                            && removed.node.name() == new.node.name()
                    })
                    .map(|removed_index| (new_index, removed_index))
            });
            let Some((new_index, removed_index)) = pair else {
                break;
            };

            let new = self.pending_new.remove(new_index);
            let removed = self.pending_removed.remove(removed_index);
            trace!(
                name = new.node.name(),
                from = removed.parent,
                to = new.parent;
                "Move detected"
            );
            self.report.matched_count += 1;
            self.report.moves.push(Move {
                name: new.node.name().to_string(),
                node_type: new.node.node_type(),
                from_parent: removed.parent.to_string(),
                to_parent: new.parent.to_string(),
            });
            self.compare_children(new.node, removed.node);
        }
    }

    /// Reports every remaining pending subtree as new or removed.
    fn flush_pending(&mut self) {
        for Placed { node, parent } in std::mem::take(&mut self.pending_new) {
            self.report.new_stories.extend(subtree_changes(node, parent));
        }
        for Placed { node, parent } in std::mem::take(&mut self.pending_removed) {
            match node.node_type() {
                StoryNodeType::Epic => self.report.large_deletions.missing_epics.push(node.name().to_string()),
                StoryNodeType::SubEpic => self
                    .report
                    .large_deletions
                    .missing_sub_epics
                    .push(node.name().to_string()),
                StoryNodeType::Story => {}
            }
            self.report.removed_stories.extend(subtree_changes(node, parent));
        }
        debug!(
            new = self.report.new_stories.len(),
            removed = self.report.removed_stories.len(),
            moves = self.report.moves.len();
            "Unmatched nodes classified"
        );
    }
}

/// Pairs each node with its rank in sequential order.
fn ranked(nodes: &[CompareNode]) -> Vec<(usize, &CompareNode)> {
    let mut sorted: Vec<&CompareNode> = nodes.iter().collect();
    sorted.sort_by(|a, b| a.sequential_order().total_cmp(&b.sequential_order()));
    sorted.into_iter().enumerate().collect()
}

/// Keeps the first node of each name.
fn dedup_by_name(nodes: Vec<(usize, &CompareNode)>) -> Vec<(usize, &CompareNode)> {
    let mut seen = HashSet::new();
    nodes
        .into_iter()
        .filter(|(_, node)| {
            let first = seen.insert(node.name());
            if !first {
                warn!(name = node.name(); "Duplicate sibling name; keeping the first occurrence");
            }
            first
        })
        .collect()
}

/// The node and all its descendants, each with its parent name.
fn subtree_changes(node: &CompareNode, parent: &str) -> Vec<NodeChange> {
    let mut changes = vec![NodeChange {
        name: node.name().to_string(),
        parent: parent.to_string(),
        node_type: node.node_type(),
    }];
    for child in node.sub_epics().iter().chain(node.stories()) {
        changes.extend(subtree_changes(child, node.name()));
    }
    changes
}

#[cfg(test)]
mod tests {
    use storymap_core::story_graph::{Epic, Story, StoryGraph, SubEpic};

    use super::*;

    fn reconcile(extracted: &StoryGraph, original: &StoryGraph) -> UpdateReport {
        let extracted = CompareTree::from_graph(extracted);
        let original = CompareTree::from_graph(original);
        Comparison::new(&extracted, &original).run(&extracted, &original)
    }

    fn single(stories: &[&str]) -> StoryGraph {
        let sub_epic = stories
            .iter()
            .fold(SubEpic::new("Pay"), |sub_epic, name| sub_epic.with_story(Story::new(*name)));
        StoryGraph::new(vec![Epic::new("Checkout").with_sub_epic(sub_epic)], Vec::new())
    }

    #[test]
    fn test_identical_trees() {
        let graph = single(&["A", "B"]);
        let report = reconcile(&graph, &graph);

        assert_eq!(report.matched_count, 4);
        assert!(!report.has_changes());
        assert_eq!(report.status.as_deref(), Some("no_changes"));
    }

    #[test]
    fn test_sole_leftovers_are_renamed() {
        let report = reconcile(&single(&["Sign In"]), &single(&["Login"]));

        assert_eq!(report.renames.len(), 1);
        let rename = &report.renames[0];
        assert_eq!(rename.extracted, "Sign In");
        assert_eq!(rename.original, "Login");
        assert_eq!(rename.parent, "Pay");
        assert_eq!(rename.confidence, 1.0);
        assert!(report.new_stories.is_empty());
        assert!(report.removed_stories.is_empty());
    }

    #[test]
    fn test_misaligned_leftovers_are_not_renamed() {
        // B was deleted from the end, C was inserted at the front.
        let report = reconcile(&single(&["C", "A"]), &single(&["A", "B"]));

        assert!(report.renames.is_empty());
        assert_eq!(report.new_stories[0].name, "C");
        assert_eq!(report.removed_stories[0].name, "B");
    }

    #[test]
    fn test_name_known_elsewhere_blocks_rename() {
        let extracted = StoryGraph::new(
            vec![
                Epic::new("One").with_sub_epic(SubEpic::new("S").with_story(Story::new("Moved"))),
                Epic::new("Two").with_sub_epic(SubEpic::new("T").with_story(Story::new("Stay"))),
            ],
            Vec::new(),
        );
        let original = StoryGraph::new(
            vec![
                Epic::new("One").with_sub_epic(SubEpic::new("S").with_story(Story::new("Old"))),
                Epic::new("Two").with_sub_epic(
                    SubEpic::new("T")
                        .with_story(Story::new("Stay"))
                        .with_story(Story::new("Moved")),
                ),
            ],
            Vec::new(),
        );

        let report = reconcile(&extracted, &original);

        assert!(report.renames.is_empty());
        assert_eq!(report.moves.len(), 1);
        assert_eq!(report.moves[0].from_parent, "T");
        assert_eq!(report.moves[0].to_parent, "S");
        assert_eq!(report.removed_stories.len(), 1);
        assert_eq!(report.removed_stories[0].name, "Old");
    }

    #[test]
    fn test_moved_sub_epic_is_matched() {
        let extracted = StoryGraph::new(
            vec![
                Epic::new("Epic1"),
                Epic::new("Epic2").with_sub_epic(SubEpic::new("Checkout").with_story(Story::new("Pay"))),
            ],
            Vec::new(),
        );
        let original = StoryGraph::new(
            vec![
                Epic::new("Epic1").with_sub_epic(SubEpic::new("Checkout").with_story(Story::new("Pay"))),
                Epic::new("Epic2"),
            ],
            Vec::new(),
        );

        let report = reconcile(&extracted, &original);

        assert_eq!(report.matched_count, 4);
        assert_eq!(
            report.moves,
            [Move {
                name: "Checkout".to_string(),
                node_type: StoryNodeType::SubEpic,
                from_parent: "Epic1".to_string(),
                to_parent: "Epic2".to_string(),
            }]
        );
        assert!(report.new_stories.is_empty());
        assert!(report.removed_stories.is_empty());
        assert!(report.large_deletions.is_empty());
    }

    #[test]
    fn test_removed_branch_is_large_deletion() {
        let extracted = StoryGraph::new(vec![Epic::new("Keep")], Vec::new());
        let original = StoryGraph::new(
            vec![
                Epic::new("Keep"),
                Epic::new("Gone").with_sub_epic(SubEpic::new("Inner").with_story(Story::new("S"))),
            ],
            Vec::new(),
        );

        let report = reconcile(&extracted, &original);

        assert_eq!(report.large_deletions.missing_epics, ["Gone"]);
        assert!(report.large_deletions.missing_sub_epics.is_empty());
        let removed: Vec<_> = report
            .removed_stories
            .iter()
            .map(|change| (change.name.as_str(), change.parent.as_str(), change.node_type))
            .collect();
        assert_eq!(
            removed,
            [
                ("Gone", "", StoryNodeType::Epic),
                ("Inner", "Gone", StoryNodeType::SubEpic),
                ("S", "Inner", StoryNodeType::Story),
            ]
        );
    }

    #[test]
    fn test_new_epic_reports_subtree() {
        let extracted = StoryGraph::new(
            vec![Epic::new("Fresh").with_sub_epic(SubEpic::new("Part").with_story(Story::new("Do")))],
            Vec::new(),
        );
        let report = reconcile(&extracted, &StoryGraph::default());

        assert_eq!(report.new_stories.len(), 3);
        assert_eq!(report.new_stories[0].node_type, StoryNodeType::Epic);
        assert_eq!(report.matched_count, 0);
    }

    #[test]
    fn test_duplicate_extracted_stories_count_once() {
        let report = reconcile(&single(&["A", "A"]), &single(&["A"]));

        assert_eq!(report.matched_count, 3);
        assert!(!report.has_changes());
    }

    #[test]
    fn test_uneven_leftovers_lower_confidence() {
        let report = reconcile(&single(&["Enter Card Number"]), &single(&["Enter Card", "Confirm"]));

        assert_eq!(report.renames.len(), 1);
        assert_eq!(report.renames[0].original, "Enter Card");
        assert_eq!(report.renames[0].confidence, 0.75);
        assert_eq!(report.removed_stories.len(), 1);
        assert_eq!(report.removed_stories[0].name, "Confirm");
    }
}

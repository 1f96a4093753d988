//! Reconciliation of an edited diagram against a story graph.
//!
//! Both sides are reduced to a [`CompareTree`]: a diagram through
//! [`CompareTree::from_diagram`], a story graph through
//! [`CompareTree::from_graph`]. [`reconcile`] then classifies every epic,
//! sub-epic and story into an [`UpdateReport`].
//!
//! Matching is by name first. Unmatched nodes at the same position in their
//! sibling list are reported as renames, but only when neither name occurs
//! anywhere in the other tree; a name that does occur elsewhere points to a
//! move rather than a rename. Whatever is still unmatched is reported as new
//! or removed, with removed epics and sub-epics also listed as large
//! deletions.

mod compare;
mod report;
mod tree;

use log::info;

pub use report::{LargeDeletions, Move, NodeChange, Rename, STATUS_NO_CHANGES, UpdateReport};
pub use tree::{CompareNode, CompareTree};

use compare::Comparison;

/// Compares `extracted` (the edited side) against `original`.
///
/// Deterministic: the same trees always give the same report.
pub fn reconcile(extracted: &CompareTree, original: &CompareTree) -> UpdateReport {
    let report = Comparison::new(extracted, original).run(extracted, original);
    info!(
        extracted = extracted.node_count(),
        original = original.node_count(),
        matched = report.matched_count,
        renames = report.renames.len(),
        new = report.new_stories.len(),
        removed = report.removed_stories.len();
        "Reconciliation finished"
    );
    report
}

use serde::{Deserialize, Serialize};

use storymap_core::story_graph::StoryNodeType;

/// Value of [`UpdateReport::status`] when the trees are identical.
pub const STATUS_NO_CHANGES: &str = "no_changes";

/// A node found under a different name at the same position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rename {
    pub extracted: String,
    pub original: String,
    pub confidence: f64,
    pub parent: String,
    pub node_type: StoryNodeType,
}

/// A node present on only one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeChange {
    pub name: String,
    pub parent: String,
    pub node_type: StoryNodeType,
}

/// A node found under a different parent with its name unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    pub node_type: StoryNodeType,
    pub from_parent: String,
    pub to_parent: String,
}

/// Whole branches that disappeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeDeletions {
    pub missing_epics: Vec<String>,
    pub missing_sub_epics: Vec<String>,
}

impl LargeDeletions {
    pub fn is_empty(&self) -> bool {
        self.missing_epics.is_empty() && self.missing_sub_epics.is_empty()
    }
}

/// Outcome of reconciling an extracted tree against an original one.
///
/// Every node of either tree is accounted for exactly once: matched (by
/// name, in place or moved), renamed, new or removed. The `new_stories` and
/// `removed_stories` lists carry every tier; `node_type` tells them apart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateReport {
    pub matched_count: usize,
    pub renames: Vec<Rename>,
    pub new_stories: Vec<NodeChange>,
    pub removed_stories: Vec<NodeChange>,
    #[serde(default)]
    pub moves: Vec<Move>,
    pub large_deletions: LargeDeletions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl UpdateReport {
    /// Returns true if anything besides exact in-place matches was found.
    pub fn has_changes(&self) -> bool {
        !(self.renames.is_empty()
            && self.new_stories.is_empty()
            && self.removed_stories.is_empty()
            && self.moves.is_empty()
            && self.large_deletions.is_empty())
    }

    /// Sets `status` from the collected changes.
    pub(crate) fn finish(&mut self) {
        self.status = (!self.has_changes()).then(|| STATUS_NO_CHANGES.to_string());
    }

    /// Serializes the report as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization itself fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// One line describing the report, for terminals and logs.
    pub fn summary(&self) -> String {
        if !self.has_changes() {
            return format!("No changes ({} matched)", self.matched_count);
        }
        let mut summary = format!(
            "{} matched, {} renamed, {} new, {} removed, {} moved",
            self.matched_count,
            self.renames.len(),
            self.new_stories.len(),
            self.removed_stories.len(),
            self.moves.len()
        );
        let branches = self.large_deletions.missing_epics.len() + self.large_deletions.missing_sub_epics.len();
        if branches > 0 {
            summary.push_str(&format!("; {branches} whole branch(es) missing"));
        }
        summary
    }
}

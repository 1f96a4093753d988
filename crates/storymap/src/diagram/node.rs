//! Diagram node kinds and the node value stored in the arena.

use std::fmt;

use storymap_core::{
    geometry::{Boundary, Position},
    identifier::CellId,
    story_graph::{StoryNodeType, StoryType},
};

use crate::{
    config::LayoutConfig,
    diagram::rules::{
        ContainerKind, ContainmentRules, FormattingRules, PlacementRules, StyleKey,
    },
};

const SUB_EPIC_PARENTS: &[ContainerKind] = &[ContainerKind::Epic, ContainerKind::SubEpic];
const STORY_PARENTS: &[ContainerKind] = &[ContainerKind::SubEpic, ContainerKind::Increment];
const ACTOR_PARENTS: &[ContainerKind] = &[ContainerKind::SubEpic];
const CRITERION_PARENTS: &[ContainerKind] = &[ContainerKind::Story];

/// The kind of a diagram node.
///
/// Epics, sub-epics and stories mirror the story graph tiers. Increment
/// lanes, actors and acceptance criteria exist only in the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Epic,
    SubEpic,
    Story(StoryType),
    Increment,
    Actor,
    AcceptanceCriterion,
}

impl NodeKind {
    /// Returns the parents this kind may be attached to.
    pub fn containment_rules(self) -> ContainmentRules {
        match self {
            Self::Epic | Self::Increment => ContainmentRules::new(true, &[]),
            Self::SubEpic => ContainmentRules::new(false, SUB_EPIC_PARENTS),
            Self::Story(_) => ContainmentRules::new(false, STORY_PARENTS),
            Self::Actor => ContainmentRules::new(false, ACTOR_PARENTS),
            Self::AcceptanceCriterion => ContainmentRules::new(false, CRITERION_PARENTS),
        }
    }

    /// Returns sizes and gaps for this kind under `config`.
    pub fn placement_rules(self, config: &LayoutConfig) -> PlacementRules {
        PlacementRules::for_kind(self, config)
    }

    pub fn formatting_rules(self) -> FormattingRules {
        FormattingRules::new(self.style_key())
    }

    /// Returns the visual role used to style nodes of this kind.
    pub fn style_key(self) -> StyleKey {
        match self {
            Self::Epic => StyleKey::Epic,
            Self::SubEpic => StyleKey::SubEpic,
            Self::Story(StoryType::User) => StyleKey::StoryUser,
            Self::Story(StoryType::System) => StyleKey::StorySystem,
            Self::Story(StoryType::Technical) => StyleKey::StoryTechnical,
            Self::Increment => StyleKey::IncrementLane,
            Self::Actor => StyleKey::Actor,
            Self::AcceptanceCriterion => StyleKey::AcceptanceCriteria,
        }
    }

    /// Inverse of [`NodeKind::style_key`].
    pub fn from_style_key(key: StyleKey) -> Self {
        match key {
            StyleKey::Epic => Self::Epic,
            StyleKey::SubEpic => Self::SubEpic,
            StyleKey::StoryUser => Self::Story(StoryType::User),
            StyleKey::StorySystem => Self::Story(StoryType::System),
            StyleKey::StoryTechnical => Self::Story(StoryType::Technical),
            StyleKey::IncrementLane => Self::Increment,
            StyleKey::Actor => Self::Actor,
            StyleKey::AcceptanceCriteria => Self::AcceptanceCriterion,
        }
    }

    /// Returns true if an element styled as `key` is a node of this kind.
    pub fn recognizes(self, key: StyleKey) -> bool {
        self.style_key() == key
    }

    /// The story graph tier this kind mirrors, if any.
    pub fn story_node_type(self) -> Option<StoryNodeType> {
        match self {
            Self::Epic => Some(StoryNodeType::Epic),
            Self::SubEpic => Some(StoryNodeType::SubEpic),
            Self::Story(_) => Some(StoryNodeType::Story),
            Self::Increment | Self::Actor | Self::AcceptanceCriterion => None,
        }
    }

    pub(crate) fn container_kind(self) -> Option<ContainerKind> {
        match self {
            Self::Epic => Some(ContainerKind::Epic),
            Self::SubEpic => Some(ContainerKind::SubEpic),
            Self::Story(_) => Some(ContainerKind::Story),
            Self::Increment => Some(ContainerKind::Increment),
            Self::Actor | Self::AcceptanceCriterion => None,
        }
    }

    pub fn is_story(self) -> bool {
        matches!(self, Self::Story(_))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Epic => "epic",
            Self::SubEpic => "sub_epic",
            Self::Story(_) => "story",
            Self::Increment => "increment",
            Self::Actor => "actor",
            Self::AcceptanceCriterion => "acceptance_criterion",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform-agnostic diagram node.
///
/// Parent and child links are owned by [`crate::diagram::DiagramTree`];
/// a node on its own only carries its identity and geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    kind: NodeKind,
    name: String,
    cell_id: CellId,
    sequential_order: f64,
    boundary: Boundary,
}

impl DiagramNode {
    /// Creates a node of `kind` at `boundary`.
    pub fn create(
        kind: NodeKind,
        name: impl Into<String>,
        cell_id: CellId,
        sequential_order: f64,
        boundary: Boundary,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            cell_id,
            sequential_order,
            boundary,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell_id(&self) -> &CellId {
        &self.cell_id
    }

    pub fn sequential_order(&self) -> f64 {
        self.sequential_order
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn position(&self) -> Position {
        self.boundary.position()
    }

    pub fn set_boundary(&mut self, boundary: Boundary) {
        self.boundary = boundary;
    }

    pub fn set_sequential_order(&mut self, order: f64) {
        self.sequential_order = order;
    }
}

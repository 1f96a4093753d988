//! Per-kind policy objects: containment, placement and formatting.
//!
//! Each [`NodeKind`] selects one value of each rule type. The rules are
//! plain data so the layout engine, the loader and the writer can consult
//! them without knowing which concrete kind they are handling.

use std::fmt;

use storymap_core::geometry::Size;

use crate::{config::LayoutConfig, diagram::NodeKind};

/// Node kinds that may act as a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Epic,
    SubEpic,
    Story,
    Increment,
}

/// Which parents a node kind may be attached to.
#[derive(Debug, Clone, Copy)]
pub struct ContainmentRules {
    may_be_root: bool,
    allowed_parents: &'static [ContainerKind],
}

impl ContainmentRules {
    pub(crate) const fn new(may_be_root: bool, allowed_parents: &'static [ContainerKind]) -> Self {
        Self {
            may_be_root,
            allowed_parents,
        }
    }

    /// Returns true if nodes of this kind may sit at the top level.
    pub fn may_be_root(&self) -> bool {
        self.may_be_root
    }

    /// Returns true if nodes of this kind may be children of `parent`.
    pub fn allows_parent(&self, parent: NodeKind) -> bool {
        parent
            .container_kind()
            .is_some_and(|kind| self.allowed_parents.contains(&kind))
    }

    pub fn allowed_parents(&self) -> &'static [ContainerKind] {
        self.allowed_parents
    }
}

/// Sizing and spacing policy for a node kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRules {
    default_size: Size,
    padding: f32,
    spacing: f32,
}

impl PlacementRules {
    pub(crate) fn new(default_size: Size, padding: f32, spacing: f32) -> Self {
        Self {
            default_size,
            padding,
            spacing,
        }
    }

    /// Size of a leaf node, or the minimum size of an empty container.
    pub fn default_size(&self) -> Size {
        self.default_size
    }

    /// Gap between the node's edge and its first child.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Gap between this node and its next sibling.
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub(crate) fn for_kind(kind: NodeKind, config: &LayoutConfig) -> Self {
        match kind {
            NodeKind::Epic => Self::new(
                Size::new(config.empty_container_width(), config.epic_height()),
                config.bar_padding(),
                config.epic_spacing(),
            ),
            NodeKind::SubEpic => Self::new(
                Size::new(config.cell_size(), config.sub_epic_height()),
                config.bar_padding(),
                config.cell_spacing(),
            ),
            NodeKind::Story(_) => Self::new(
                Size::new(config.cell_size(), config.cell_size()),
                0.0,
                config.cell_spacing(),
            ),
            NodeKind::Increment => Self::new(
                Size::new(config.lane_label_width(), config.lane_height()),
                config.bar_padding(),
                config.lane_gap(),
            ),
            NodeKind::Actor => Self::new(
                Size::new(config.cell_size(), config.actor_height()),
                0.0,
                config.cell_spacing(),
            ),
            NodeKind::AcceptanceCriterion => Self::new(
                Size::new(
                    config.ac_min_width(),
                    config.ac_line_height() + 2.0 * config.ac_padding(),
                ),
                config.ac_padding(),
                config.ac_spacing(),
            ),
        }
    }
}

/// Visual role of a node; the diagram format maps each key to concrete colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    Epic,
    SubEpic,
    StoryUser,
    StorySystem,
    StoryTechnical,
    Actor,
    AcceptanceCriteria,
    IncrementLane,
}

impl StyleKey {
    /// Every style key, in the order of the default style table.
    pub const ALL: [StyleKey; 8] = [
        StyleKey::Epic,
        StyleKey::SubEpic,
        StyleKey::StoryUser,
        StyleKey::StorySystem,
        StyleKey::StoryTechnical,
        StyleKey::Actor,
        StyleKey::AcceptanceCriteria,
        StyleKey::IncrementLane,
    ];

    /// Returns the snake_case name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Epic => "epic",
            Self::SubEpic => "sub_epic",
            Self::StoryUser => "story_user",
            Self::StorySystem => "story_system",
            Self::StoryTechnical => "story_technical",
            Self::Actor => "actor",
            Self::AcceptanceCriteria => "acceptance_criteria",
            Self::IncrementLane => "increment_lane",
        }
    }

    /// Looks a key up by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formatting policy for a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingRules {
    style_key: StyleKey,
}

impl FormattingRules {
    pub(crate) fn new(style_key: StyleKey) -> Self {
        Self { style_key }
    }

    pub fn style_key(&self) -> StyleKey {
        self.style_key
    }
}

//! Layout engine: turns a story graph into a positioned [`DiagramTree`].
//!
//! Three render modes share the same placement core:
//!
//! - [`RenderMode::Outline`] draws the epic / sub-epic / story hierarchy with
//!   actors above the stories that introduce them.
//! - [`RenderMode::Increments`] draws one horizontal lane per increment
//!   holding copies of its stories, aligned with their outline x positions.
//! - [`RenderMode::Exploration`] is the outline with acceptance criteria
//!   stacked below each story.
//!
//! Positions found in [`LayoutData`] always win over computed ones.

mod exploration;
mod increments;
mod outline;
mod rows;

use std::{fmt, str::FromStr};

use log::{debug, info};

use storymap_core::story_graph::StoryGraph;

use crate::{
    config::LayoutConfig,
    diagram::{DiagramError, DiagramTree},
    layout_data::LayoutData,
};

pub use exploration::criterion_size;
pub use rows::RowPositions;

use outline::OutlineRenderer;

/// Which view of the story graph to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Outline,
    Increments,
    Exploration,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outline => "outline",
            Self::Increments => "increments",
            Self::Exploration => "exploration",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outline" => Ok(Self::Outline),
            "increments" => Ok(Self::Increments),
            "exploration" => Ok(Self::Exploration),
            other => Err(format!(
                "unknown render mode `{other}`, expected outline, increments or exploration"
            )),
        }
    }
}

/// Positions story graph nodes using a [`LayoutConfig`] and previously
/// saved [`LayoutData`].
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
    saved: &'a LayoutData,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a LayoutConfig, saved: &'a LayoutData) -> Self {
        Self { config, saved }
    }

    /// Renders `graph` in the given mode.
    ///
    /// # Errors
    ///
    /// Returns a [`DiagramError`] if the tree rejects a node. That only
    /// happens if the containment rules and the renderer disagree.
    pub fn render(&self, graph: &StoryGraph, mode: RenderMode) -> Result<DiagramTree, DiagramError> {
        let tree = match mode {
            RenderMode::Outline => self.render_outline(graph)?,
            RenderMode::Increments => self.render_increments(graph)?,
            RenderMode::Exploration => self.render_exploration(graph)?,
        };
        info!(
            mode = mode.as_str(),
            nodes = tree.len(),
            saved = self.saved.len();
            "Story graph laid out"
        );
        Ok(tree)
    }

    /// Lays out epics, sub-epics, actors and stories.
    ///
    /// # Errors
    ///
    /// See [`LayoutEngine::render`].
    pub fn render_outline(&self, graph: &StoryGraph) -> Result<DiagramTree, DiagramError> {
        let outline = OutlineRenderer::new(self.config, self.saved, graph, false).render(graph)?;
        debug!(stories = outline.stories.len(); "Outline placed");
        Ok(outline.tree)
    }

    /// Lays out one lane per increment.
    ///
    /// # Errors
    ///
    /// See [`LayoutEngine::render`].
    pub fn render_increments(&self, graph: &StoryGraph) -> Result<DiagramTree, DiagramError> {
        let outline = OutlineRenderer::new(self.config, self.saved, graph, false).render(graph)?;
        let tree = increments::render_lanes(graph, &outline, self.config, self.saved)?;
        debug!(lanes = tree.roots().len(); "Increment lanes placed");
        Ok(tree)
    }

    /// Lays out the outline with acceptance criteria under each story.
    ///
    /// # Errors
    ///
    /// See [`LayoutEngine::render`].
    pub fn render_exploration(&self, graph: &StoryGraph) -> Result<DiagramTree, DiagramError> {
        let outline = OutlineRenderer::new(self.config, self.saved, graph, true).render(graph)?;
        debug!(stories = outline.stories.len(); "Exploration placed");
        Ok(outline.tree)
    }
}

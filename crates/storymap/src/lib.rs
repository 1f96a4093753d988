//! Storymap - Story map diagrams that stay in sync with their story graph
//!
//! This library lays out a story graph (epics, sub-epics, stories and
//! increments) as a DrawIO diagram, reads hand-edited diagrams back into a
//! node tree, keeps manually arranged positions across re-renders, and
//! reconciles an edited diagram against the story graph it came from.
//!
//! The pipeline has four stages:
//!
//! - [`layout`] positions story graph nodes into a [`diagram::DiagramTree`].
//! - [`drawio`] writes that tree as DrawIO XML and reads it back.
//! - [`layout_data`] saves node geometry next to the diagram so that the
//!   next render keeps it.
//! - [`sync`] diffs a loaded diagram against a story graph.
//!
//! [`DiagramSync`] ties the stages together.

pub mod config;
pub mod diagram;
pub mod drawio;
pub mod layout;
pub mod layout_data;
pub mod sync;

mod error;

pub use storymap_core::{color, geometry, identifier, story_graph};

pub use error::StoryMapError;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use config::AppConfig;
use diagram::DiagramTree;
use drawio::StyleTable;
use layout::{LayoutEngine, RenderMode};
use layout_data::LayoutData;
use story_graph::StoryGraph;
use sync::{CompareTree, UpdateReport};

/// Entry point for rendering, loading and reconciling story maps.
///
/// # Examples
///
/// ```rust,no_run
/// use storymap::{DiagramSync, config::AppConfig, layout::RenderMode, layout_data::LayoutData};
/// use storymap::story_graph::StoryGraph;
///
/// let sync = DiagramSync::new(AppConfig::default()).expect("valid config");
/// let graph = StoryGraph::from_path("backlog.json").expect("readable graph");
///
/// let tree = sync
///     .render(&graph, RenderMode::Outline, &LayoutData::new())
///     .expect("layout succeeds");
/// let xml = sync.to_xml(&tree).expect("serializable tree");
/// println!("{xml}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiagramSync {
    config: AppConfig,
    styles: StyleTable,
}

impl DiagramSync {
    /// Creates a new instance after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoryMapError::Config`] if a layout value is out of range or
    /// the style overrides are unknown, invalid or make two kinds share a
    /// fill colour.
    pub fn new(config: AppConfig) -> Result<Self, StoryMapError> {
        config.layout().validate().map_err(StoryMapError::Config)?;
        let styles = StyleTable::from_config(config.style()).map_err(StoryMapError::Config)?;
        Ok(Self { config, styles })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Lays out `graph`, keeping every position found in `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`StoryMapError::Diagram`] if the layout produces a tree that
    /// breaks containment rules.
    pub fn render(
        &self,
        graph: &StoryGraph,
        mode: RenderMode,
        layout: &LayoutData,
    ) -> Result<DiagramTree, StoryMapError> {
        info!(mode = mode.as_str(), nodes = graph.node_count(); "Rendering story graph");
        let engine = LayoutEngine::new(self.config.layout(), layout);
        Ok(engine.render(graph, mode)?)
    }

    /// Serializes a tree as DrawIO XML.
    ///
    /// # Errors
    ///
    /// Returns [`StoryMapError::DrawIo`] if the XML cannot be written.
    pub fn to_xml(&self, tree: &DiagramTree) -> Result<String, StoryMapError> {
        Ok(drawio::write_tree(tree, &self.styles)?)
    }

    /// Renders `graph` and writes the diagram to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if layout, serialization or the file write fails.
    pub fn write_diagram(
        &self,
        graph: &StoryGraph,
        mode: RenderMode,
        path: &Path,
        layout: &LayoutData,
    ) -> Result<DiagramTree, StoryMapError> {
        let tree = self.render(graph, mode, layout)?;
        let xml = self.to_xml(&tree)?;
        fs::write(path, xml)?;
        info!(path:? = path, nodes = tree.len(); "Diagram written");
        Ok(tree)
    }

    /// Loads the layout sidecar belonging to `diagram_path`, or empty layout
    /// data if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the sidecar exists but cannot be read.
    pub fn load_layout(&self, diagram_path: &Path) -> Result<LayoutData, StoryMapError> {
        LayoutData::load(&LayoutData::sidecar_path(diagram_path))
    }

    /// Parses DrawIO XML into a node tree.
    ///
    /// # Errors
    ///
    /// Returns [`StoryMapError::DrawIo`] if the document is not well-formed
    /// or uses an unsupported encoding.
    pub fn parse_diagram(&self, xml: &str) -> Result<DiagramTree, StoryMapError> {
        let tree = drawio::read_tree(xml, &self.styles)?;
        debug!(nodes = tree.len(), detached = tree.detached().len(); "Diagram parsed");
        Ok(tree)
    }

    /// Reads and parses a DrawIO file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_diagram(&self, path: &Path) -> Result<DiagramTree, StoryMapError> {
        let xml = fs::read_to_string(path)?;
        let tree = self.parse_diagram(&xml)?;
        info!(path:? = path, nodes = tree.len(); "Diagram loaded");
        Ok(tree)
    }

    /// Captures the geometry of every node in `tree`.
    pub fn extract_layout(&self, tree: &DiagramTree) -> LayoutData {
        LayoutData::extract(tree)
    }

    /// Reads the diagram at `diagram_path` and saves its geometry to
    /// `output`, or to the diagram's sidecar when `output` is `None`.
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if the diagram cannot be loaded or the layout file
    /// cannot be written.
    pub fn save_layout(
        &self,
        diagram_path: &Path,
        output: Option<&Path>,
    ) -> Result<PathBuf, StoryMapError> {
        let tree = self.load_diagram(diagram_path)?;
        let layout = self.extract_layout(&tree);
        let target = output.map_or_else(|| LayoutData::sidecar_path(diagram_path), Path::to_path_buf);
        layout.save(&target)?;
        Ok(target)
    }

    /// Reconciles a loaded diagram against the story graph it was drawn
    /// from. The diagram is the edited side.
    ///
    /// A diagram drawn as increment lanes is compared story by story against
    /// the stories the graph schedules into increments.
    pub fn reconcile(&self, diagram: &DiagramTree, graph: &StoryGraph) -> UpdateReport {
        let extracted = CompareTree::from_diagram(diagram);
        let original = if extracted.is_story_level() {
            debug!(stories = extracted.stories().len(); "Reconciling increment lanes at story level");
            CompareTree::from_increments(graph)
        } else {
            CompareTree::from_graph(graph)
        };
        sync::reconcile(&extracted, &original)
    }

    /// Loads a diagram file and a story graph file and reconciles them.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed.
    pub fn reconcile_diagram(
        &self,
        diagram_path: &Path,
        graph_path: &Path,
    ) -> Result<UpdateReport, StoryMapError> {
        let diagram = self.load_diagram(diagram_path)?;
        let graph = StoryGraph::from_path(graph_path)?;
        let report = self.reconcile(&diagram, &graph);
        info!(summary = report.summary().as_str(); "Diagram reconciled");
        Ok(report)
    }
}

//! Saved node geometry keyed by cell id.
//!
//! Layout data is a flat JSON object written next to the diagram as
//! `<diagram-stem>-layout.json`:
//!
//! ```json
//! { "epic/checkout": { "x": 20, "y": 20, "width": 150, "height": 170 } }
//! ```
//!
//! The layout engine consults it before computing any position, so boxes
//! the user arranged by hand stay where they were put. Entries are plain
//! snapshots; a stale key is simply reused if the node still exists.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use storymap_core::geometry::Boundary;

use crate::{diagram::DiagramTree, error::StoryMapError};

/// One saved rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<Boundary> for LayoutEntry {
    fn from(boundary: Boundary) -> Self {
        Self {
            x: boundary.x(),
            y: boundary.y(),
            width: boundary.width(),
            height: boundary.height(),
        }
    }
}

impl From<LayoutEntry> for Boundary {
    fn from(entry: LayoutEntry) -> Self {
        Boundary::new(entry.x, entry.y, entry.width, entry.height)
    }
}

/// Map from cell id to saved geometry, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutData {
    entries: IndexMap<String, LayoutEntry>,
}

impl LayoutData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sidecar path for a diagram: `<stem>-layout.json` in the
    /// same directory.
    ///
    /// ```
    /// # use std::path::Path;
    /// # use storymap::layout_data::LayoutData;
    /// let path = LayoutData::sidecar_path(Path::new("maps/checkout.drawio"));
    /// assert_eq!(path, Path::new("maps/checkout-layout.json"));
    /// ```
    pub fn sidecar_path(diagram_path: &Path) -> PathBuf {
        let stem = diagram_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "diagram".to_string());
        diagram_path.with_file_name(format!("{stem}-layout.json"))
    }

    /// Reads layout data from `path`. A missing file yields empty data.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, StoryMapError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path:? = path; "No layout data found");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        let data: Self = serde_json::from_str(&content)?;
        info!(path:? = path, entries = data.len(); "Layout data loaded");
        Ok(data)
    }

    /// Writes layout data to `path`, replacing it atomically.
    ///
    /// The JSON is written to a temporary file in the target directory and
    /// renamed over the destination. Concurrent writers race; the last
    /// rename wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), StoryMapError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let json = serde_json::to_string_pretty(self)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.persist(path)?;

        info!(path:? = path, entries = self.len(); "Layout data saved");
        Ok(())
    }

    /// Captures the geometry of every node in `tree`, detached ones included.
    pub fn extract(tree: &DiagramTree) -> Self {
        let entries = tree
            .iter()
            .map(|(_, node)| (node.cell_id().to_string(), node.boundary().into()))
            .collect();
        Self { entries }
    }

    /// Returns the saved boundary for `cell_id`.
    pub fn get(&self, cell_id: &str) -> Option<Boundary> {
        self.entries.get(cell_id).copied().map(Boundary::from)
    }

    pub fn insert(&mut self, cell_id: impl Into<String>, boundary: Boundary) {
        self.entries.insert(cell_id.into(), boundary.into());
    }

    /// Adds every entry of `newer`, replacing existing keys.
    pub fn merge(&mut self, newer: LayoutData) {
        self.entries.extend(newer.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates cell ids and boundaries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Boundary)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.as_str(), Boundary::from(*entry)))
    }
}

#[cfg(test)]
mod tests {
    use storymap_core::identifier::CellId;

    use super::*;
    use crate::diagram::{DiagramNode, NodeKind};

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let data = LayoutData::load(&dir.path().join("absent-layout.json")).unwrap();

        assert!(data.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map-layout.json");
        let mut data = LayoutData::new();
        data.insert("epic/checkout", Boundary::new(20.0, 20.0, 150.0, 170.5));
        data.insert("epic/checkout/pay", Boundary::new(30.0, 70.0, 130.0, 110.0));

        data.save(&path).unwrap();
        let loaded = LayoutData::load(&path).unwrap();

        assert_eq!(loaded, data);
        assert_eq!(
            loaded.iter().map(|(key, _)| key).collect::<Vec<_>>(),
            ["epic/checkout", "epic/checkout/pay"]
        );
    }

    #[test]
    fn test_json_shape() {
        let mut data = LayoutData::new();
        data.insert("a", Boundary::new(1.0, 2.0, 3.0, 4.0));

        let json: serde_json::Value = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"a": {"x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0}})
        );
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad-layout.json");
        fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(
            LayoutData::load(&path),
            Err(StoryMapError::Json(_))
        ));
    }

    #[test]
    fn test_merge_prefers_newer() {
        let mut older = LayoutData::new();
        older.insert("a", Boundary::new(0.0, 0.0, 10.0, 10.0));
        older.insert("b", Boundary::new(0.0, 0.0, 10.0, 10.0));
        let mut newer = LayoutData::new();
        newer.insert("b", Boundary::new(5.0, 5.0, 10.0, 10.0));

        older.merge(newer);

        assert_eq!(older.len(), 2);
        assert_eq!(older.get("b"), Some(Boundary::new(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn test_extract_includes_detached_nodes() {
        let mut tree = DiagramTree::new();
        tree.add_root(DiagramNode::create(
            NodeKind::Epic,
            "E",
            CellId::epic("E"),
            1.0,
            Boundary::new(0.0, 0.0, 100.0, 40.0),
        ))
        .unwrap();
        tree.add_detached(DiagramNode::create(
            NodeKind::SubEpic,
            "Loose",
            CellId::new("loose"),
            1.0,
            Boundary::new(500.0, 500.0, 50.0, 40.0),
        ))
        .unwrap();

        let data = LayoutData::extract(&tree);

        assert_eq!(data.len(), 2);
        assert_eq!(data.get("loose"), Some(Boundary::new(500.0, 500.0, 50.0, 40.0)));
    }

    #[test]
    fn test_sidecar_path_without_directory() {
        assert_eq!(
            LayoutData::sidecar_path(Path::new("map.drawio")),
            PathBuf::from("map-layout.json")
        );
    }
}

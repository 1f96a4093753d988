//! Error types for Storymap operations.
//!
//! This module provides the main error type [`StoryMapError`] which wraps
//! the failures that can occur while rendering, loading or reconciling a
//! story map. Data-shape anomalies inside a diagram (unknown styles,
//! orphaned cells, malformed geometry) are not errors; they are logged and
//! the affected cell is skipped.

use std::io;

use thiserror::Error;

use storymap_core::story_graph::StoryGraphError;

use crate::{diagram::DiagramError, drawio::DrawIoError};

/// The main error type for Storymap operations.
#[derive(Debug, Error)]
pub enum StoryMapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Story graph error: {0}")]
    StoryGraph(#[from] StoryGraphError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Diagram format error: {0}")]
    DrawIo(#[from] DrawIoError),

    #[error("Diagram structure error: {0}")]
    Diagram(#[from] DiagramError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<tempfile::PersistError> for StoryMapError {
    fn from(error: tempfile::PersistError) -> Self {
        Self::Io(error.error)
    }
}

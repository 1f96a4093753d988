//! Error adapter for converting StoryMapError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use storymap::{StoryMapError, drawio::DrawIoError};

/// Adapter giving a [`StoryMapError`] a stable diagnostic code and, where
/// one is useful, a hint.
pub struct ErrorAdapter<'a>(pub &'a StoryMapError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            StoryMapError::Io(_) => "storymap::io",
            StoryMapError::StoryGraph(_) => "storymap::story_graph",
            StoryMapError::Json(_) => "storymap::json",
            StoryMapError::DrawIo(_) => "storymap::xml",
            StoryMapError::Diagram(_) => "storymap::diagram",
            StoryMapError::Config(_) => "storymap::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            StoryMapError::DrawIo(DrawIoError::Unsupported(_)) => {
                "Open the diagram in DrawIO and save it with File > Properties > Compressed unchecked"
            }
            StoryMapError::Json(_) => {
                "Check the layout file or regenerate it with `storymap save-layout`"
            }
            StoryMapError::Config(_) => "Check the [layout] and [style] sections of the configuration file",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

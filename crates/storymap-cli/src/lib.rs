//! Storymap CLI library
//!
//! This module contains the core CLI logic for the Storymap diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{fs, path::Path};

use log::info;

use storymap::{DiagramSync, StoryMapError, layout_data::LayoutData, story_graph::StoryGraph};

/// Run the Storymap CLI application
///
/// Dispatches the parsed subcommand to the matching [`DiagramSync`]
/// operation.
///
/// # Errors
///
/// Returns `StoryMapError` for:
/// - File I/O errors
/// - Configuration loading or validation errors
/// - Story graph, layout data or diagram parsing errors
pub fn run(args: &Args) -> Result<(), StoryMapError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let sync = DiagramSync::new(app_config)?;

    match &args.command {
        Command::Render {
            graph,
            output,
            mode,
            layout,
        } => {
            info!(graph_path = graph, output_path = output, mode = mode.as_str(); "Rendering story map");
            let story_graph = StoryGraph::from_path(graph)?;
            let layout = match layout {
                Some(path) => LayoutData::load(Path::new(path))?,
                None => sync.load_layout(Path::new(output))?,
            };
            let tree = sync.write_diagram(&story_graph, *mode, Path::new(output), &layout)?;
            info!(output_file = output, nodes = tree.len(); "Diagram exported successfully");
        }
        Command::SaveLayout { diagram, output } => {
            let path = sync.save_layout(Path::new(diagram), output.as_deref().map(Path::new))?;
            info!(layout_file = path.display().to_string(); "Layout saved successfully");
        }
        Command::Reconcile {
            diagram,
            graph,
            output,
        } => {
            let report = sync.reconcile_diagram(Path::new(diagram), Path::new(graph))?;
            let json = report.to_json_pretty()?;
            match output {
                Some(path) => {
                    fs::write(path, json)?;
                    info!(report_file = path; "Report written");
                }
                None => println!("{json}"),
            }
            info!(summary = report.summary().as_str(); "Reconciliation complete");
        }
    }

    Ok(())
}

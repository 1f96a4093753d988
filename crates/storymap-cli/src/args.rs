//! Command-line argument definitions for the Storymap CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Each subcommand maps to one [`storymap::DiagramSync`]
//! operation; configuration file selection and logging verbosity are global.

use clap::{Parser, Subcommand};

use storymap::layout::RenderMode;

/// Command-line arguments for the Storymap diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

/// Operations offered by the CLI
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lay out a story graph and write it as a DrawIO diagram
    Render {
        /// Path to the story graph JSON file
        graph: String,

        /// Path to the output DrawIO file
        #[arg(short, long, default_value = "storymap.drawio")]
        output: String,

        /// Diagram view: outline, increments or exploration
        #[arg(short, long, default_value = "outline")]
        mode: RenderMode,

        /// Layout file to honour instead of the output's sidecar
        #[arg(short, long)]
        layout: Option<String>,
    },

    /// Save the node positions of a diagram for later renders
    SaveLayout {
        /// Path to the DrawIO file
        diagram: String,

        /// Path to the layout file (defaults to `<diagram-stem>-layout.json`)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Compare an edited diagram against its story graph
    Reconcile {
        /// Path to the DrawIO file
        diagram: String,

        /// Path to the story graph JSON file
        graph: String,

        /// Path to the report JSON file (printed to stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

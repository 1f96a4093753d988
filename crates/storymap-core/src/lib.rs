//! Storymap Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Storymap
//! diagram synchronization crates. It includes:
//!
//! - **Geometry**: Immutable positions, sizes and boundaries ([`geometry`] module)
//! - **Colors**: CSS colour parsing with normalised hex output ([`color::Color`])
//! - **Identifiers**: Slugs and hierarchical cell ids ([`identifier`] module)
//! - **Story graph**: The read-only epic/sub-epic/story domain model ([`story_graph`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod story_graph;

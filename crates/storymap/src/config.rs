//! Configuration types for story map rendering.
//!
//! This module provides configuration structures that control how story
//! maps are laid out and styled. All types implement [`serde::Deserialize`]
//! for loading from external sources, and every field falls back to its
//! default when absent.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Row positions, cell sizes and spacing used by the layout engine.
//! - [`StyleConfig`] - Per-style colour overrides applied on top of the built-in defaults.
//!
//! # Example
//!
//! ```
//! # use storymap::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().cell_size(), 50.0);
//! assert!(config.style().overrides().is_empty());
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Geometry constants for the row-based story map layout.
///
/// Rows are fixed by hierarchy level: the epic row, one row per sub-epic
/// nesting level, an actor row and finally the story row. See
/// [`crate::layout`] for how these values combine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Left edge of the first epic.
    x_start: f32,
    /// Top edge of every epic.
    epic_y: f32,
    /// Height of the epic header band.
    epic_height: f32,
    /// Height of each sub-epic header band.
    sub_epic_height: f32,
    /// Vertical gap between rows.
    row_gap: f32,
    /// Height of the actor row.
    actor_height: f32,
    /// Width and height of a story cell.
    cell_size: f32,
    /// Horizontal gap between sibling cells and containers.
    cell_spacing: f32,
    /// Inner padding between a container edge and its children.
    bar_padding: f32,
    /// Horizontal gap between epics.
    epic_spacing: f32,
    /// Width given to an epic without sub-epics.
    empty_container_width: f32,
    /// Height of an increment lane.
    lane_height: f32,
    /// Width reserved at the left of each lane for its title.
    lane_label_width: f32,
    /// Vertical gap between increment lanes.
    lane_gap: f32,
    /// Narrowest acceptance criterion box.
    ac_min_width: f32,
    /// Widest acceptance criterion box before text wraps.
    ac_max_width: f32,
    /// Estimated average glyph width used to size acceptance criteria.
    ac_char_width: f32,
    /// Height of one wrapped line of acceptance criterion text.
    ac_line_height: f32,
    /// Padding inside an acceptance criterion box.
    ac_padding: f32,
    /// Vertical gap between stacked acceptance criteria.
    ac_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            x_start: 20.0,
            epic_y: 20.0,
            epic_height: 40.0,
            sub_epic_height: 40.0,
            row_gap: 10.0,
            actor_height: 40.0,
            cell_size: 50.0,
            cell_spacing: 10.0,
            bar_padding: 10.0,
            epic_spacing: 20.0,
            empty_container_width: 100.0,
            lane_height: 80.0,
            lane_label_width: 120.0,
            lane_gap: 10.0,
            ac_min_width: 120.0,
            ac_max_width: 240.0,
            ac_char_width: 6.5,
            ac_line_height: 16.0,
            ac_padding: 8.0,
            ac_spacing: 6.0,
        }
    }
}

impl LayoutConfig {
    pub fn x_start(&self) -> f32 {
        self.x_start
    }

    pub fn epic_y(&self) -> f32 {
        self.epic_y
    }

    pub fn epic_height(&self) -> f32 {
        self.epic_height
    }

    pub fn sub_epic_height(&self) -> f32 {
        self.sub_epic_height
    }

    pub fn row_gap(&self) -> f32 {
        self.row_gap
    }

    pub fn actor_height(&self) -> f32 {
        self.actor_height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cell_spacing(&self) -> f32 {
        self.cell_spacing
    }

    pub fn bar_padding(&self) -> f32 {
        self.bar_padding
    }

    pub fn epic_spacing(&self) -> f32 {
        self.epic_spacing
    }

    pub fn empty_container_width(&self) -> f32 {
        self.empty_container_width
    }

    pub fn lane_height(&self) -> f32 {
        self.lane_height
    }

    pub fn lane_label_width(&self) -> f32 {
        self.lane_label_width
    }

    pub fn lane_gap(&self) -> f32 {
        self.lane_gap
    }

    pub fn ac_min_width(&self) -> f32 {
        self.ac_min_width
    }

    pub fn ac_max_width(&self) -> f32 {
        self.ac_max_width
    }

    pub fn ac_char_width(&self) -> f32 {
        self.ac_char_width
    }

    pub fn ac_line_height(&self) -> f32 {
        self.ac_line_height
    }

    pub fn ac_padding(&self) -> f32 {
        self.ac_padding
    }

    pub fn ac_spacing(&self) -> f32 {
        self.ac_spacing
    }

    /// Checks that every size is positive and every gap non-negative.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("epic_height", self.epic_height),
            ("sub_epic_height", self.sub_epic_height),
            ("actor_height", self.actor_height),
            ("cell_size", self.cell_size),
            ("empty_container_width", self.empty_container_width),
            ("lane_height", self.lane_height),
            ("ac_min_width", self.ac_min_width),
            ("ac_char_width", self.ac_char_width),
            ("ac_line_height", self.ac_line_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(format!("layout.{name} must be positive, got {value}"));
            }
        }

        let non_negative = [
            ("row_gap", self.row_gap),
            ("cell_spacing", self.cell_spacing),
            ("bar_padding", self.bar_padding),
            ("epic_spacing", self.epic_spacing),
            ("lane_label_width", self.lane_label_width),
            ("lane_gap", self.lane_gap),
            ("ac_padding", self.ac_padding),
            ("ac_spacing", self.ac_spacing),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(format!("layout.{name} must not be negative, got {value}"));
            }
        }

        if self.ac_max_width < self.ac_min_width {
            return Err(format!(
                "layout.ac_max_width ({}) is smaller than layout.ac_min_width ({})",
                self.ac_max_width, self.ac_min_width
            ));
        }

        Ok(())
    }
}

/// Colour overrides for a single style key.
///
/// Unset fields keep the built-in default for that key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColorOverride {
    #[serde(default)]
    fill_color: Option<String>,
    #[serde(default)]
    stroke_color: Option<String>,
    #[serde(default)]
    font_color: Option<String>,
}

impl ColorOverride {
    pub fn new(
        fill_color: Option<String>,
        stroke_color: Option<String>,
        font_color: Option<String>,
    ) -> Self {
        Self {
            fill_color,
            stroke_color,
            font_color,
        }
    }

    pub fn fill_color(&self) -> Option<&str> {
        self.fill_color.as_deref()
    }

    pub fn stroke_color(&self) -> Option<&str> {
        self.stroke_color.as_deref()
    }

    pub fn font_color(&self) -> Option<&str> {
        self.font_color.as_deref()
    }
}

/// Visual styling configuration.
///
/// Keys are style names such as `epic`, `sub_epic` or `story_user`
/// (see [`crate::diagram::StyleKey`]).
///
/// ```toml
/// [style.overrides.epic]
/// fill_color = "#ede7f6"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    overrides: IndexMap<String, ColorOverride>,
}

impl StyleConfig {
    pub fn new(overrides: IndexMap<String, ColorOverride>) -> Self {
        Self { overrides }
    }

    /// Returns the configured overrides keyed by style name.
    pub fn overrides(&self) -> &IndexMap<String, ColorOverride> {
        &self.overrides
    }
}

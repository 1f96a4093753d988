//! Acceptance criterion box sizing.
//!
//! There is no font engine here, so text extent is estimated from the
//! character count and an average glyph width.

use storymap_core::{geometry::Size, story_graph::Story};

use crate::config::LayoutConfig;

/// Size of the box holding one acceptance criterion.
///
/// The width grows with the text up to `ac_max_width`; longer text wraps and
/// grows the height one line at a time.
pub fn criterion_size(text: &str, config: &LayoutConfig) -> Size {
    let padding = config.ac_padding();
    let text_width = text.chars().count() as f32 * config.ac_char_width();
    let width = (text_width + 2.0 * padding).clamp(config.ac_min_width(), config.ac_max_width());

    let line_width = (width - 2.0 * padding).max(1.0);
    let lines = (text_width / line_width).ceil().max(1.0);
    let height = lines * config.ac_line_height() + 2.0 * padding;

    Size::new(width, height)
}

/// Horizontal room a story needs: its cell, or its widest criterion box.
pub fn story_slot_width(story: &Story, config: &LayoutConfig) -> f32 {
    story
        .acceptance_criteria()
        .iter()
        .map(|criterion| criterion_size(criterion.text(), config).width())
        .fold(config.cell_size(), f32::max)
}

/// Vertical room taken below a story by its stacked criteria, including the
/// gap to the story.
pub fn criteria_stack_height(story: &Story, config: &LayoutConfig) -> f32 {
    let criteria = story.acceptance_criteria();
    if criteria.is_empty() {
        return 0.0;
    }
    let boxes: f32 = criteria
        .iter()
        .map(|criterion| criterion_size(criterion.text(), config).height())
        .sum();
    config.row_gap() + boxes + (criteria.len() - 1) as f32 * config.ac_spacing()
}

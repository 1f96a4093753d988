//! Fixed row positions shared by every epic.

use crate::config::LayoutConfig;

/// Y coordinates of the hierarchy rows.
///
/// Every epic shares the same rows so that stories line up across epic
/// boundaries. The rows are, top to bottom: the epic row, one row per
/// sub-epic nesting level, the actor row and the story row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPositions {
    epic_y: f32,
    first_sub_epic_y: f32,
    sub_epic_step: f32,
    actor_y: f32,
    story_y: f32,
}

impl RowPositions {
    /// Computes the rows for a graph whose deepest sub-epic nesting is
    /// `max_depth` levels.
    pub fn new(config: &LayoutConfig, max_depth: usize) -> Self {
        let epic_y = config.epic_y();
        let first_sub_epic_y = epic_y + config.epic_height() + config.row_gap();
        let sub_epic_step = config.sub_epic_height() + config.row_gap();
        let actor_y = first_sub_epic_y + max_depth as f32 * sub_epic_step;
        let story_y = actor_y + config.actor_height() + config.row_gap();
        Self {
            epic_y,
            first_sub_epic_y,
            sub_epic_step,
            actor_y,
            story_y,
        }
    }

    pub fn epic_y(&self) -> f32 {
        self.epic_y
    }

    /// Top of a sub-epic at nesting `depth`, where `0` is a direct child of
    /// an epic.
    pub fn sub_epic_y(&self, depth: usize) -> f32 {
        self.first_sub_epic_y + depth as f32 * self.sub_epic_step
    }

    pub fn actor_y(&self) -> f32 {
        self.actor_y
    }

    pub fn story_y(&self) -> f32 {
        self.story_y
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_rows_for_single_level() {
        let rows = RowPositions::new(&LayoutConfig::default(), 1);

        assert_approx_eq!(f32, rows.epic_y(), 20.0);
        assert_approx_eq!(f32, rows.sub_epic_y(0), 70.0);
        assert_approx_eq!(f32, rows.actor_y(), 120.0);
        assert_approx_eq!(f32, rows.story_y(), 170.0);
    }

    #[test]
    fn test_rows_move_down_with_depth() {
        let config = LayoutConfig::default();
        let shallow = RowPositions::new(&config, 1);
        let deep = RowPositions::new(&config, 3);

        assert_approx_eq!(f32, deep.sub_epic_y(2), 170.0);
        assert_approx_eq!(f32, deep.story_y() - shallow.story_y(), 100.0);
    }

    #[test]
    fn test_rows_without_sub_epics() {
        let rows = RowPositions::new(&LayoutConfig::default(), 0);

        assert_approx_eq!(f32, rows.actor_y(), rows.sub_epic_y(0));
    }
}

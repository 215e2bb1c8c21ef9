use super::{Board, CellGeometry, ControlSurface, GridGeneration, Renderer, DEFAULT_COLORIZE_DURATION};
use crate::controller::controls::ButtonStates;
use crate::grid::{Grid, Position};
use crate::recorder::NodeAttr;
use crate::statistics::SearchStats;
use crate::tracker::SetTracker;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct HeadlessView {
    pub board: Board,
    pub geometry: CellGeometry,
    colorize_duration: Option<Duration>,
    defer_generation: bool,
    pub grids_generated: usize,
    pub attribute_updates: usize,
    pub table_renders: usize,
    pub button_updates: usize,
}

impl HeadlessView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid generation reports `Pending`, so `init` stays in flight until the
    /// host calls `Controller::grid_generated`.
    pub fn with_deferred_generation(mut self) -> Self {
        self.defer_generation = true;
        self
    }

    pub fn with_colorize_duration(mut self, duration: Duration) -> Self {
        self.colorize_duration = Some(duration);
        self
    }

    /// Pixel at the centre of `pos`, for feeding pointer events.
    pub fn pixel_at(&self, pos: Position) -> (f64, f64) {
        self.geometry.center_of(pos)
    }
}

impl Renderer for HeadlessView {
    fn init(&mut self, cols: usize, rows: usize) {
        self.board = Board::new(cols, rows);
        self.geometry.resize(cols, rows);
    }

    fn generate_grid(&mut self, grid: &Grid) -> GridGeneration {
        for wall in grid.walls() {
            self.board.apply_attribute(wall, NodeAttr::Walkable, false);
        }
        self.grids_generated += 1;
        if self.defer_generation {
            GridGeneration::Pending
        } else {
            GridGeneration::Ready
        }
    }

    fn set_attribute_at(&mut self, pos: Position, attr: NodeAttr, value: bool) {
        self.attribute_updates += 1;
        self.board.apply_attribute(pos, attr, value);
    }

    fn set_start_pos(&mut self, pos: Position) {
        self.board.start = Some(pos);
    }

    fn set_end_pos(&mut self, pos: Position) {
        self.board.end = Some(pos);
    }

    fn clear_footprints(&mut self) {
        self.board.clear_footprints();
    }

    fn clear_path(&mut self) {
        self.board.clear_path();
    }

    fn clear_blocked_nodes(&mut self) {
        self.board.clear_blocked();
    }

    fn draw_path(&mut self, path: &[Position]) {
        self.board.set_path(path);
    }

    fn show_stats(&mut self, stats: &SearchStats) {
        self.board.stats = Some(stats.clone());
    }

    fn render_sets(&mut self, tracker: &SetTracker) {
        self.table_renders += 1;
        self.board.set_tables(tracker);
    }

    fn to_grid_coordinate(&self, x: f64, y: f64) -> Option<Position> {
        self.geometry.to_grid_coordinate(x, y)
    }

    fn colorize_duration(&self) -> Duration {
        self.colorize_duration.unwrap_or(DEFAULT_COLORIZE_DURATION)
    }
}

impl ControlSurface for HeadlessView {
    fn set_button_states(&mut self, states: &ButtonStates) {
        self.button_updates += 1;
        self.board.apply_buttons(states);
    }
}

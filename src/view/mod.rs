pub mod board;
pub mod headless;
pub mod terminal;

use crate::controller::controls::ButtonStates;
use crate::grid::{Grid, Position};
use crate::recorder::NodeAttr;
use crate::statistics::SearchStats;
use crate::tracker::SetTracker;
use std::time::Duration;

pub use board::{Board, CellMarks};
pub use headless::HeadlessView;
pub use terminal::TerminalView;

/// Attributes the step player forwards to the renderer.
pub const SUPPORTED_OPERATIONS: [NodeAttr; 3] = [NodeAttr::Opened, NodeAttr::Closed, NodeAttr::Tested];

/// How long a cell takes to change colour, unless a view says otherwise.
pub const DEFAULT_COLORIZE_DURATION: Duration = Duration::from_millis(50);

/// Completion signal for grid construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridGeneration {
    Ready,
    /// The view will finish later; the host must call `Controller::grid_generated`.
    Pending,
}

pub trait Renderer {
    fn init(&mut self, cols: usize, rows: usize);

    fn generate_grid(&mut self, grid: &Grid) -> GridGeneration;

    fn set_attribute_at(&mut self, pos: Position, attr: NodeAttr, value: bool);

    fn set_start_pos(&mut self, pos: Position);

    fn set_end_pos(&mut self, pos: Position);

    fn clear_footprints(&mut self);

    fn clear_path(&mut self);

    fn clear_blocked_nodes(&mut self);

    fn draw_path(&mut self, path: &[Position]);

    fn show_stats(&mut self, stats: &SearchStats);

    /// Re-renders the open and closed tables.
    fn render_sets(&mut self, tracker: &SetTracker);

    fn to_grid_coordinate(&self, x: f64, y: f64) -> Option<Position>;

    fn supported_operations(&self) -> &'static [NodeAttr] {
        &SUPPORTED_OPERATIONS
    }

    fn colorize_duration(&self) -> Duration {
        DEFAULT_COLORIZE_DURATION
    }
}

pub trait ControlSurface {
    fn set_button_states(&mut self, states: &ButtonStates);
}

/// Everything the controller needs from its host.
pub trait View: Renderer + ControlSurface {}

impl<T: Renderer + ControlSurface> View for T {}

/// Pixel layout of the drawn grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell_size: f64,
    pub cols: usize,
    pub rows: usize,
}

impl Default for CellGeometry {
    fn default() -> Self {
        CellGeometry {
            origin_x: 40.0,
            origin_y: 40.0,
            cell_size: 30.0,
            cols: 0,
            rows: 0,
        }
    }
}

impl CellGeometry {
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Grid cell under a pixel, or `None` outside the grid.
    pub fn to_grid_coordinate(&self, x: f64, y: f64) -> Option<Position> {
        let gx = ((x - self.origin_x) / self.cell_size).floor();
        let gy = ((y - self.origin_y) / self.cell_size).floor();
        if !gx.is_finite() || !gy.is_finite() || gx < 0.0 || gy < 0.0 {
            return None;
        }
        let pos = Position::new(gx as usize, gy as usize);
        (pos.x < self.cols && pos.y < self.rows).then_some(pos)
    }

    /// Pixel at the centre of a cell.
    pub fn center_of(&self, pos: Position) -> (f64, f64) {
        (
            self.origin_x + (pos.x as f64 + 0.5) * self.cell_size,
            self.origin_y + (pos.y as f64 + 0.5) * self.cell_size,
        )
    }
}

use super::{Board, CellGeometry, ControlSurface, GridGeneration, Renderer};
use crate::controller::controls::{ButtonStates, ControlSlot};
use crate::grid::{Grid, Position};
use crate::recorder::NodeAttr;
use crate::statistics::SearchStats;
use crate::tracker::{column_label, SetTracker};
use std::fmt::Write as _;
use std::time::Duration;

pub struct TerminalView {
    board: Board,
    geometry: CellGeometry,
    colorize_duration: Duration,
    title: String,
}

impl TerminalView {
    pub fn new(title: impl Into<String>, colorize_duration: Duration) -> Self {
        TerminalView {
            board: Board::default(),
            geometry: CellGeometry::default(),
            colorize_duration,
            title: title.into(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Builds the whole screen: grid on the left, open/closed tables on the right.
    pub fn frame(&self) -> String {
        let board = &self.board;
        let mut out = String::new();
        let _ = writeln!(out, "=== {} ===", self.title);
        out.push_str("Legend: S=Start, E=End, #=Wall, o=Open, x=Closed, ?=Tested, *=Path, .=Empty\n");

        out.push_str("    ");
        for x in 0..board.cols() {
            let label = column_label(x);
            let _ = write!(out, "{:<2}", label.chars().last().unwrap_or(' '));
        }
        let _ = writeln!(out, "   {:<18} {}", "OPEN", "CLOSED");

        for y in 0..board.rows() {
            let _ = write!(out, "{:>3} ", y + 1);
            for x in 0..board.cols() {
                let _ = write!(out, "{} ", board.glyph(Position::new(x, y)));
            }
            let open = board.open_lines.get(y).map(String::as_str).unwrap_or("");
            let closed = board.closed_lines.get(y).map(String::as_str).unwrap_or("");
            let _ = writeln!(out, "  {:<18} {}", open, closed);
        }

        let hidden_open = board.open_lines.len().saturating_sub(board.rows());
        let hidden_closed = board.closed_lines.len().saturating_sub(board.rows());
        if hidden_open > 0 || hidden_closed > 0 {
            let _ = writeln!(out, "(+{} open, +{} closed not shown)", hidden_open, hidden_closed);
        }

        out.push('\n');
        for slot in ControlSlot::ALL {
            let button = board.buttons.button(slot);
            if button.label.is_empty() {
                continue;
            }
            let marker = if button.enabled { ' ' } else { '-' };
            let _ = write!(out, "[{}{}] ", marker, button.label);
        }
        out.push('\n');

        if let Some(stats) = &board.stats {
            out.push('\n');
            let _ = write!(out, "{}", stats);
        }
        out
    }

    /// Clears the terminal and prints the current frame.
    pub fn draw(&self) {
        print!("\x1B[2J\x1B[1;1H");
        print!("{}", self.frame());
    }
}

impl Renderer for TerminalView {
    fn init(&mut self, cols: usize, rows: usize) {
        self.board = Board::new(cols, rows);
        self.geometry.resize(cols, rows);
    }

    fn generate_grid(&mut self, grid: &Grid) -> GridGeneration {
        for wall in grid.walls() {
            self.board.apply_attribute(wall, NodeAttr::Walkable, false);
        }
        GridGeneration::Ready
    }

    fn set_attribute_at(&mut self, pos: Position, attr: NodeAttr, value: bool) {
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
        self.board.set_tables(tracker);
    }

    fn to_grid_coordinate(&self, x: f64, y: f64) -> Option<Position> {
        self.geometry.to_grid_coordinate(x, y)
    }

    fn colorize_duration(&self) -> Duration {
        self.colorize_duration
    }
}

impl ControlSurface for TerminalView {
    fn set_button_states(&mut self, states: &ButtonStates) {
        self.board.apply_buttons(states);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_shows_markers_walls_and_tables() {
        let mut view = TerminalView::new("A*", Duration::from_millis(10));
        view.init(4, 3);
        view.set_start_pos(Position::new(0, 0));
        view.set_end_pos(Position::new(3, 2));
        view.set_attribute_at(Position::new(1, 1), NodeAttr::Walkable, false);

        let frame = view.frame();
        assert!(frame.contains("=== A* ==="));
        assert!(frame.contains("  1 S . . . "));
        assert!(frame.contains("  2 . # . . "));
        assert!(frame.contains("  3 . . . E "));
        assert!(frame.contains("OPEN"));
    }
}

use crate::controller::controls::{ButtonStates, ControlPanel};
use crate::grid::Position;
use crate::recorder::NodeAttr;
use crate::statistics::SearchStats;
use crate::tracker::SetTracker;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellMarks {
    pub blocked: bool,
    pub opened: bool,
    pub closed: bool,
    pub tested: bool,
    pub on_path: bool,
}

impl CellMarks {
    pub fn has_footprint(&self) -> bool {
        self.opened || self.closed || self.tested
    }
}

/// What a view currently shows: cell colours, markers, tables, summary and
/// buttons. Both bundled views draw from it.
#[derive(Debug, Clone, Default)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<CellMarks>,
    pub start: Option<Position>,
    pub end: Option<Position>,
    pub path: Vec<Position>,
    pub open_lines: Vec<String>,
    pub closed_lines: Vec<String>,
    pub stats: Option<SearchStats>,
    pub buttons: ControlPanel,
}

impl Board {
    pub fn new(cols: usize, rows: usize) -> Self {
        Board {
            cols,
            rows,
            cells: vec![CellMarks::default(); cols * rows],
            ..Board::default()
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, pos: Position) -> Option<usize> {
        (pos.x < self.cols && pos.y < self.rows).then(|| pos.y * self.cols + pos.x)
    }

    pub fn marks(&self, pos: Position) -> Option<CellMarks> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Updates are ignored for cells the board does not have.
    pub fn apply_attribute(&mut self, pos: Position, attr: NodeAttr, value: bool) {
        let Some(i) = self.index(pos) else {
            return;
        };
        let cell = &mut self.cells[i];
        match attr {
            NodeAttr::Opened => cell.opened = value,
            NodeAttr::Closed => cell.closed = value,
            NodeAttr::Tested => cell.tested = value,
            NodeAttr::Walkable => cell.blocked = !value,
        }
    }

    pub fn clear_footprints(&mut self) {
        for cell in &mut self.cells {
            cell.opened = false;
            cell.closed = false;
            cell.tested = false;
        }
        self.open_lines.clear();
        self.closed_lines.clear();
        self.stats = None;
    }

    pub fn clear_path(&mut self) {
        for cell in &mut self.cells {
            cell.on_path = false;
        }
        self.path.clear();
    }

    pub fn clear_blocked(&mut self) {
        for cell in &mut self.cells {
            cell.blocked = false;
        }
    }

    pub fn set_path(&mut self, path: &[Position]) {
        self.clear_path();
        for pos in path {
            if let Some(i) = self.index(*pos) {
                self.cells[i].on_path = true;
            }
        }
        self.path = path.to_vec();
    }

    pub fn set_tables(&mut self, tracker: &SetTracker) {
        self.open_lines = tracker.open_lines();
        self.closed_lines = tracker.closed_lines();
    }

    pub fn apply_buttons(&mut self, states: &ButtonStates) {
        self.buttons.apply(states);
    }

    pub fn footprint_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.has_footprint()).count()
    }

    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.blocked).count()
    }

    /// Single-character rendering of a cell.
    pub fn glyph(&self, pos: Position) -> char {
        if Some(pos) == self.start {
            return 'S';
        }
        if Some(pos) == self.end {
            return 'E';
        }
        match self.marks(pos) {
            None => ' ',
            Some(cell) if cell.blocked => '#',
            Some(cell) if cell.on_path => '*',
            Some(cell) if cell.closed => 'x',
            Some(cell) if cell.opened => 'o',
            Some(cell) if cell.tested => '?',
            Some(_) => '.',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_outside_the_board_are_ignored() {
        let mut board = Board::new(2, 2);
        board.apply_attribute(Position::new(5, 5), NodeAttr::Opened, true);
        assert_eq!(board.footprint_count(), 0);
    }

    #[test]
    fn clearing_footprints_keeps_walls() {
        let mut board = Board::new(3, 3);
        board.apply_attribute(Position::new(0, 0), NodeAttr::Walkable, false);
        board.apply_attribute(Position::new(1, 0), NodeAttr::Opened, true);
        board.apply_attribute(Position::new(2, 0), NodeAttr::Tested, true);
        board.clear_footprints();

        assert_eq!(board.footprint_count(), 0);
        assert_eq!(board.blocked_count(), 1);
        board.clear_blocked();
        assert_eq!(board.blocked_count(), 0);
    }

    #[test]
    fn glyphs_prefer_markers_then_walls_then_path() {
        let mut board = Board::new(4, 1);
        board.start = Some(Position::new(0, 0));
        board.apply_attribute(Position::new(1, 0), NodeAttr::Walkable, false);
        board.apply_attribute(Position::new(2, 0), NodeAttr::Closed, true);
        board.set_path(&[Position::new(2, 0)]);

        assert_eq!(board.glyph(Position::new(0, 0)), 'S');
        assert_eq!(board.glyph(Position::new(1, 0)), '#');
        assert_eq!(board.glyph(Position::new(2, 0)), '*');
        assert_eq!(board.glyph(Position::new(3, 0)), '.');
    }
}

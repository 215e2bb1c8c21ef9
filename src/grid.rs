use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Moves by a signed offset, returning `None` when either axis would go below zero.
    fn offset(self, dx: isize, dy: isize) -> Option<Position> {
        Some(Position {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Position { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
}

/// Which diagonal moves the search may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagonalMovement {
    Always,
    #[default]
    Never,
    /// Diagonal allowed unless both orthogonal cells beside it are blocked.
    IfAtMostOneObstacle,
    /// Diagonal allowed only when neither orthogonal cell beside it is blocked.
    OnlyWhenNoObstacles,
}

impl DiagonalMovement {
    /// Maps the two classic UI toggles onto a movement mode.
    pub fn from_flags(allow_diagonal: bool, dont_cross_corners: bool) -> Self {
        match (allow_diagonal, dont_cross_corners) {
            (false, _) => DiagonalMovement::Never,
            (true, true) => DiagonalMovement::OnlyWhenNoObstacles,
            (true, false) => DiagonalMovement::IfAtMostOneObstacle,
        }
    }
}

/// Walkability map addressed as `cells[x][y]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub cols: usize,
    pub rows: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Grid {
            cols,
            rows,
            cells: vec![vec![Cell::Empty; rows]; cols],
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.cols && pos.y < self.rows
    }

    /// Cells outside the grid are never walkable.
    pub fn is_walkable_at(&self, pos: Position) -> bool {
        self.contains(pos) && self.cells[pos.x][pos.y] == Cell::Empty
    }

    pub fn set_walkable_at(&mut self, pos: Position, walkable: bool) {
        if !self.contains(pos) {
            return;
        }
        self.cells[pos.x][pos.y] = if walkable { Cell::Empty } else { Cell::Wall };
    }

    pub fn walls(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().enumerate().flat_map(|(x, column)| {
            column
                .iter()
                .enumerate()
                .filter(|(_, cell)| **cell == Cell::Wall)
                .map(move |(y, _)| Position { x, y })
        })
    }

    pub fn wall_count(&self) -> usize {
        self.walls().count()
    }

    fn walkable_offset(&self, pos: Position, dx: isize, dy: isize) -> Option<Position> {
        pos.offset(dx, dy).filter(|next| self.is_walkable_at(*next))
    }

    /// Walkable neighbours in the order up, right, down, left, followed by the
    /// diagonals up-left, up-right, down-right, down-left.
    pub fn get_neighbors(&self, pos: Position, diagonal: DiagonalMovement) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(8);

        let up = self.walkable_offset(pos, 0, -1);
        let right = self.walkable_offset(pos, 1, 0);
        let down = self.walkable_offset(pos, 0, 1);
        let left = self.walkable_offset(pos, -1, 0);
        neighbors.extend([up, right, down, left].into_iter().flatten());

        let (s0, s1, s2, s3) = (up.is_some(), right.is_some(), down.is_some(), left.is_some());
        let corners = match diagonal {
            DiagonalMovement::Never => return neighbors,
            DiagonalMovement::Always => [true; 4],
            DiagonalMovement::OnlyWhenNoObstacles => [s3 && s0, s0 && s1, s1 && s2, s2 && s3],
            DiagonalMovement::IfAtMostOneObstacle => [s3 || s0, s0 || s1, s1 || s2, s2 || s3],
        };

        for (allowed, (dx, dy)) in corners.into_iter().zip([(-1, -1), (1, -1), (1, 1), (-1, 1)]) {
            if allowed {
                if let Some(next) = self.walkable_offset(pos, dx, dy) {
                    neighbors.push(next);
                }
            }
        }
        neighbors
    }

    /// Places up to `count` walls at random, never on the `keep_clear` cells.
    /// Returns the cells that were turned into walls.
    pub fn scatter_walls(
        &mut self,
        count: usize,
        seed: Option<u64>,
        keep_clear: &[Position],
    ) -> Vec<Position> {
        if self.cols == 0 || self.rows == 0 {
            return Vec::new();
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let free = self
            .cells
            .iter()
            .enumerate()
            .flat_map(|(x, column)| column.iter().enumerate().map(move |(y, cell)| (Position { x, y }, *cell)))
            .filter(|(pos, cell)| *cell == Cell::Empty && !keep_clear.contains(pos))
            .count();
        let target = count.min(free);
        let max_attempts = target.saturating_mul(3);

        let mut placed = Vec::with_capacity(target);
        let mut attempts = 0;
        while placed.len() < target && attempts < max_attempts {
            let pos = Position {
                x: rng.gen_range(0..self.cols),
                y: rng.gen_range(0..self.rows),
            };
            if !keep_clear.contains(&pos) && self.is_walkable_at(pos) {
                self.set_walkable_at(pos, false);
                placed.push(pos);
            }
            attempts += 1;
        }
        placed
    }
}

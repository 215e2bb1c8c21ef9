use crate::algorithms::a_star::AStar;
use crate::algorithms::breadth_first::BreadthFirst;
use crate::algorithms::ida_star::IdaStar;
use crate::error::ConfigError;
use crate::grid::{DiagonalMovement, Grid, Position};
use crate::recorder::{OperationRecorder, SearchNodes};
use pathfinding::prelude::astar;
use std::f64::consts::SQRT_2;
use std::str::FromStr;

pub trait PathFinder {
    fn name(&self) -> &'static str;

    /// Searches from `start` to `end`, reporting every observable node change
    /// to `recorder`. The returned path includes both endpoints.
    fn find_path(
        &mut self,
        start: Position,
        end: Position,
        grid: &Grid,
        recorder: &mut OperationRecorder,
    ) -> Option<Vec<Position>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    #[default]
    Manhattan,
    Euclidean,
    Octile,
    Chebyshev,
}

impl Heuristic {
    /// Estimate for absolute offsets `dx`, `dy`.
    pub fn estimate(self, dx: f64, dy: f64) -> f64 {
        match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Octile => {
                let (min, max) = if dx < dy { (dx, dy) } else { (dy, dx) };
                (SQRT_2 - 1.0) * min + max
            }
            Heuristic::Chebyshev => dx.max(dy),
        }
    }

    pub fn between(self, a: Position, b: Position) -> f64 {
        self.estimate(a.x.abs_diff(b.x) as f64, a.y.abs_diff(b.y) as f64)
    }
}

impl FromStr for Heuristic {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manhattan" => Ok(Heuristic::Manhattan),
            "euclidean" => Ok(Heuristic::Euclidean),
            "octile" => Ok(Heuristic::Octile),
            "chebyshev" => Ok(Heuristic::Chebyshev),
            other => Err(ConfigError::UnknownHeuristic(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    AStar,
    Dijkstra,
    BestFirst,
    BreadthFirst,
    IdaStar,
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a_star" => Ok(Algorithm::AStar),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "best_first" => Ok(Algorithm::BestFirst),
            "breadth_first" => Ok(Algorithm::BreadthFirst),
            "ida_star" => Ok(Algorithm::IdaStar),
            other => Err(ConfigError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Everything needed to build the finder the controller runs.
#[derive(Debug, Clone, PartialEq)]
pub struct FinderOptions {
    pub algorithm: Algorithm,
    pub heuristic: Heuristic,
    pub weight: f64,
    pub diagonal: DiagonalMovement,
    /// Node expansions IDA* may spend before giving up.
    pub expansion_limit: usize,
}

impl Default for FinderOptions {
    fn default() -> Self {
        FinderOptions {
            algorithm: Algorithm::AStar,
            heuristic: Heuristic::Manhattan,
            weight: 1.0,
            diagonal: DiagonalMovement::Never,
            expansion_limit: 100_000,
        }
    }
}

impl FinderOptions {
    pub fn build(&self) -> Box<dyn PathFinder> {
        match self.algorithm {
            Algorithm::AStar => Box::new(AStar::new(self.heuristic, self.weight, self.diagonal)),
            Algorithm::Dijkstra => Box::new(AStar::dijkstra(self.diagonal)),
            Algorithm::BestFirst => Box::new(AStar::best_first(self.heuristic, self.diagonal)),
            Algorithm::BreadthFirst => Box::new(BreadthFirst::new(self.diagonal)),
            Algorithm::IdaStar => Box::new(
                IdaStar::new(self.heuristic, self.weight, self.diagonal)
                    .with_expansion_limit(self.expansion_limit),
            ),
        }
    }
}

/// Cost of a single move: 1 straight, √2 diagonal.
pub fn step_cost(from: Position, to: Position) -> f64 {
    if from.x == to.x || from.y == to.y {
        1.0
    } else {
        SQRT_2
    }
}

/// Follows parent links from `end` back to the root and returns the path in
/// travel order.
pub fn backtrace(nodes: &SearchNodes<'_>, end: Position) -> Vec<Position> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(parent) = nodes.get(current).and_then(|node| node.parent) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

/// Sum of the Euclidean lengths of consecutive path segments.
pub fn path_length(path: &[Position]) -> f64 {
    path.windows(2)
        .map(|pair| Heuristic::Euclidean.between(pair[0], pair[1]))
        .sum()
}

const STRAIGHT_MILLIS: u32 = 1000;
const DIAGONAL_MILLIS: u32 = 1414;

/// Optimal cost between two cells, computed with the `pathfinding` crate in
/// fixed-point milli-units so it never depends on the visualized finder.
pub fn reference_cost(
    grid: &Grid,
    start: Position,
    end: Position,
    diagonal: DiagonalMovement,
) -> Option<f64> {
    let result = astar(
        &start,
        |p| {
            grid.get_neighbors(*p, diagonal)
                .into_iter()
                .map(|n| {
                    let cost = if n.x == p.x || n.y == p.y {
                        STRAIGHT_MILLIS
                    } else {
                        DIAGONAL_MILLIS
                    };
                    (n, cost)
                })
                .collect::<Vec<_>>()
        },
        |p| {
            let dx = p.x.abs_diff(end.x) as u32;
            let dy = p.y.abs_diff(end.y) as u32;
            match diagonal {
                DiagonalMovement::Never => (dx + dy) * STRAIGHT_MILLIS,
                _ => dx.max(dy).saturating_sub(dx.min(dy)) * STRAIGHT_MILLIS + dx.min(dy) * DIAGONAL_MILLIS,
            }
        },
        |p| *p == end,
    );

    result.map(|(_, cost)| cost as f64 / STRAIGHT_MILLIS as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristics_agree_on_straight_lines() {
        for heuristic in [
            Heuristic::Manhattan,
            Heuristic::Euclidean,
            Heuristic::Octile,
            Heuristic::Chebyshev,
        ] {
            assert_eq!(heuristic.estimate(3.0, 0.0), 3.0);
        }
        assert_eq!(Heuristic::Manhattan.estimate(3.0, 4.0), 7.0);
        assert_eq!(Heuristic::Euclidean.estimate(3.0, 4.0), 5.0);
        assert_eq!(Heuristic::Chebyshev.estimate(3.0, 4.0), 4.0);
        assert!((Heuristic::Octile.estimate(3.0, 4.0) - (1.0 + 3.0 * SQRT_2)).abs() < 1e-9);
    }

    #[test]
    fn names_parse_into_options() {
        assert_eq!("ida_star".parse::<Algorithm>().ok(), Some(Algorithm::IdaStar));
        assert_eq!("octile".parse::<Heuristic>().ok(), Some(Heuristic::Octile));
        assert!("dfs".parse::<Algorithm>().is_err());
        assert!("taxicab".parse::<Heuristic>().is_err());
    }

    #[test]
    fn path_length_sums_segments() {
        let path = [Position::new(0, 0), Position::new(1, 1), Position::new(1, 2)];
        assert!((path_length(&path) - (SQRT_2 + 1.0)).abs() < 1e-9);
        assert_eq!(path_length(&[Position::new(3, 3)]), 0.0);
        assert_eq!(path_length(&[]), 0.0);
    }

    #[test]
    fn reference_cost_on_open_grid() {
        let grid = Grid::new(16, 16);
        let cost = reference_cost(&grid, Position::new(1, 1), Position::new(14, 14), DiagonalMovement::Never);
        assert_eq!(cost, Some(26.0));

        let diagonal = reference_cost(&grid, Position::new(1, 1), Position::new(14, 14), DiagonalMovement::Always);
        assert!(diagonal.is_some_and(|cost| (cost - 18.382).abs() < 1e-9));
    }

    #[test]
    fn reference_cost_unreachable_when_walled_in() {
        let mut grid = Grid::new(5, 5);
        for y in 0..5 {
            grid.set_walkable_at(Position::new(2, y), false);
        }
        assert_eq!(
            reference_cost(&grid, Position::new(0, 0), Position::new(4, 4), DiagonalMovement::Always),
            None
        );
    }
}

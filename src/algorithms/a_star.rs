use crate::algorithms::common::{backtrace, step_cost, Heuristic, PathFinder};
use crate::grid::{DiagonalMovement, Grid, Position};
use crate::recorder::{NodeAttr, OperationRecorder, SearchNodes};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Scale applied to the heuristic by best-first search so `g` barely matters.
const BEST_FIRST_SCALE: f64 = 1_000_000.0;

/// Entry in the open list. Ordered so `BinaryHeap` pops the lowest `f`,
/// and among equal `f` the earliest pushed.
#[derive(Clone, Copy)]
struct OpenItem {
    f: f64,
    seq: u64,
    pos: Position,
}

impl PartialEq for OpenItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenItem {}

impl PartialOrd for OpenItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed comparison to make BinaryHeap a min-heap
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A* over the grid. Dijkstra and best-first search are A* with a zero or a
/// heavily scaled heuristic.
pub struct AStar {
    name: &'static str,
    heuristic: Option<Heuristic>,
    weight: f64,
    diagonal: DiagonalMovement,
}

impl AStar {
    pub fn new(heuristic: Heuristic, weight: f64, diagonal: DiagonalMovement) -> Self {
        AStar {
            name: "A*",
            heuristic: Some(heuristic),
            weight,
            diagonal,
        }
    }

    pub fn dijkstra(diagonal: DiagonalMovement) -> Self {
        AStar {
            name: "Dijkstra",
            heuristic: None,
            weight: 1.0,
            diagonal,
        }
    }

    pub fn best_first(heuristic: Heuristic, diagonal: DiagonalMovement) -> Self {
        AStar {
            name: "Best-First",
            heuristic: Some(heuristic),
            weight: BEST_FIRST_SCALE,
            diagonal,
        }
    }

    fn estimate(&self, from: Position, to: Position) -> f64 {
        self.heuristic
            .map_or(0.0, |heuristic| self.weight * heuristic.between(from, to))
    }
}

impl PathFinder for AStar {
    fn name(&self) -> &'static str {
        self.name
    }

    fn find_path(
        &mut self,
        start: Position,
        end: Position,
        grid: &Grid,
        recorder: &mut OperationRecorder,
    ) -> Option<Vec<Position>> {
        let mut nodes = SearchNodes::new(recorder);
        let mut open = BinaryHeap::new();
        let mut seq = 0u64;

        {
            let node = nodes.node_mut(start);
            node.g = 0.0;
            node.f = Some(0.0);
        }
        open.push(OpenItem { f: 0.0, seq, pos: start });
        nodes.set(start, NodeAttr::Opened, true);

        while let Some(item) = open.pop() {
            let current = item.pos;
            // Items superseded by a cheaper push are skipped.
            if nodes.is_closed(current) || nodes.get(current).and_then(|n| n.f) != Some(item.f) {
                continue;
            }
            nodes.set(current, NodeAttr::Closed, true);

            if current == end {
                return Some(backtrace(&nodes, end));
            }

            let current_g = nodes.get(current).map_or(0.0, |n| n.g);
            for neighbor in grid.get_neighbors(current, self.diagonal) {
                if nodes.is_closed(neighbor) {
                    continue;
                }

                let g = current_g + step_cost(current, neighbor);
                let was_opened = nodes.is_opened(neighbor);
                let improves = nodes.get(neighbor).map_or(true, |n| g < n.g);
                if was_opened && !improves {
                    continue;
                }

                let estimate = self.estimate(neighbor, end);
                let node = nodes.node_mut(neighbor);
                let h = *node.h.get_or_insert(estimate);
                node.g = g;
                node.f = Some(g + h);
                node.parent = Some(current);

                seq += 1;
                open.push(OpenItem { f: g + h, seq, pos: neighbor });
                if !was_opened {
                    nodes.set(neighbor, NodeAttr::Opened, true);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::common::{path_length, reference_cost};
    use crate::recorder::Operation;

    fn run(finder: &mut AStar, grid: &Grid, start: Position, end: Position) -> (Option<Vec<Position>>, Vec<Operation>) {
        let mut recorder = OperationRecorder::new();
        recorder.begin_run();
        let path = finder.find_path(start, end, grid, &mut recorder);
        (path, recorder.take_log().into_iter().collect())
    }

    #[test]
    fn finds_optimal_path_on_open_grid() {
        let grid = Grid::new(16, 16);
        let start = Position::new(1, 1);
        let end = Position::new(14, 14);
        let mut finder = AStar::new(Heuristic::Manhattan, 1.0, DiagonalMovement::Never);

        let (path, log) = run(&mut finder, &grid, start, end);
        let path = path.expect("open grid has a path");
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        assert_eq!(path_length(&path), 26.0);
        assert!(!log.is_empty());
    }

    #[test]
    fn start_is_opened_first_with_no_parent() {
        let grid = Grid::new(5, 5);
        let mut finder = AStar::new(Heuristic::Manhattan, 1.0, DiagonalMovement::Never);
        let (_, log) = run(&mut finder, &grid, Position::new(0, 0), Position::new(4, 0));

        assert_eq!(log[0].attr, NodeAttr::Opened);
        assert_eq!(log[0].position, Position::new(0, 0));
        assert_eq!(log[0].parent, None);
        assert_eq!(log[0].f, Some(0.0));
        assert_eq!(log[1].attr, NodeAttr::Closed);
    }

    #[test]
    fn matches_reference_cost_around_walls() {
        let mut grid = Grid::new(10, 10);
        for y in 0..8 {
            grid.set_walkable_at(Position::new(5, y), false);
        }
        let start = Position::new(1, 1);
        let end = Position::new(8, 1);

        for diagonal in [DiagonalMovement::Never, DiagonalMovement::OnlyWhenNoObstacles] {
            let mut finder = AStar::new(Heuristic::Octile, 1.0, diagonal);
            let (path, _) = run(&mut finder, &grid, start, end);
            let path = path.expect("wall has a gap");
            let optimal = reference_cost(&grid, start, end, diagonal).expect("reachable");
            // The reference uses 1.414 for diagonals.
            assert!((path_length(&path) - optimal).abs() < 0.01 * path.len() as f64);
            assert!(path.iter().all(|p| grid.is_walkable_at(*p)));
        }
    }

    #[test]
    fn returns_none_when_end_is_enclosed() {
        let mut grid = Grid::new(6, 6);
        for pos in [(3, 4), (4, 3), (5, 4), (4, 5)] {
            grid.set_walkable_at(Position::from(pos), false);
        }
        let mut finder = AStar::dijkstra(DiagonalMovement::Never);
        let (path, log) = run(&mut finder, &grid, Position::new(0, 0), Position::new(4, 4));
        assert!(path.is_none());
        let closed = log.iter().filter(|op| op.attr == NodeAttr::Closed).count();
        // Everything except the four walls, the end and the cut-off corner (5, 5).
        assert_eq!(closed, 36 - 4 - 2);
    }

    #[test]
    fn every_closed_node_was_opened_before() {
        let grid = Grid::new(8, 8);
        let mut finder = AStar::best_first(Heuristic::Euclidean, DiagonalMovement::Always);
        let (path, log) = run(&mut finder, &grid, Position::new(0, 7), Position::new(7, 0));
        assert!(path.is_some());

        for (i, op) in log.iter().enumerate() {
            if op.attr == NodeAttr::Closed {
                assert!(log[..i]
                    .iter()
                    .any(|earlier| earlier.attr == NodeAttr::Opened && earlier.position == op.position));
            }
        }
    }

    #[test]
    fn finder_names() {
        assert_eq!(AStar::dijkstra(DiagonalMovement::Never).name(), "Dijkstra");
        assert_eq!(
            AStar::best_first(Heuristic::Manhattan, DiagonalMovement::Never).name(),
            "Best-First"
        );
    }
}

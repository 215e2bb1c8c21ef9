use crate::algorithms::common::{step_cost, Heuristic, PathFinder};
use crate::grid::{DiagonalMovement, Grid, Position};
use crate::recorder::{NodeAttr, OperationRecorder, SearchNodes};

/// Result of one depth-first probe under a cost bound.
enum Probe {
    Found,
    /// Smallest `f` that exceeded the bound; infinite when nothing did.
    Bound(f64),
    Aborted,
}

/// Iterative deepening A*. Every node on the current recursion route is
/// marked `tested`, and unmarked again on backtrack once no route holds it.
pub struct IdaStar {
    heuristic: Heuristic,
    weight: f64,
    diagonal: DiagonalMovement,
    track_recursion: bool,
    expansion_limit: usize,
}

impl IdaStar {
    pub fn new(heuristic: Heuristic, weight: f64, diagonal: DiagonalMovement) -> Self {
        IdaStar {
            heuristic,
            weight,
            diagonal,
            track_recursion: true,
            expansion_limit: 100_000,
        }
    }

    pub fn with_expansion_limit(mut self, limit: usize) -> Self {
        self.expansion_limit = limit;
        self
    }

    pub fn with_track_recursion(mut self, track: bool) -> Self {
        self.track_recursion = track;
        self
    }
}

struct Search<'a, 'r> {
    finder: &'a IdaStar,
    grid: &'a Grid,
    end: Position,
    nodes: SearchNodes<'r>,
    route: Vec<Position>,
    expansions: usize,
}

impl Search<'_, '_> {
    fn estimate(&self, pos: Position) -> f64 {
        self.finder.weight * self.finder.heuristic.between(pos, self.end)
    }

    fn probe(&mut self, current: Position, g: f64, cutoff: f64) -> Probe {
        self.expansions += 1;
        if self.expansions > self.finder.expansion_limit {
            return Probe::Aborted;
        }

        let f = g + self.estimate(current);
        if f > cutoff {
            return Probe::Bound(f);
        }
        if current == self.end {
            return Probe::Found;
        }

        let mut neighbors = self.grid.get_neighbors(current, self.finder.diagonal);
        neighbors.sort_by(|a, b| self.estimate(*a).total_cmp(&self.estimate(*b)));

        let mut min = f64::INFINITY;
        for neighbor in neighbors {
            if self.route.contains(&neighbor) {
                continue;
            }

            if self.finder.track_recursion {
                self.nodes.node_mut(neighbor).retain_count += 1;
                if !self.nodes.is_tested(neighbor) {
                    self.nodes.set(neighbor, NodeAttr::Tested, true);
                }
            }

            self.route.push(neighbor);
            match self.probe(neighbor, g + step_cost(current, neighbor), cutoff) {
                Probe::Found => return Probe::Found,
                Probe::Aborted => return Probe::Aborted,
                Probe::Bound(t) => min = min.min(t),
            }
            self.route.pop();

            if self.finder.track_recursion {
                let node = self.nodes.node_mut(neighbor);
                node.retain_count = node.retain_count.saturating_sub(1);
                if node.retain_count == 0 {
                    self.nodes.set(neighbor, NodeAttr::Tested, false);
                }
            }
        }
        Probe::Bound(min)
    }
}

impl PathFinder for IdaStar {
    fn name(&self) -> &'static str {
        "IDA*"
    }

    fn find_path(
        &mut self,
        start: Position,
        end: Position,
        grid: &Grid,
        recorder: &mut OperationRecorder,
    ) -> Option<Vec<Position>> {
        let mut search = Search {
            finder: self,
            grid,
            end,
            nodes: SearchNodes::new(recorder),
            route: Vec::new(),
            expansions: 0,
        };
        let mut cutoff = search.estimate(start);

        loop {
            search.route.clear();
            search.route.push(start);
            match search.probe(start, 0.0, cutoff) {
                Probe::Found => return Some(search.route),
                Probe::Bound(next) if next.is_finite() => cutoff = next,
                Probe::Bound(_) => return None,
                Probe::Aborted => {
                    tracing::warn!(expansions = search.expansions, "IDA* expansion limit reached");
                    return None;
                }
            }
        }
    }
}

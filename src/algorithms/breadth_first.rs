use crate::algorithms::common::{backtrace, PathFinder};
use crate::grid::{DiagonalMovement, Grid, Position};
use crate::recorder::{NodeAttr, OperationRecorder, SearchNodes};
use std::collections::VecDeque;

/// Unweighted breadth-first search. Nodes carry no `f` score.
pub struct BreadthFirst {
    diagonal: DiagonalMovement,
}

impl BreadthFirst {
    pub fn new(diagonal: DiagonalMovement) -> Self {
        BreadthFirst { diagonal }
    }
}

impl PathFinder for BreadthFirst {
    fn name(&self) -> &'static str {
        "Breadth-First"
    }

    fn find_path(
        &mut self,
        start: Position,
        end: Position,
        grid: &Grid,
        recorder: &mut OperationRecorder,
    ) -> Option<Vec<Position>> {
        let mut nodes = SearchNodes::new(recorder);
        let mut queue = VecDeque::from([start]);
        nodes.set(start, NodeAttr::Opened, true);

        while let Some(current) = queue.pop_front() {
            nodes.set(current, NodeAttr::Closed, true);
            if current == end {
                return Some(backtrace(&nodes, end));
            }

            for neighbor in grid.get_neighbors(current, self.diagonal) {
                if nodes.is_opened(neighbor) {
                    continue;
                }
                nodes.node_mut(neighbor).parent = Some(current);
                queue.push_back(neighbor);
                nodes.set(neighbor, NodeAttr::Opened, true);
            }
        }

        None
    }
}

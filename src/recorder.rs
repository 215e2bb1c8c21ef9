use crate::grid::Position;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeAttr {
    Opened,
    Closed,
    Tested,
    Walkable,
}

impl NodeAttr {
    pub fn name(self) -> &'static str {
        match self {
            NodeAttr::Opened => "opened",
            NodeAttr::Closed => "closed",
            NodeAttr::Tested => "tested",
            NodeAttr::Walkable => "walkable",
        }
    }
}

impl fmt::Display for NodeAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single recorded attribute assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub position: Position,
    /// Cost estimate at the moment of assignment.
    pub f: Option<f64>,
    pub parent: Option<Position>,
    pub attr: NodeAttr,
    pub value: bool,
}

impl Operation {
    pub fn new(position: Position, attr: NodeAttr, value: bool) -> Self {
        Operation {
            position,
            f: None,
            parent: None,
            attr,
            value,
        }
    }

    pub fn with_f(mut self, f: f64) -> Self {
        self.f = Some(f);
        self
    }

    pub fn with_parent(mut self, parent: Position) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Collects operations for one search run at a time. A single recorder lives
/// for the whole session and is handed to every search.
#[derive(Debug, Default)]
pub struct OperationRecorder {
    log: VecDeque<Operation>,
    runs: usize,
}

impl OperationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new run, dropping anything a previous run left behind.
    pub fn begin_run(&mut self) {
        self.log.clear();
        self.runs += 1;
    }

    pub fn record(&mut self, op: Operation) {
        self.log.push_back(op);
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Number of runs started on this recorder.
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn take_log(&mut self) -> VecDeque<Operation> {
        std::mem::take(&mut self.log)
    }
}

/// Per-node search bookkeeping. The observable flags are private so they can
/// only change through [`SearchNodes::set`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    opened: bool,
    closed: bool,
    tested: bool,
    pub g: f64,
    pub h: Option<f64>,
    pub f: Option<f64>,
    pub parent: Option<Position>,
    pub retain_count: usize,
}

impl Node {
    pub fn opened(&self) -> bool {
        self.opened
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn tested(&self) -> bool {
        self.tested
    }
}

/// Node table for one search, wired to the session recorder.
pub struct SearchNodes<'r> {
    nodes: FxHashMap<Position, Node>,
    recorder: &'r mut OperationRecorder,
}

impl<'r> SearchNodes<'r> {
    pub fn new(recorder: &'r mut OperationRecorder) -> Self {
        SearchNodes {
            nodes: FxHashMap::default(),
            recorder,
        }
    }

    pub fn get(&self, pos: Position) -> Option<&Node> {
        self.nodes.get(&pos)
    }

    /// Scores and parent of a node, created on first access.
    pub fn node_mut(&mut self, pos: Position) -> &mut Node {
        self.nodes.entry(pos).or_default()
    }

    pub fn is_opened(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(Node::opened)
    }

    pub fn is_closed(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(Node::closed)
    }

    pub fn is_tested(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(Node::tested)
    }

    /// Applies an observable attribute change and records it.
    ///
    /// `opened` and `closed` records carry the node's `f` and parent as they
    /// are right now; `tested` records carry neither.
    pub fn set(&mut self, pos: Position, attr: NodeAttr, value: bool) {
        let node = self.nodes.entry(pos).or_default();
        match attr {
            NodeAttr::Opened => node.opened = value,
            NodeAttr::Closed => node.closed = value,
            NodeAttr::Tested => node.tested = value,
            NodeAttr::Walkable => {}
        }

        let mut op = Operation::new(pos, attr, value);
        if matches!(attr, NodeAttr::Opened | NodeAttr::Closed) {
            op.f = node.f;
            op.parent = node.parent;
        }
        self.recorder.record(op);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_records_in_call_order() {
        let mut recorder = OperationRecorder::new();
        recorder.begin_run();
        {
            let mut nodes = SearchNodes::new(&mut recorder);
            nodes.set(Position::new(0, 0), NodeAttr::Opened, true);
            nodes.set(Position::new(0, 0), NodeAttr::Closed, true);
            nodes.set(Position::new(1, 0), NodeAttr::Tested, true);
            assert!(nodes.is_opened(Position::new(0, 0)));
            assert!(nodes.is_closed(Position::new(0, 0)));
            assert!(nodes.is_tested(Position::new(1, 0)));
            assert!(!nodes.is_opened(Position::new(1, 0)));
        }

        let attrs: Vec<_> = recorder.take_log().into_iter().map(|op| op.attr).collect();
        assert_eq!(attrs, vec![NodeAttr::Opened, NodeAttr::Closed, NodeAttr::Tested]);
    }

    #[test]
    fn scores_are_captured_at_assignment_time() {
        let mut recorder = OperationRecorder::new();
        {
            let mut nodes = SearchNodes::new(&mut recorder);
            let pos = Position::new(3, 4);
            {
                let node = nodes.node_mut(pos);
                node.f = Some(2.5);
                node.parent = Some(Position::new(3, 3));
            }
            nodes.set(pos, NodeAttr::Opened, true);

            // A later improvement must not rewrite the earlier record.
            let node = nodes.node_mut(pos);
            node.f = Some(1.0);
            node.parent = Some(Position::new(2, 4));
        }

        let log = recorder.take_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].f, Some(2.5));
        assert_eq!(log[0].parent, Some(Position::new(3, 3)));
    }

    #[test]
    fn tested_records_carry_no_scores() {
        let mut recorder = OperationRecorder::new();
        {
            let mut nodes = SearchNodes::new(&mut recorder);
            nodes.node_mut(Position::new(1, 1)).f = Some(4.0);
            nodes.set(Position::new(1, 1), NodeAttr::Tested, true);
        }
        let log = recorder.take_log();
        assert_eq!(log[0].f, None);
        assert_eq!(log[0].parent, None);
    }

    #[test]
    fn begin_run_discards_leftovers() {
        let mut recorder = OperationRecorder::new();
        recorder.record(Operation::new(Position::new(0, 0), NodeAttr::Opened, true));
        recorder.begin_run();
        assert!(recorder.is_empty());
        assert_eq!(recorder.runs(), 1);
    }
}

use crate::controller::state::{Event, State};

/// Why the controller refused an event. Refusals never change any state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("event `{event}` is not allowed in state `{state}`")]
    Illegal { event: Event, state: State },

    #[error("event `{event}` rejected while initialization is still pending")]
    InTransition { event: Event },

    #[error("event `{event}` rejected: {reason}")]
    Guard { event: Event, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("a {cols}x{rows} grid has no room for separate start and end markers")]
    GridTooSmall { cols: usize, rows: usize },

    #[error("unknown algorithm `{0}` (expected a_star, dijkstra, best_first, breadth_first or ida_star)")]
    UnknownAlgorithm(String),

    #[error("unknown heuristic `{0}` (expected manhattan, euclidean, octile or chebyshev)")]
    UnknownHeuristic(String),

    #[error("weight must be a positive number, got {0}")]
    InvalidWeight(f64),

    #[error("settle factor must be a non-negative number, got {0}")]
    InvalidSettleFactor(f64),
}

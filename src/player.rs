use crate::recorder::{NodeAttr, Operation};
use crate::tracker::SetTracker;
use crate::view::Renderer;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// One supported operation was applied and rendered.
    Rendered(Operation),
    /// Nothing supported is left in the log.
    Exhausted,
}

/// Replays one search run's operation log, front to back.
#[derive(Debug, Default)]
pub struct StepPlayer {
    log: VecDeque<Operation>,
    tracker: SetTracker,
    steps: usize,
    skipped: usize,
}

impl StepPlayer {
    pub fn new(log: VecDeque<Operation>) -> Self {
        StepPlayer {
            log,
            ..StepPlayer::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.log.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.log.is_empty()
    }

    pub fn tracker(&self) -> &SetTracker {
        &self.tracker
    }

    /// Rendered steps so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Operations dropped by the supported-attribute filter.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Pops operations until one the renderer supports comes up, then applies it
    /// to the tables and requests a cell update and a table re-render.
    pub fn step<R: Renderer + ?Sized>(&mut self, view: &mut R) -> StepOutcome {
        let supported = view.supported_operations();
        let op = loop {
            let Some(op) = self.log.pop_front() else {
                return StepOutcome::Exhausted;
            };
            if supported.contains(&op.attr) {
                break op;
            }
            self.skipped += 1;
        };

        match (op.attr, op.value) {
            (NodeAttr::Opened, true) => self.tracker.add_opened(&op),
            (NodeAttr::Closed, true) => self.tracker.add_closed(&op),
            _ => {}
        }
        self.steps += 1;

        view.set_attribute_at(op.position, op.attr, op.value);
        view.render_sets(&self.tracker);
        StepOutcome::Rendered(op)
    }

    /// Discards everything still queued without rendering it.
    pub fn drain(&mut self) -> usize {
        let dropped = self.log.len();
        self.log.clear();
        dropped
    }
}

//! Entry actions run before the event's own work, so `resume` has already
//! bounced back to `Paused` when its playback step fires `finish`.

pub mod controls;
pub mod state;
pub mod timers;

use crate::algorithms::common::{path_length, reference_cost};
use crate::algorithms::{FinderOptions, PathFinder};
use crate::edit::{interpret_move, interpret_press, EditContext, MoveEffect, PointerEvent, PressIntent};
use crate::error::TransitionError;
use crate::grid::{Grid, Position};
use crate::player::{StepOutcome, StepPlayer};
use crate::recorder::{NodeAttr, OperationRecorder};
use crate::statistics::SearchStats;
use crate::tracker::SetEntry;
use crate::view::{GridGeneration, View};
use controls::{ButtonConfig, ButtonStates, ControlAction, ControlPanel, ControlSlot};
use state::{Event, State};
use std::time::{Duration, Instant};
use timers::{DeferredQueue, DeferredTask};
use tracing::{debug, info, trace, warn};

/// Deferred clears wait this many colorize durations.
pub const DEFAULT_SETTLE_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub cols: usize,
    pub rows: usize,
    pub default_start: Position,
    pub default_end: Position,
    pub settle_factor: f64,
    pub finder: FinderOptions,
}

impl Settings {
    /// Markers one cell in from the top-left and bottom-right corners.
    pub fn for_grid(cols: usize, rows: usize) -> Self {
        Settings {
            cols,
            rows,
            default_start: Position::new(1, 1),
            default_end: Position::new(cols.saturating_sub(2), rows.saturating_sub(2)),
            settle_factor: DEFAULT_SETTLE_FACTOR,
            finder: FinderOptions::default(),
        }
    }

    pub fn with_finder(mut self, finder: FinderOptions) -> Self {
        self.finder = finder;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::for_grid(16, 16)
    }
}

/// Everything produced by one search, replayed by its step player.
struct SearchRun {
    player: StepPlayer,
    path: Vec<Position>,
    time_spent: Duration,
    operation_count: usize,
    reference_cost: Option<f64>,
}

fn entry_buttons(state: State) -> Option<ButtonStates> {
    let states = match state {
        State::Ready => ButtonStates {
            primary: ButtonConfig::new()
                .label("Start")
                .enabled(true)
                .action(ControlAction::Start),
            secondary: ButtonConfig::new()
                .label("Cancel")
                .enabled(false)
                .action(ControlAction::Cancel),
            reset: ButtonConfig::new()
                .label("Reset")
                .enabled(true)
                .action(ControlAction::Reset),
        },
        State::Starting => ButtonStates {
            primary: ButtonConfig::new()
                .label("Next Step")
                .enabled(true)
                .action(ControlAction::Resume),
            secondary: ButtonConfig::new().enabled(true),
            ..ButtonStates::default()
        },
        State::Searching => ButtonStates {
            primary: ButtonConfig::new().enabled(false),
            ..ButtonStates::default()
        },
        State::Paused => ButtonStates {
            primary: ButtonConfig::new().enabled(true),
            secondary: ButtonConfig::new()
                .label("Cancel")
                .enabled(true)
                .action(ControlAction::Cancel),
            ..ButtonStates::default()
        },
        State::Finished => ButtonStates {
            primary: ButtonConfig::new().label("Finished").enabled(false),
            secondary: ButtonConfig::new()
                .label("Clear")
                .enabled(true)
                .action(ControlAction::Clear),
            ..ButtonStates::default()
        },
        State::Restarting => ButtonStates {
            primary: ButtonConfig::new().enabled(false),
            secondary: ButtonConfig::new().enabled(false),
            ..ButtonStates::default()
        },
        State::Modified => ButtonStates {
            primary: ButtonConfig::new()
                .label("Start")
                .enabled(true)
                .action(ControlAction::Start),
            secondary: ButtonConfig::new().label("Clear").enabled(false),
            ..ButtonStates::default()
        },
        _ => return None,
    };
    Some(states)
}

pub struct Controller<V: View> {
    settings: Settings,
    state: State,
    /// Set while an asynchronous transition waits for its completion signal.
    pending: Option<Event>,
    grid: Grid,
    start: Position,
    end: Position,
    finder: Box<dyn PathFinder>,
    recorder: OperationRecorder,
    run: Option<SearchRun>,
    deferred: DeferredQueue,
    controls: ControlPanel,
    view: V,
}

impl<V: View> Controller<V> {
    pub fn new(settings: Settings, view: V) -> Self {
        let finder = settings.finder.build();
        Self::with_finder(settings, view, finder)
    }

    pub fn with_finder(settings: Settings, view: V, finder: Box<dyn PathFinder>) -> Self {
        Controller {
            grid: Grid::new(settings.cols, settings.rows),
            start: settings.default_start,
            end: settings.default_end,
            settings,
            state: State::None,
            pending: None,
            finder,
            recorder: OperationRecorder::new(),
            run: None,
            deferred: DeferredQueue::new(),
            controls: ControlPanel::new(),
            view,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is(&self, state: State) -> bool {
        self.state == state
    }

    pub fn is_initializing(&self) -> bool {
        self.pending == Some(Event::Init)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start_pos(&self) -> Position {
        self.start
    }

    pub fn end_pos(&self) -> Position {
        self.end
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    pub fn finder_name(&self) -> &'static str {
        self.finder.name()
    }

    /// Searches run on this session's recorder so far.
    pub fn searches_run(&self) -> usize {
        self.recorder.runs()
    }

    pub fn path(&self) -> &[Position] {
        self.run.as_ref().map(|run| run.path.as_slice()).unwrap_or(&[])
    }

    pub fn open_entries(&self) -> &[SetEntry] {
        self.run.as_ref().map(|run| run.player.tracker().open()).unwrap_or(&[])
    }

    pub fn closed_entries(&self) -> &[SetEntry] {
        self.run.as_ref().map(|run| run.player.tracker().closed()).unwrap_or(&[])
    }

    pub fn open_lines(&self) -> Vec<String> {
        self.run
            .as_ref()
            .map(|run| run.player.tracker().open_lines())
            .unwrap_or_default()
    }

    pub fn closed_lines(&self) -> Vec<String> {
        self.run
            .as_ref()
            .map(|run| run.player.tracker().closed_lines())
            .unwrap_or_default()
    }

    /// Operations still waiting to be replayed.
    pub fn pending_operations(&self) -> usize {
        self.run.as_ref().map_or(0, |run| run.player.remaining())
    }

    pub fn steps_taken(&self) -> usize {
        self.run.as_ref().map_or(0, |run| run.player.steps())
    }

    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// How long deferred clears wait for in-flight cell animations.
    pub fn settle_delay(&self) -> Duration {
        let nanos = self.view.colorize_duration().as_nanos() as f64 * self.settings.settle_factor.max(0.0);
        // Rounded to whole nanoseconds so 50ms x 1.2 is exactly 60ms.
        Duration::from_nanos(nanos.round() as u64)
    }

    /// Summary of the current run, once there is one.
    pub fn summary(&self) -> Option<SearchStats> {
        self.run.as_ref().map(|run| SearchStats {
            algorithm: self.finder.name().to_string(),
            path_length: path_length(&run.path),
            time_spent: run.time_spent,
            operation_count: run.operation_count,
            path: run.path.clone(),
            reference_cost: run.reference_cost,
        })
    }

    fn check(&self, event: Event) -> Result<State, TransitionError> {
        if self.pending.is_some() {
            return Err(TransitionError::InTransition { event });
        }
        state::target(event, self.state).ok_or(TransitionError::Illegal {
            event,
            state: self.state,
        })
    }

    pub fn can(&self, event: Event) -> bool {
        self.check(event).is_ok()
    }

    /// Moves to the event's target state and runs the entry action. Returns
    /// the state that was left.
    fn transition(&mut self, event: Event) -> Result<State, TransitionError> {
        let to = self.check(event)?;
        let from = self.state;
        self.state = to;
        trace!(%event, %from, %to, "transition");
        if from != to {
            self.on_enter(to)?;
        }
        Ok(from)
    }

    fn on_enter(&mut self, state: State) -> Result<(), TransitionError> {
        debug!("=> {}", state);
        if state == State::Starting {
            self.clear_footprints();
        }
        if let Some(states) = entry_buttons(state) {
            self.set_button_states(states);
        }
        match state {
            State::Starting => self.search(),
            State::Searching => self.pause(),
            _ => Ok(()),
        }
    }

    fn set_button_states(&mut self, states: ButtonStates) {
        self.controls.apply(&states);
        self.view.set_button_states(&states);
    }

    /// Builds the view's grid. Completes immediately when the view reports the
    /// grid ready; otherwise stays pending until [`Controller::grid_generated`].
    pub fn init(&mut self) -> Result<(), TransitionError> {
        self.check(Event::Init)?;
        self.pending = Some(Event::Init);
        self.view.init(self.grid.cols, self.grid.rows);
        match self.view.generate_grid(&self.grid) {
            GridGeneration::Ready => self.grid_generated(),
            GridGeneration::Pending => {
                debug!("waiting for grid generation");
                Ok(())
            }
        }
    }

    /// Completion signal for a pending `init`.
    pub fn grid_generated(&mut self) -> Result<(), TransitionError> {
        if self.pending != Some(Event::Init) {
            return Err(TransitionError::Illegal {
                event: Event::Init,
                state: self.state,
            });
        }
        self.pending = None;
        self.set_default_start_end_pos();
        self.transition(Event::Init)?;
        info!(cols = self.grid.cols, rows = self.grid.rows, "grid ready");
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.check(Event::Start)?;
        // A rebuild still waiting on animations has to land before the new run.
        if self.deferred.cancel(DeferredTask::Reset) > 0 {
            self.run_deferred(DeferredTask::Reset);
        }
        self.transition(Event::Start)?;
        Ok(())
    }

    /// Runs the finder once on a copy of the grid and keeps the whole
    /// operation log for replay.
    pub fn search(&mut self) -> Result<(), TransitionError> {
        self.transition(Event::Search)?;

        let grid = self.grid.clone();
        self.recorder.begin_run();
        let started = Instant::now();
        let path = self
            .finder
            .find_path(self.start, self.end, &grid, &mut self.recorder)
            .unwrap_or_default();
        let time_spent = started.elapsed();

        let log = self.recorder.take_log();
        let operation_count = log.len();
        let reference_cost = reference_cost(&grid, self.start, self.end, self.settings.finder.diagonal);
        info!(
            algorithm = self.finder.name(),
            operations = operation_count,
            path_nodes = path.len(),
            elapsed = ?time_spent,
            "search complete"
        );

        self.run = Some(SearchRun {
            player: StepPlayer::new(log),
            path,
            time_spent,
            operation_count,
            reference_cost,
        });
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), TransitionError> {
        self.transition(Event::Pause)?;
        Ok(())
    }

    /// Replays one operation. Entering `Searching` pauses again right away.
    pub fn resume(&mut self) -> Result<(), TransitionError> {
        self.transition(Event::Resume)?;
        self.step()
    }

    /// Applies the next supported operation, or finishes when none is left.
    pub fn step(&mut self) -> Result<(), TransitionError> {
        let outcome = match self.run.as_mut() {
            Some(run) => run.player.step(&mut self.view),
            None => StepOutcome::Exhausted,
        };
        match outcome {
            StepOutcome::Rendered(op) => {
                trace!(attr = %op.attr, position = %op.position, value = op.value, "step");
                Ok(())
            }
            StepOutcome::Exhausted => self.finish(),
        }
    }

    /// Resumes until the replay finishes. Returns the number of resumes.
    pub fn run_to_end(&mut self) -> Result<usize, TransitionError> {
        self.check(Event::Resume)?;
        let mut resumes = 0;
        while self.state == State::Paused {
            self.resume()?;
            resumes += 1;
        }
        Ok(resumes)
    }

    /// Only reachable once the log is exhausted.
    pub fn finish(&mut self) -> Result<(), TransitionError> {
        self.check(Event::Finish)?;
        if self.pending_operations() > 0 {
            return Err(TransitionError::Guard {
                event: Event::Finish,
                reason: "operations remain to be replayed",
            });
        }
        self.transition(Event::Finish)?;

        if let Some(stats) = self.summary() {
            info!(
                path_length = stats.path_length,
                operations = stats.operation_count,
                steps = self.steps_taken(),
                "replay finished"
            );
            self.view.show_stats(&stats);
            self.view.draw_path(&stats.path);
        }
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.transition(Event::Cancel)?;
        self.clear_operations();
        self.clear_footprints();
        Ok(())
    }

    /// Clears the current run after the settle delay and searches again.
    pub fn restart(&mut self) -> Result<(), TransitionError> {
        self.transition(Event::Restart)?;
        self.deferred.schedule(self.settle_delay(), DeferredTask::Restart);
        Ok(())
    }

    pub fn modify(&mut self) -> Result<(), TransitionError> {
        self.transition(Event::Modify)?;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), TransitionError> {
        self.transition(Event::Clear)?;
        self.clear_operations();
        self.clear_footprints();
        Ok(())
    }

    /// Back to `Ready` now; the grid is rebuilt after the settle delay.
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        self.check(Event::Reset)?;
        if self.state == State::None {
            // Nothing to clear yet; leaving `none` still has to build the grid.
            return self.init();
        }
        self.transition(Event::Reset)?;
        self.clear_operations();
        let superseded = self.deferred.cancel(DeferredTask::Restart);
        if superseded > 0 {
            debug!(superseded, "pending restart dropped by reset");
        }
        self.deferred.schedule(self.settle_delay(), DeferredTask::Reset);
        Ok(())
    }

    pub fn drag_start(&mut self, pos: Position) -> Result<(), TransitionError> {
        self.check(Event::DragStart)?;
        if pos != self.start {
            return Err(TransitionError::Guard {
                event: Event::DragStart,
                reason: "pointer is not on the start marker",
            });
        }
        self.transition(Event::DragStart)?;
        Ok(())
    }

    pub fn drag_end(&mut self, pos: Position) -> Result<(), TransitionError> {
        self.check(Event::DragEnd)?;
        if pos != self.end {
            return Err(TransitionError::Guard {
                event: Event::DragEnd,
                reason: "pointer is not on the end marker",
            });
        }
        self.transition(Event::DragEnd)?;
        Ok(())
    }

    /// Starts painting walls, blocking `pos` right away.
    pub fn draw_wall(&mut self, pos: Position) -> Result<(), TransitionError> {
        self.check(Event::DrawWall)?;
        if self.is_start_or_end_pos(pos) || !self.grid.is_walkable_at(pos) {
            return Err(TransitionError::Guard {
                event: Event::DrawWall,
                reason: "cell is a marker or not walkable",
            });
        }
        self.transition(Event::DrawWall)?;
        self.set_walkable_at(pos, false);
        Ok(())
    }

    /// Starts erasing walls, clearing `pos` right away.
    pub fn erase_wall(&mut self, pos: Position) -> Result<(), TransitionError> {
        self.check(Event::EraseWall)?;
        if !self.grid.contains(pos) || self.grid.is_walkable_at(pos) {
            return Err(TransitionError::Guard {
                event: Event::EraseWall,
                reason: "cell is not blocked",
            });
        }
        self.transition(Event::EraseWall)?;
        self.set_walkable_at(pos, true);
        Ok(())
    }

    pub fn rest(&mut self) -> Result<(), TransitionError> {
        self.transition(Event::Rest)?;
        Ok(())
    }

    /// Moves the deferred-task clock forward and runs whatever came due.
    pub fn advance(&mut self, elapsed: Duration) {
        for task in self.deferred.advance(elapsed) {
            self.run_deferred(task);
        }
    }

    /// Advances until no deferred task is left.
    pub fn settle(&mut self) {
        while let Some(remaining) = self.deferred.next_due() {
            self.advance(remaining);
        }
    }

    fn run_deferred(&mut self, task: DeferredTask) {
        match task {
            DeferredTask::Restart => {
                if self.state != State::Restarting {
                    debug!(state = %self.state, "deferred restart no longer applies");
                    return;
                }
                self.clear_operations();
                self.clear_footprints();
                if let Err(err) = self.start() {
                    warn!(%err, "deferred restart failed");
                }
            }
            DeferredTask::Reset => {
                self.clear_operations();
                self.clear_all();
                self.build_new_grid();
                debug!("grid rebuilt");
            }
        }
    }

    /// Fires the action bound to `slot`. Returns `false` when the button is
    /// disabled or unbound.
    pub fn press(&mut self, slot: ControlSlot) -> Result<bool, TransitionError> {
        let Some(action) = self.controls.pressable(slot) else {
            debug!(?slot, "press on inactive control");
            return Ok(false);
        };
        let result = match action {
            ControlAction::Start => self.start(),
            ControlAction::Resume => self.resume(),
            ControlAction::Cancel => self.cancel(),
            ControlAction::Clear => self.clear(),
            ControlAction::Reset => self.reset(),
        };
        result.map(|()| true)
    }

    fn edit_context(&self) -> EditContext<'_> {
        EditContext {
            grid: &self.grid,
            start: self.start,
            end: self.end,
        }
    }

    pub fn pointer_down(&mut self, event: PointerEvent) {
        let Some(cell) = self.view.to_grid_coordinate(event.x, event.y) else {
            return;
        };
        let intent = interpret_press(cell, &self.edit_context(), |e| self.can(e));
        let result = match intent {
            PressIntent::DragStart => self.drag_start(cell),
            PressIntent::DragEnd => self.drag_end(cell),
            PressIntent::DrawWall => self.draw_wall(cell),
            PressIntent::EraseWall => self.erase_wall(cell),
            PressIntent::Nothing => Ok(()),
        };
        if let Err(err) = result {
            debug!(%err, "pointer press ignored");
        }
    }

    pub fn pointer_move(&mut self, event: PointerEvent) {
        let Some(cell) = self.view.to_grid_coordinate(event.x, event.y) else {
            return;
        };
        let effect = interpret_move(cell, self.state, &self.edit_context());
        match effect {
            MoveEffect::MoveStart(pos) => self.set_start_pos(pos),
            MoveEffect::MoveEnd(pos) => self.set_end_pos(pos),
            MoveEffect::SetWalkable(pos, walkable) => self.set_walkable_at(pos, walkable),
            MoveEffect::Nothing => {}
        }
    }

    /// Releasing anywhere ends the current edit.
    pub fn pointer_up(&mut self, _event: PointerEvent) {
        if self.can(Event::Rest) {
            if let Err(err) = self.rest() {
                debug!(%err, "pointer release ignored");
            }
        }
    }

    /// Blocks up to `count` random cells, keeping the markers clear.
    pub fn scatter_walls(&mut self, count: usize, seed: Option<u64>) -> Result<usize, TransitionError> {
        self.check(Event::DrawWall)?;
        let placed = self.grid.scatter_walls(count, seed, &[self.start, self.end]);
        for pos in &placed {
            self.view.set_attribute_at(*pos, NodeAttr::Walkable, false);
        }
        debug!(placed = placed.len(), "walls scattered");
        Ok(placed.len())
    }

    fn clear_operations(&mut self) {
        if let Some(mut run) = self.run.take() {
            let dropped = run.player.drain();
            trace!(dropped, "operations discarded");
        }
    }

    fn clear_footprints(&mut self) {
        self.view.clear_footprints();
        self.view.clear_path();
    }

    fn clear_all(&mut self) {
        self.clear_footprints();
        self.view.clear_blocked_nodes();
    }

    fn build_new_grid(&mut self) {
        self.grid = Grid::new(self.settings.cols, self.settings.rows);
        self.set_default_start_end_pos();
    }

    fn set_default_start_end_pos(&mut self) {
        self.set_start_pos(self.settings.default_start);
        self.set_end_pos(self.settings.default_end);
    }

    fn set_start_pos(&mut self, pos: Position) {
        self.start = pos;
        self.view.set_start_pos(pos);
    }

    fn set_end_pos(&mut self, pos: Position) {
        self.end = pos;
        self.view.set_end_pos(pos);
    }

    fn set_walkable_at(&mut self, pos: Position, walkable: bool) {
        self.grid.set_walkable_at(pos, walkable);
        self.view.set_attribute_at(pos, NodeAttr::Walkable, walkable);
    }

    fn is_start_or_end_pos(&self, pos: Position) -> bool {
        pos == self.start || pos == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::HeadlessView;

    fn ready() -> Controller<HeadlessView> {
        let mut controller = Controller::new(Settings::default(), HeadlessView::new());
        controller.init().expect("init from none");
        controller
    }

    #[test]
    fn init_places_default_markers() {
        let controller = ready();
        assert_eq!(controller.state(), State::Ready);
        assert_eq!(controller.start_pos(), Position::new(1, 1));
        assert_eq!(controller.end_pos(), Position::new(14, 14));
        assert_eq!(controller.view().board.start, Some(Position::new(1, 1)));
        assert_eq!(controller.controls().pressable(ControlSlot::Primary), Some(ControlAction::Start));
    }

    #[test]
    fn illegal_events_change_nothing() {
        let mut controller = ready();
        let updates = controller.view().button_updates;
        assert_eq!(
            controller.resume(),
            Err(TransitionError::Illegal {
                event: Event::Resume,
                state: State::Ready
            })
        );
        assert!(controller.cancel().is_err());
        assert!(controller.finish().is_err());
        assert_eq!(controller.state(), State::Ready);
        assert_eq!(controller.view().button_updates, updates);
    }

    #[test]
    fn start_lands_in_paused_with_a_log() {
        let mut controller = ready();
        controller.start().expect("start from ready");
        assert_eq!(controller.state(), State::Paused);
        assert!(controller.pending_operations() > 0);
        assert_eq!(controller.searches_run(), 1);
        assert_eq!(controller.controls().button(ControlSlot::Primary).label, "Next Step");
        assert_eq!(controller.controls().pressable(ControlSlot::Secondary), Some(ControlAction::Cancel));
    }

    #[test]
    fn finish_is_guarded_while_operations_remain() {
        let mut controller = ready();
        controller.start().expect("start");
        assert!(matches!(controller.finish(), Err(TransitionError::Guard { .. })));
        assert_eq!(controller.state(), State::Paused);
    }

    #[test]
    fn guards_reject_wrong_cells() {
        let mut controller = ready();
        assert!(matches!(
            controller.drag_start(Position::new(3, 3)),
            Err(TransitionError::Guard { .. })
        ));
        assert!(controller.draw_wall(Position::new(1, 1)).is_err());
        assert!(controller.erase_wall(Position::new(3, 3)).is_err());
        assert_eq!(controller.state(), State::Ready);
        assert!(controller.grid().is_walkable_at(Position::new(1, 1)));
    }

    #[test]
    fn settle_delay_scales_colorize_duration() {
        let view = HeadlessView::new().with_colorize_duration(Duration::from_millis(100));
        let controller = Controller::new(Settings::default(), view);
        assert_eq!(controller.settle_delay(), Duration::from_millis(120));
    }

    #[test]
    fn scatter_walls_requires_an_editable_state() {
        let mut controller = ready();
        let placed = controller.scatter_walls(20, Some(3)).expect("ready");
        assert_eq!(controller.grid().wall_count(), placed);
        assert_eq!(controller.view().board.blocked_count(), placed);

        controller.start().expect("start");
        assert!(controller.scatter_walls(5, Some(3)).is_err());
    }
}

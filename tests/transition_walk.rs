//! Random event sequences against the transition table.

use pathfinding_stepper::controller::controls::ControlPanel;
use pathfinding_stepper::controller::state::{target, Event, State};
use pathfinding_stepper::controller::{Controller, Settings};
use pathfinding_stepper::error::TransitionError;
use pathfinding_stepper::grid::{Grid, Position};
use pathfinding_stepper::view::HeadlessView;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    state: State,
    pending: usize,
    steps: usize,
    grid: Grid,
    start: Position,
    end: Position,
    controls: ControlPanel,
    deferred: bool,
    button_updates: usize,
}

fn snapshot(controller: &Controller<HeadlessView>) -> Snapshot {
    Snapshot {
        state: controller.state(),
        pending: controller.pending_operations(),
        steps: controller.steps_taken(),
        grid: controller.grid().clone(),
        start: controller.start_pos(),
        end: controller.end_pos(),
        controls: controller.controls().clone(),
        deferred: controller.has_deferred(),
        button_updates: controller.view().button_updates,
    }
}

fn free_cell(controller: &Controller<HeadlessView>, walkable: bool) -> Position {
    let grid = controller.grid();
    (0..grid.cols)
        .flat_map(|x| (0..grid.rows).map(move |y| Position::new(x, y)))
        .find(|&pos| {
            pos != controller.start_pos()
                && pos != controller.end_pos()
                && grid.is_walkable_at(pos) == walkable
        })
        .unwrap_or(Position::new(0, 0))
}

fn fire(controller: &mut Controller<HeadlessView>, event: Event) -> Result<(), TransitionError> {
    match event {
        Event::Init => controller.init(),
        Event::Start => controller.start(),
        Event::Search => controller.search(),
        Event::Pause => controller.pause(),
        Event::Resume => controller.resume(),
        Event::Finish => controller.finish(),
        Event::Cancel => controller.cancel(),
        Event::Restart => controller.restart(),
        Event::Modify => controller.modify(),
        Event::Clear => controller.clear(),
        Event::Reset => controller.reset(),
        Event::DragStart => {
            let pos = controller.start_pos();
            controller.drag_start(pos)
        }
        Event::DragEnd => {
            let pos = controller.end_pos();
            controller.drag_end(pos)
        }
        Event::DrawWall => {
            let pos = free_cell(controller, true);
            controller.draw_wall(pos)
        }
        Event::EraseWall => {
            let pos = free_cell(controller, false);
            controller.erase_wall(pos)
        }
        Event::Rest => controller.rest(),
    }
}

/// `Starting` and `Searching` hand over to the replay on entry.
fn lands_on(expected: State, actual: State) -> bool {
    match expected {
        State::Starting | State::Searching => matches!(actual, State::Paused | State::Finished),
        _ => actual == expected,
    }
}

fn assert_tables_consistent(controller: &Controller<HeadlessView>) {
    let open: HashSet<_> = controller.open_entries().iter().map(|e| e.position).collect();
    let closed: HashSet<_> = controller.closed_entries().iter().map(|e| e.position).collect();
    assert!(open.is_disjoint(&closed), "a coordinate is both open and closed");

    for list in [controller.open_entries(), controller.closed_entries()] {
        let scores: Vec<f64> = list.iter().map(|e| e.f.unwrap_or(f64::INFINITY)).collect();
        assert!(scores.windows(2).all(|pair| pair[0] <= pair[1]), "{scores:?}");
    }
}

fn walk(seed: u64, events: usize) {
    let settings = Settings::for_grid(10, 10);
    let mut controller = Controller::new(settings, HeadlessView::new());
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..events {
        if rng.gen_ratio(1, 10) {
            controller.settle();
            assert_tables_consistent(&controller);
            continue;
        }

        let event = Event::ALL[rng.gen_range(0..Event::ALL.len())];
        let before = snapshot(&controller);
        let expected = target(event, before.state);

        match fire(&mut controller, event) {
            Ok(()) => {
                let expected = expected.unwrap_or_else(|| panic!("{event} accepted in {}", before.state));
                let actual = controller.state();
                assert!(lands_on(expected, actual), "{event}: {} -> {actual}", before.state);
            }
            Err(err) => {
                assert_eq!(snapshot(&controller), before, "{err} changed the session");
            }
        }
        assert_tables_consistent(&controller);
    }
}

#[test]
fn random_sequences_follow_the_table() {
    for seed in 0..8 {
        walk(seed, 300);
    }
}

#[test]
fn every_unlisted_event_is_refused_after_init() {
    let mut controller = Controller::new(Settings::default(), HeadlessView::new());
    controller.init().expect("init");

    for event in Event::ALL {
        if target(event, State::Ready).is_some() {
            continue;
        }
        let before = snapshot(&controller);
        let result = fire(&mut controller, event);
        assert_eq!(
            result,
            Err(TransitionError::Illegal {
                event,
                state: State::Ready
            })
        );
        assert_eq!(snapshot(&controller), before);
    }
}

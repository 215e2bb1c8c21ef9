use crate::controller::state::{Event, State};
use crate::grid::{Grid, Position};

/// A pointer position in view pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn at(x: f64, y: f64) -> Self {
        PointerEvent { x, y }
    }
}

impl From<(f64, f64)> for PointerEvent {
    fn from((x, y): (f64, f64)) -> Self {
        PointerEvent { x, y }
    }
}

/// The grid and markers an edit is judged against.
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    pub grid: &'a Grid,
    pub start: Position,
    pub end: Position,
}

impl EditContext<'_> {
    pub fn is_marker(&self, pos: Position) -> bool {
        pos == self.start || pos == self.end
    }
}

/// What a pointer press should begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressIntent {
    DragStart,
    DragEnd,
    DrawWall,
    EraseWall,
    Nothing,
}

impl PressIntent {
    pub fn event(self) -> Option<Event> {
        match self {
            PressIntent::DragStart => Some(Event::DragStart),
            PressIntent::DragEnd => Some(Event::DragEnd),
            PressIntent::DrawWall => Some(Event::DrawWall),
            PressIntent::EraseWall => Some(Event::EraseWall),
            PressIntent::Nothing => None,
        }
    }
}

/// What moving the pointer over a cell should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEffect {
    MoveStart(Position),
    MoveEnd(Position),
    SetWalkable(Position, bool),
    Nothing,
}

/// Picks the edit a press on `cell` begins. Markers win over walls; a wall is
/// drawn from a walkable cell and erased from a blocked one.
pub fn interpret_press(cell: Position, ctx: &EditContext<'_>, can: impl Fn(Event) -> bool) -> PressIntent {
    if can(Event::DragStart) && cell == ctx.start {
        return PressIntent::DragStart;
    }
    if can(Event::DragEnd) && cell == ctx.end {
        return PressIntent::DragEnd;
    }
    // Markers are always walkable; they must never be painted over.
    if ctx.is_marker(cell) || !ctx.grid.contains(cell) {
        return PressIntent::Nothing;
    }
    if can(Event::DrawWall) && ctx.grid.is_walkable_at(cell) {
        return PressIntent::DrawWall;
    }
    if can(Event::EraseWall) && !ctx.grid.is_walkable_at(cell) {
        return PressIntent::EraseWall;
    }
    PressIntent::Nothing
}

/// Decides what dragging over `cell` does in `state`.
pub fn interpret_move(cell: Position, state: State, ctx: &EditContext<'_>) -> MoveEffect {
    if ctx.is_marker(cell) || !ctx.grid.contains(cell) {
        return MoveEffect::Nothing;
    }
    match state {
        State::DraggingStart if ctx.grid.is_walkable_at(cell) => MoveEffect::MoveStart(cell),
        State::DraggingEnd if ctx.grid.is_walkable_at(cell) => MoveEffect::MoveEnd(cell),
        State::DrawingWall => MoveEffect::SetWalkable(cell, false),
        State::ErasingWall => MoveEffect::SetWalkable(cell, true),
        _ => MoveEffect::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::state::target;

    fn ctx(grid: &Grid) -> EditContext<'_> {
        EditContext {
            grid,
            start: Position::new(1, 1),
            end: Position::new(6, 6),
        }
    }

    fn allowed_in(state: State) -> impl Fn(Event) -> bool {
        move |event| target(event, state).is_some()
    }

    #[test]
    fn press_on_markers_starts_drags() {
        let grid = Grid::new(8, 8);
        let ctx = ctx(&grid);
        assert_eq!(interpret_press(Position::new(1, 1), &ctx, allowed_in(State::Ready)), PressIntent::DragStart);
        assert_eq!(interpret_press(Position::new(6, 6), &ctx, allowed_in(State::Finished)), PressIntent::DragEnd);
    }

    #[test]
    fn press_on_cells_paints_or_erases() {
        let mut grid = Grid::new(8, 8);
        grid.set_walkable_at(Position::new(3, 3), false);
        let ctx = ctx(&grid);
        assert_eq!(interpret_press(Position::new(2, 2), &ctx, allowed_in(State::Ready)), PressIntent::DrawWall);
        assert_eq!(interpret_press(Position::new(3, 3), &ctx, allowed_in(State::Ready)), PressIntent::EraseWall);
    }

    #[test]
    fn nothing_happens_while_searching() {
        let grid = Grid::new(8, 8);
        let ctx = ctx(&grid);
        for cell in [Position::new(1, 1), Position::new(6, 6), Position::new(2, 2)] {
            assert_eq!(interpret_press(cell, &ctx, allowed_in(State::Paused)), PressIntent::Nothing);
        }
    }

    #[test]
    fn cells_outside_the_grid_are_ignored() {
        let grid = Grid::new(8, 8);
        let ctx = ctx(&grid);
        assert_eq!(interpret_press(Position::new(9, 0), &ctx, allowed_in(State::Ready)), PressIntent::Nothing);
        assert_eq!(interpret_move(Position::new(9, 0), State::ErasingWall, &ctx), MoveEffect::Nothing);
    }

    #[test]
    fn drags_only_land_on_walkable_cells() {
        let mut grid = Grid::new(8, 8);
        grid.set_walkable_at(Position::new(4, 4), false);
        let ctx = ctx(&grid);
        assert_eq!(
            interpret_move(Position::new(5, 5), State::DraggingEnd, &ctx),
            MoveEffect::MoveEnd(Position::new(5, 5))
        );
        assert_eq!(interpret_move(Position::new(4, 4), State::DraggingStart, &ctx), MoveEffect::Nothing);
    }

    #[test]
    fn markers_are_never_painted() {
        let grid = Grid::new(8, 8);
        let ctx = ctx(&grid);
        assert_eq!(interpret_move(Position::new(6, 6), State::DrawingWall, &ctx), MoveEffect::Nothing);
        assert_eq!(interpret_move(Position::new(6, 6), State::DraggingStart, &ctx), MoveEffect::Nothing);
        assert_eq!(
            interpret_move(Position::new(2, 6), State::DrawingWall, &ctx),
            MoveEffect::SetWalkable(Position::new(2, 6), false)
        );
        assert_eq!(interpret_move(Position::new(2, 6), State::Ready, &ctx), MoveEffect::Nothing);
    }
}

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    None,
    Ready,
    Starting,
    Searching,
    Paused,
    Finished,
    Modified,
    Restarting,
    DraggingStart,
    DraggingEnd,
    DrawingWall,
    ErasingWall,
}

impl State {
    pub const ALL: [State; 12] = [
        State::None,
        State::Ready,
        State::Starting,
        State::Searching,
        State::Paused,
        State::Finished,
        State::Modified,
        State::Restarting,
        State::DraggingStart,
        State::DraggingEnd,
        State::DrawingWall,
        State::ErasingWall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            State::None => "none",
            State::Ready => "ready",
            State::Starting => "starting",
            State::Searching => "searching",
            State::Paused => "paused",
            State::Finished => "finished",
            State::Modified => "modified",
            State::Restarting => "restarting",
            State::DraggingStart => "draggingStart",
            State::DraggingEnd => "draggingEnd",
            State::DrawingWall => "drawingWall",
            State::ErasingWall => "erasingWall",
        }
    }

    /// States in which a pointer drag or paint is in progress.
    pub fn is_editing(self) -> bool {
        matches!(
            self,
            State::DraggingStart | State::DraggingEnd | State::DrawingWall | State::ErasingWall
        )
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Init,
    Start,
    Search,
    Pause,
    Resume,
    Finish,
    Cancel,
    Restart,
    Modify,
    Clear,
    Reset,
    DragStart,
    DragEnd,
    DrawWall,
    EraseWall,
    Rest,
}

impl Event {
    pub const ALL: [Event; 16] = [
        Event::Init,
        Event::Start,
        Event::Search,
        Event::Pause,
        Event::Resume,
        Event::Finish,
        Event::Cancel,
        Event::Restart,
        Event::Modify,
        Event::Clear,
        Event::Reset,
        Event::DragStart,
        Event::DragEnd,
        Event::DrawWall,
        Event::EraseWall,
        Event::Rest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Event::Init => "init",
            Event::Start => "start",
            Event::Search => "search",
            Event::Pause => "pause",
            Event::Resume => "resume",
            Event::Finish => "finish",
            Event::Cancel => "cancel",
            Event::Restart => "restart",
            Event::Modify => "modify",
            Event::Clear => "clear",
            Event::Reset => "reset",
            Event::DragStart => "dragStart",
            Event::DragEnd => "dragEnd",
            Event::DrawWall => "drawWall",
            Event::EraseWall => "eraseWall",
            Event::Rest => "rest",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct Transition {
    event: Event,
    from: &'static [State],
    to: State,
}

const EDIT_ORIGINS: &[State] = &[State::Ready, State::Finished];

const TRANSITIONS: &[Transition] = &[
    Transition { event: Event::Init, from: &[State::None], to: State::Ready },
    Transition {
        event: Event::Start,
        from: &[State::Ready, State::Modified, State::Restarting],
        to: State::Starting,
    },
    Transition { event: Event::Search, from: &[State::Starting], to: State::Searching },
    Transition { event: Event::Pause, from: &[State::Searching], to: State::Paused },
    Transition { event: Event::Resume, from: &[State::Paused], to: State::Searching },
    Transition { event: Event::Finish, from: &[State::Paused], to: State::Finished },
    Transition { event: Event::Cancel, from: &[State::Paused], to: State::Ready },
    Transition {
        event: Event::Restart,
        from: &[State::Searching, State::Finished],
        to: State::Restarting,
    },
    Transition { event: Event::Modify, from: &[State::Finished], to: State::Modified },
    Transition {
        event: Event::Clear,
        from: &[State::Finished, State::Modified],
        to: State::Ready,
    },
    Transition { event: Event::Reset, from: &State::ALL, to: State::Ready },
    Transition { event: Event::DragStart, from: EDIT_ORIGINS, to: State::DraggingStart },
    Transition { event: Event::DragEnd, from: EDIT_ORIGINS, to: State::DraggingEnd },
    Transition { event: Event::DrawWall, from: EDIT_ORIGINS, to: State::DrawingWall },
    Transition { event: Event::EraseWall, from: EDIT_ORIGINS, to: State::ErasingWall },
    Transition {
        event: Event::Rest,
        from: &[
            State::DraggingStart,
            State::DraggingEnd,
            State::DrawingWall,
            State::ErasingWall,
        ],
        to: State::Ready,
    },
];

/// Where `event` leads from `from`, or `None` if it is not allowed there.
pub fn target(event: Event, from: State) -> Option<State> {
    TRANSITIONS
        .iter()
        .find(|t| t.event == event && t.from.contains(&from))
        .map(|t| t.to)
}

/// Origins the table lists for `event`.
pub fn origins(event: Event) -> &'static [State] {
    TRANSITIONS
        .iter()
        .find(|t| t.event == event)
        .map(|t| t.from)
        .unwrap_or(&[])
}

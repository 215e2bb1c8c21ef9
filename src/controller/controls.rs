use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSlot {
    Primary,
    Secondary,
    Reset,
}

impl ControlSlot {
    pub const ALL: [ControlSlot; 3] = [ControlSlot::Primary, ControlSlot::Secondary, ControlSlot::Reset];

    fn index(self) -> usize {
        match self {
            ControlSlot::Primary => 0,
            ControlSlot::Secondary => 1,
            ControlSlot::Reset => 2,
        }
    }
}

/// What a button does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    Start,
    Resume,
    Cancel,
    Clear,
    Reset,
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlAction::Start => "start",
            ControlAction::Resume => "resume",
            ControlAction::Cancel => "cancel",
            ControlAction::Clear => "clear",
            ControlAction::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// A partial update for one button. Unset fields leave the button as it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonConfig {
    pub label: Option<&'static str>,
    pub enabled: Option<bool>,
    pub action: Option<ControlAction>,
}

impl ButtonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn action(mut self, action: ControlAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn is_noop(&self) -> bool {
        *self == ButtonConfig::default()
    }
}

/// One update covering all three slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonStates {
    pub primary: ButtonConfig,
    pub secondary: ButtonConfig,
    pub reset: ButtonConfig,
}

impl ButtonStates {
    pub fn slot(&self, slot: ControlSlot) -> &ButtonConfig {
        match slot {
            ControlSlot::Primary => &self.primary,
            ControlSlot::Secondary => &self.secondary,
            ControlSlot::Reset => &self.reset,
        }
    }
}

/// Current look and binding of a button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub enabled: bool,
    pub action: Option<ControlAction>,
}

/// Accumulated button state after applying every update so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlPanel {
    buttons: [Button; 3],
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, states: &ButtonStates) {
        for slot in ControlSlot::ALL {
            let config = states.slot(slot);
            let button = &mut self.buttons[slot.index()];
            if let Some(label) = config.label {
                button.label = label;
            }
            if let Some(enabled) = config.enabled {
                button.enabled = enabled;
            }
            if let Some(action) = config.action {
                button.action = Some(action);
            }
        }
    }

    pub fn button(&self, slot: ControlSlot) -> &Button {
        &self.buttons[slot.index()]
    }

    /// The action a press on `slot` would trigger, if the button is enabled.
    pub fn pressable(&self, slot: ControlSlot) -> Option<ControlAction> {
        let button = self.button(slot);
        button.enabled.then_some(button.action).flatten()
    }
}

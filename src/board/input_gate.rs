//! Input gating: which board commands are currently admitted
//!
//! Two states are enough for the battle loop. Each confirmed action closes
//! the gate until its completion signals resolve.

use serde::{Deserialize, Serialize};

/// Commands arriving from the host's input surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardCommand {
    Hover,
    Exit,
    Click,
    EndTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputState {
    #[default]
    Enabled,
    Disabled,
}

impl InputState {
    /// Per-state admission table
    pub fn admits(&self, command: BoardCommand) -> bool {
        match self {
            InputState::Enabled => matches!(
                command,
                BoardCommand::Hover | BoardCommand::Exit | BoardCommand::Click | BoardCommand::EndTurn
            ),
            InputState::Disabled => false,
        }
    }
}

/// Current-state register.
///
/// A stack of modal states can slot in here later; the battle loop only
/// needs get/set plus the change notification the session emits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputGate {
    current: InputState,
}

impl InputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> InputState {
        self.current
    }

    /// Returns true when the state actually changed
    pub fn set(&mut self, state: InputState) -> bool {
        if self.current == state {
            return false;
        }
        self.current = state;
        true
    }

    pub fn admits(&self, command: BoardCommand) -> bool {
        self.current.admits(command)
    }
}

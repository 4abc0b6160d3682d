//! Battle board core - grid combat with AP-gated moves and attacks
//!
//! One `BattleSession` owns everything a battle needs: the grid, both
//! parties, the turn queue, the input gate, and the completion tracker.
//! Hosts feed it hover/click/end-turn requests, execute the orders it
//! returns, and deliver the resulting completion signals.

pub mod commands;
pub mod completion;
pub mod constants;
pub mod events;
pub mod grid;
pub mod input_gate;
pub mod party;
pub mod pathfinding;
pub mod session;
pub mod turn_queue;

// Re-exports for convenient access
pub use commands::{AttackOrder, CommandReply, MoveOrder, RejectReason, ResolutionSignal};
pub use completion::{ActionTracker, Completion};
pub use constants::{DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, STEP_COST};
pub use events::{BoardEvent, EventLog, HoverReport};
pub use grid::{Cell, Grid};
pub use input_gate::{BoardCommand, InputGate, InputState};
pub use party::{Combatant, HealthStatus, Party, Roster};
pub use pathfinding::{find_route, Route, SearchGrid};
pub use session::{BattlePhase, BattleSession};
pub use turn_queue::TurnQueue;

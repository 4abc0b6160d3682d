use thiserror::Error;

use crate::core::types::{CombatantId, GridPos, Side};

/// Invariant faults in the engine's own bookkeeping.
///
/// None of these are user input problems; user input problems are rejected
/// commands, which never surface as errors. An `EngineError` means the battle
/// state can no longer be trusted and the host must treat it as fatal.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("unknown combatant: {0:?}")]
    UnknownCombatant(CombatantId),

    #[error("combatant {id:?} registered at {at:?}, but that cell holds {found:?}")]
    StaleOccupancy {
        id: CombatantId,
        at: GridPos,
        found: Option<CombatantId>,
    },

    #[error("cell {0:?} is outside the board")]
    OutOfBounds(GridPos),

    #[error("cell {0:?} is already occupied")]
    CellOccupied(GridPos),

    #[error("spawn cell {0:?} is not walkable")]
    SpawnNotWalkable(GridPos),

    #[error("party {0:?} has no combatants")]
    EmptyParty(Side),

    #[error("turn queue is empty")]
    EmptyTurnQueue,

    #[error("turn queue has no living combatant")]
    NoLivingCombatant,

    #[error("move completion for {0:?} with no move in flight")]
    NoActiveMove(CombatantId),
}

pub type Result<T> = std::result::Result<T, EngineError>;

//! Replies, orders, and signals crossing the collaborator boundary
//!
//! The session never calls collaborators directly: a confirmed click hands
//! back an order for the host to execute, and the host later delivers the
//! matching completion signals.

use serde::{Deserialize, Serialize};

use crate::core::types::CombatantId;

use crate::board::pathfinding::Route;

/// Why a command was refused. Refusals never mutate the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// An action is still resolving
    InputDisabled,
    NotEnoughAp,
    /// Attack target is not orthogonally adjacent
    TargetTooFar,
    CellNotVacant,
    NoRouteToCell,
    OutOfBounds,
    /// The battle reached its terminal phase
    BattleOver,
}

/// A confirmed move, for the mover collaborator.
///
/// The collaborator signals `ResolutionSignal::Moved` exactly once when the
/// actor has finished walking the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOrder {
    pub mover: CombatantId,
    pub route: Route,
    pub ap_cost: u32,
}

/// A confirmed attack, for the attack-resolution collaborator.
///
/// The collaborator signals once per participant: `Attacked` for the
/// attacker and `Hit` (carrying the damage dealt) for the defender, in
/// either order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOrder {
    pub attacker: CombatantId,
    pub defender: CombatantId,
    pub ap_cost: u32,
}

/// Reply to one board command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandReply {
    /// Admitted; no collaborator work required
    Accepted,
    /// Click confirmed a move
    MoveStarted(MoveOrder),
    /// Click confirmed an attack
    AttackStarted(AttackOrder),
    /// Refused; the model was not touched
    Rejected(RejectReason),
}

impl CommandReply {
    pub fn is_rejected(&self) -> bool {
        matches!(self, CommandReply::Rejected(_))
    }
}

/// Deferred completion signals delivered back by the collaborators.
///
/// Arrival order and timing are not under the engine's control; stray and
/// duplicate signals are tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionSignal {
    /// The mover finished walking its route
    Moved { mover: CombatantId },
    /// The attacker's swing finished resolving
    Attacked { attacker: CombatantId },
    /// The defender absorbed the blow; `damage` is what the resolver dealt
    Hit { defender: CombatantId, damage: u32 },
}

impl ResolutionSignal {
    /// The participant this signal completes
    pub fn participant(&self) -> CombatantId {
        match self {
            ResolutionSignal::Moved { mover } => *mover,
            ResolutionSignal::Attacked { attacker } => *attacker,
            ResolutionSignal::Hit { defender, .. } => *defender,
        }
    }
}

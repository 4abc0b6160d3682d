//! Presentation events
//!
//! The session pushes events while it works; the host drains the log after
//! each call and renders what it cares about. The core never queries
//! presentation back.

use serde::{Deserialize, Serialize};

use crate::core::types::{CombatantId, GridPos, Side};

use crate::board::commands::RejectReason;
use crate::board::input_gate::InputState;
use crate::board::party::HealthStatus;
use crate::board::pathfinding::Route;

/// What a hovered cell means for the current actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HoverReport {
    /// Vacant reachable cell: walking there costs `ap_cost`
    WalkPreview {
        route: Route,
        ap_cost: u32,
        affordable: bool,
    },
    /// Vacant cell with no route to it
    Unreachable,
    /// Adjacent living enemy: attacking costs `ap_cost`
    AttackPreview {
        defender: CombatantId,
        ap_cost: u32,
        affordable: bool,
    },
    /// Living enemy out of reach: name it and show coarse health only
    EnemyInfo {
        combatant: CombatantId,
        health: HealthStatus,
    },
    /// Member of the actor's own party: exact HP
    AllyInfo { combatant: CombatantId, hp: u32 },
    /// Nothing to report (unwalkable terrain)
    Terrain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    CellHovered {
        at: GridPos,
        report: HoverReport,
    },
    CellExited {
        at: GridPos,
    },
    ClickAccepted {
        at: GridPos,
    },
    ClickRejected {
        at: GridPos,
        reason: RejectReason,
    },
    /// A hover produced a walkable route; `affordable_steps` is how much of
    /// it the actor's current AP covers, for split highlighting
    RouteComputed {
        route: Route,
        affordable_steps: usize,
    },
    StateChanged {
        state: InputState,
    },
    TurnStarted {
        combatant: CombatantId,
    },
    MoveCompleted {
        combatant: CombatantId,
        from: GridPos,
        to: GridPos,
    },
    CombatantDied {
        combatant: CombatantId,
        at: GridPos,
    },
    BattleEnded {
        winner: Side,
    },
}

/// Append-only log the host drains between calls
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<BoardEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BoardEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

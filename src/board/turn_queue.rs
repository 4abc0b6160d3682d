//! Cyclic turn ordering with dead-skip advancement
//!
//! The queue holds every combatant for the whole battle, dead or alive; its
//! size never changes. The front element is the current actor.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::CombatantId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnQueue {
    queue: VecDeque<CombatantId>,
}

impl TurnQueue {
    /// Fix the turn order for the battle. Deterministic: callers enumerate
    /// one party fully, then the other.
    pub fn new(order: impl IntoIterator<Item = CombatantId>) -> Self {
        Self {
            queue: order.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The combatant whose turn it is
    pub fn current(&self) -> Result<CombatantId> {
        self.queue.front().copied().ok_or(EngineError::EmptyTurnQueue)
    }

    /// Turn order starting from the current actor
    pub fn iter(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.queue.iter().copied()
    }

    /// Rotate to the next living combatant and return it.
    ///
    /// The caller has already ruled out end-of-battle, so at least one
    /// living combatant must remain; a full rotation without finding one is
    /// a bookkeeping fault, not a loop.
    pub fn advance(&mut self, mut is_alive: impl FnMut(CombatantId) -> bool) -> Result<CombatantId> {
        if self.queue.is_empty() {
            return Err(EngineError::EmptyTurnQueue);
        }

        for _ in 0..self.queue.len() {
            if let Some(front) = self.queue.pop_front() {
                self.queue.push_back(front);
            }
            if let Some(&front) = self.queue.front() {
                if is_alive(front) {
                    return Ok(front);
                }
            }
        }

        Err(EngineError::NoLivingCombatant)
    }
}

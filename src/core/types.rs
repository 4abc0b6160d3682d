//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for combatants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub Uuid);

impl CombatantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CombatantId {
    fn default() -> Self {
        Self::new()
    }
}

/// Which side of the battle a party fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Column/row coordinate on the battle board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl GridPos {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Manhattan distance in steps
    pub fn manhattan(&self, other: &Self) -> u32 {
        ((self.col - other.col).abs() + (self.row - other.row).abs()) as u32
    }

    /// The 4 orthogonal neighbors, in fixed left/right/up/down order
    pub fn neighbors(&self) -> [GridPos; 4] {
        [
            GridPos::new(self.col - 1, self.row),
            GridPos::new(self.col + 1, self.row),
            GridPos::new(self.col, self.row + 1),
            GridPos::new(self.col, self.row - 1),
        ]
    }

    /// Exactly one orthogonal step apart
    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.manhattan(other) == 1
    }
}

/// Direction a combatant faces on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    #[default]
    North,
    East,
    South,
    West,
}

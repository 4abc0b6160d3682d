//! The battle board: per-cell walkability and occupancy
//!
//! Cells never carry search state; pathfinding keeps its own scratch.

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::{CombatantId, GridPos};

/// A single cell on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub pos: GridPos,
    pub walkable: bool,
    pub occupant: Option<CombatantId>,
}

impl Cell {
    pub fn new(pos: GridPos) -> Self {
        Self {
            pos,
            walkable: true,
            occupant: None,
        }
    }

    /// Walkable and nobody standing on it
    pub fn is_vacant(&self) -> bool {
        self.walkable && self.occupant.is_none()
    }
}

/// Fixed width × height board, created once per battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a fully walkable, empty board
    pub fn new(width: u32, height: u32) -> Self {
        let mut cells = Vec::with_capacity((width * height) as usize);
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                cells.push(Cell::new(GridPos::new(col, row)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.col >= 0
            && pos.row >= 0
            && pos.col < self.width as i32
            && pos.row < self.height as i32
    }

    fn index(&self, pos: GridPos) -> usize {
        pos.row as usize * self.width as usize + pos.col as usize
    }

    pub fn cell(&self, pos: GridPos) -> Option<&Cell> {
        if self.in_bounds(pos) {
            Some(&self.cells[self.index(pos)])
        } else {
            None
        }
    }

    pub fn cell_mut(&mut self, pos: GridPos) -> Option<&mut Cell> {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Override walkability at setup time. Walkability is fixed once the
    /// battle starts; the session never calls this mid-battle.
    pub fn set_walkable(&mut self, pos: GridPos, walkable: bool) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.walkable = walkable;
        }
    }

    pub fn occupant(&self, pos: GridPos) -> Option<CombatantId> {
        self.cell(pos).and_then(|c| c.occupant)
    }

    /// In bounds, walkable, and unoccupied
    pub fn is_vacant(&self, pos: GridPos) -> bool {
        self.cell(pos).map(Cell::is_vacant).unwrap_or(false)
    }

    /// Put a combatant on a cell. Fails if the cell is out of bounds,
    /// unwalkable, or already occupied.
    pub fn place(&mut self, id: CombatantId, pos: GridPos) -> Result<()> {
        let cell = self.cell_mut(pos).ok_or(EngineError::OutOfBounds(pos))?;
        if !cell.walkable {
            return Err(EngineError::SpawnNotWalkable(pos));
        }
        if cell.occupant.is_some() {
            return Err(EngineError::CellOccupied(pos));
        }
        cell.occupant = Some(id);
        Ok(())
    }

    /// Vacate a cell, returning whoever stood there
    pub fn clear(&mut self, pos: GridPos) -> Option<CombatantId> {
        self.cell_mut(pos).and_then(|c| c.occupant.take())
    }
}

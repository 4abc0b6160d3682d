//! Board definitions: JSON documents consumed once at battle setup
//!
//! A definition carries the grid dimensions, walkability overrides, and the
//! party spawn lists. Anything a spawn record omits falls back to the
//! engine defaults, and cells without an override are walkable.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::constants::{DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};
use crate::core::types::Facing;

/// Errors that can occur when loading a board definition
#[derive(Debug, Error)]
pub enum LoadError {
    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Root structure for board definition files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardFile {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Walkability overrides; unlisted cells are walkable
    #[serde(default)]
    pub cells: Vec<CellOverride>,
    /// Spawn lists, player side and enemy side
    pub parties: Vec<PartySpawn>,
}

fn default_width() -> u32 {
    DEFAULT_BOARD_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_BOARD_HEIGHT
}

/// Walkability override for a single cell
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct CellOverride {
    pub x: i32,
    pub y: i32,
    pub walkable: bool,
}

/// One party's spawn list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PartySpawn {
    /// Enemy side when true, player side otherwise
    #[serde(default)]
    pub enemy: bool,
    pub combatants: Vec<CombatantSpawn>,
}

/// A single combatant spawn; omitted stats use the engine defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CombatantSpawn {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub max_hp: Option<u32>,
    #[serde(default)]
    pub max_ap: Option<u32>,
    #[serde(default)]
    pub walk_cost: Option<u32>,
    #[serde(default)]
    pub attack_cost: Option<u32>,
    #[serde(default)]
    pub facing: Option<Facing>,
}

impl BoardFile {
    /// Parse a definition from a JSON string
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a definition from a JSON file on disk
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

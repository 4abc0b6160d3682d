//! Engine-default combatant statistics
//!
//! Board definitions may override any of these per combatant; a spawn record
//! that omits a stat gets the value here.

/// Default statistics for a spawned combatant
///
/// These values pace a typical skirmish: a fresh combatant can cross half a
/// small board or swing twice in one turn, and survives three clean hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatantDefaults {
    /// Hit points at spawn; the combatant dies when this reaches 0.
    pub max_hp: u32,

    /// Action points refilled at each turn start.
    ///
    /// Every command spends from the same pool, so this bounds the total
    /// movement plus attacks a combatant fits into one turn.
    pub max_ap: u32,

    /// AP spent per route step when walking.
    pub walk_cost: u32,

    /// AP spent per attack.
    ///
    /// At the default 3 against a 6-point pool, a combatant that stands
    /// still can attack twice per turn.
    pub attack_cost: u32,
}

impl Default for CombatantDefaults {
    fn default() -> Self {
        Self {
            max_hp: 12,
            max_ap: 6,
            walk_cost: 1,
            attack_cost: 3,
        }
    }
}

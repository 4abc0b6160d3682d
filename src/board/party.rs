//! Combatants, parties, and the roster that owns them

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::CombatantDefaults;
use crate::core::error::{EngineError, Result};
use crate::core::types::{CombatantId, Facing, GridPos, Side};

/// Coarse health readout, for inspecting enemies without exposing exact HP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Unscathed,
    Wounded,
    Critical,
}

/// A single fighter on the board
///
/// `pos` is denormalized from grid occupancy; the session keeps the two in
/// lockstep and faults when they disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub pos: GridPos,
    pub facing: Facing,
    pub hp: u32,
    pub max_hp: u32,
    pub ap: u32,
    pub max_ap: u32,
    pub walk_cost: u32,
    pub attack_cost: u32,
    pub is_current: bool,
}

impl Combatant {
    pub fn new(name: String, side: Side, pos: GridPos, stats: &CombatantDefaults) -> Self {
        Self {
            id: CombatantId::new(),
            name,
            side,
            pos,
            facing: Facing::default(),
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            ap: stats.max_ap,
            max_ap: stats.max_ap,
            walk_cost: stats.walk_cost,
            attack_cost: stats.attack_cost,
            is_current: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn refill_ap(&mut self) {
        self.ap = self.max_ap;
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        cost <= self.ap
    }

    /// AP required to walk a route of `steps` steps
    pub fn walk_cost_for(&self, steps: usize) -> u32 {
        self.walk_cost * steps as u32
    }

    pub fn spend_ap(&mut self, cost: u32) {
        debug_assert!(cost <= self.ap, "spending AP that was never validated");
        self.ap = self.ap.saturating_sub(cost);
    }

    pub fn take_damage(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
    }

    pub fn health_status(&self) -> HealthStatus {
        if self.hp * 3 > self.max_hp * 2 {
            HealthStatus::Unscathed
        } else if self.hp * 3 > self.max_hp {
            HealthStatus::Wounded
        } else {
            HealthStatus::Critical
        }
    }
}

/// One side's combatants, in spawn order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub side: Side,
    pub members: Vec<CombatantId>,
}

impl Party {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            members: Vec::new(),
        }
    }

    pub fn add(&mut self, id: CombatantId) {
        self.members.push(id);
    }

    pub fn living(&self, roster: &Roster) -> usize {
        self.members
            .iter()
            .filter(|id| roster.is_alive(**id))
            .count()
    }

    /// No living member left
    pub fn is_wiped(&self, roster: &Roster) -> bool {
        self.living(roster) == 0
    }
}

/// Id-keyed storage for every combatant in the battle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    combatants: AHashMap<CombatantId, Combatant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, combatant: Combatant) {
        self.combatants.insert(combatant.id, combatant);
    }

    pub fn get(&self, id: CombatantId) -> Result<&Combatant> {
        self.combatants
            .get(&id)
            .ok_or(EngineError::UnknownCombatant(id))
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Result<&mut Combatant> {
        self.combatants
            .get_mut(&id)
            .ok_or(EngineError::UnknownCombatant(id))
    }

    /// False for unknown ids as well as for the dead
    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.combatants
            .get(&id)
            .map(Combatant::is_alive)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combatant(side: Side) -> Combatant {
        Combatant::new(
            "test".into(),
            side,
            GridPos::new(0, 0),
            &CombatantDefaults::default(),
        )
    }

    #[test]
    fn test_spawns_alive_at_full_stats() {
        let c = combatant(Side::Player);
        assert!(c.is_alive());
        assert_eq!(c.hp, c.max_hp);
        assert_eq!(c.ap, c.max_ap);
    }

    #[test]
    fn test_damage_and_death() {
        let mut c = combatant(Side::Player);
        c.take_damage(c.max_hp - 1);
        assert!(c.is_alive());
        c.take_damage(5);
        assert!(!c.is_alive());
        assert_eq!(c.hp, 0);
    }

    #[test]
    fn test_ap_spend_and_refill() {
        let mut c = combatant(Side::Player);
        c.spend_ap(4);
        assert_eq!(c.ap, c.max_ap - 4);
        c.refill_ap();
        assert_eq!(c.ap, c.max_ap);
    }

    #[test]
    fn test_walk_cost_scales_with_steps() {
        let c = combatant(Side::Player);
        assert_eq!(c.walk_cost_for(3), c.walk_cost * 3);
        assert_eq!(c.walk_cost_for(0), 0);
    }

    #[test]
    fn test_health_status_thresholds() {
        let mut c = combatant(Side::Enemy);
        assert_eq!(c.health_status(), HealthStatus::Unscathed);

        c.hp = c.max_hp / 2;
        assert_eq!(c.health_status(), HealthStatus::Wounded);

        c.hp = c.max_hp / 4;
        assert_eq!(c.health_status(), HealthStatus::Critical);
    }

    #[test]
    fn test_party_wiped() {
        let mut roster = Roster::new();
        let mut party = Party::new(Side::Enemy);

        let mut a = combatant(Side::Enemy);
        let b = combatant(Side::Enemy);
        party.add(a.id);
        party.add(b.id);

        assert_eq!(party.living(&roster), 0); // nobody registered yet

        a.hp = 0;
        roster.insert(a);
        roster.insert(b.clone());
        assert_eq!(party.living(&roster), 1);
        assert!(!party.is_wiped(&roster));

        roster.get_mut(b.id).unwrap().hp = 0;
        assert!(party.is_wiped(&roster));
    }

    #[test]
    fn test_roster_unknown_id_faults() {
        let roster = Roster::new();
        assert!(matches!(
            roster.get(CombatantId::new()),
            Err(EngineError::UnknownCombatant(_))
        ));
    }
}

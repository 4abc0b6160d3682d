//! The battle session: command admission, validation, and resolution
//!
//! Owns the grid, both parties, the turn queue, the input gate, and the
//! completion tracker. Every world mutation funnels through here, on one
//! logical thread; "asynchronous" collaborator signals arrive as plain
//! calls whose order and timing the session merely tolerates.

use serde::{Deserialize, Serialize};

use crate::core::config::CombatantDefaults;
use crate::core::error::{EngineError, Result};
use crate::core::types::{CombatantId, GridPos, Side};

use crate::board::commands::{
    AttackOrder, CommandReply, MoveOrder, RejectReason, ResolutionSignal,
};
use crate::board::completion::{ActionTracker, Completion};
use crate::board::events::{BoardEvent, EventLog, HoverReport};
use crate::board::grid::Grid;
use crate::board::input_gate::{BoardCommand, InputGate, InputState};
use crate::board::party::{Combatant, Party, Roster};
use crate::board::pathfinding::{find_route, Route, SearchGrid};
use crate::board::turn_queue::TurnQueue;
use crate::data::BoardFile;

/// Battle lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Active,
    Finished,
}

/// One battle from setup to a decided outcome
#[derive(Debug)]
pub struct BattleSession {
    grid: Grid,
    roster: Roster,
    player_party: Party,
    enemy_party: Party,
    turn_queue: TurnQueue,
    gate: InputGate,
    tracker: ActionTracker,
    phase: BattlePhase,
    winner: Option<Side>,
    /// Route retained between click confirmation and the mover's signal
    active_move: Option<MoveOrder>,
    /// Route retained between hover and exit, for highlighting
    hover_route: Option<Route>,
    log: EventLog,
}

impl BattleSession {
    /// Build a session from a board definition.
    ///
    /// Spawns out of bounds, on unwalkable cells, or colliding with another
    /// spawn are setup faults. Both sides must field at least one
    /// combatant. The turn order enumerates the player party fully, then
    /// the enemy party, each in spawn order.
    pub fn from_board(board: &BoardFile) -> Result<Self> {
        let defaults = CombatantDefaults::default();

        let mut grid = Grid::new(board.width, board.height);
        for cell in &board.cells {
            grid.set_walkable(GridPos::new(cell.x, cell.y), cell.walkable);
        }

        let mut roster = Roster::new();
        let mut player_party = Party::new(Side::Player);
        let mut enemy_party = Party::new(Side::Enemy);

        for party in &board.parties {
            let side = if party.enemy { Side::Enemy } else { Side::Player };
            for spawn in &party.combatants {
                let pos = GridPos::new(spawn.x, spawn.y);
                let stats = CombatantDefaults {
                    max_hp: spawn.max_hp.unwrap_or(defaults.max_hp),
                    max_ap: spawn.max_ap.unwrap_or(defaults.max_ap),
                    walk_cost: spawn.walk_cost.unwrap_or(defaults.walk_cost),
                    attack_cost: spawn.attack_cost.unwrap_or(defaults.attack_cost),
                };
                let name = match &spawn.name {
                    Some(name) => name.clone(),
                    None => match side {
                        Side::Player => format!("fighter-{}", player_party.members.len() + 1),
                        Side::Enemy => format!("raider-{}", enemy_party.members.len() + 1),
                    },
                };

                let mut combatant = Combatant::new(name, side, pos, &stats);
                if let Some(facing) = spawn.facing {
                    combatant.facing = facing;
                }

                grid.place(combatant.id, pos)?;
                match side {
                    Side::Player => player_party.add(combatant.id),
                    Side::Enemy => enemy_party.add(combatant.id),
                }
                roster.insert(combatant);
            }
        }

        if player_party.members.is_empty() {
            return Err(EngineError::EmptyParty(Side::Player));
        }
        if enemy_party.members.is_empty() {
            return Err(EngineError::EmptyParty(Side::Enemy));
        }

        let turn_queue = TurnQueue::new(
            player_party
                .members
                .iter()
                .chain(enemy_party.members.iter())
                .copied(),
        );

        let mut session = Self {
            grid,
            roster,
            player_party,
            enemy_party,
            turn_queue,
            gate: InputGate::new(),
            tracker: ActionTracker::new(),
            phase: BattlePhase::Active,
            winner: None,
            active_move: None,
            hover_route: None,
            log: EventLog::new(),
        };

        let first = session.turn_queue.current()?;
        session.start_turn(first)?;
        Ok(session)
    }

    // --- inspection -----------------------------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, BattlePhase::Finished)
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn input_state(&self) -> InputState {
        self.gate.current()
    }

    pub fn combatant(&self, id: CombatantId) -> Result<&Combatant> {
        self.roster.get(id)
    }

    pub fn current_combatant(&self) -> Result<&Combatant> {
        self.roster.get(self.turn_queue.current()?)
    }

    pub fn player_party(&self) -> &Party {
        &self.player_party
    }

    pub fn enemy_party(&self) -> &Party {
        &self.enemy_party
    }

    /// Turn order starting from the current actor, dead members included
    pub fn turn_order(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.turn_queue.iter()
    }

    /// Route computed by the latest hover, kept until the cursor exits or a
    /// click confirms an action; presentation highlights it
    pub fn hover_route(&self) -> Option<&Route> {
        self.hover_route.as_ref()
    }

    /// Hand the accumulated presentation events to the host
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        self.log.drain()
    }

    // --- command surface ------------------------------------------------

    /// Cursor entered a cell
    pub fn request_hover(&mut self, at: GridPos) -> Result<CommandReply> {
        if let Some(reason) = self.admission(BoardCommand::Hover) {
            tracing::debug!(?at, ?reason, "hover rejected");
            return Ok(CommandReply::Rejected(reason));
        }
        if !self.grid.in_bounds(at) {
            tracing::debug!(?at, "hover outside the board");
            return Ok(CommandReply::Rejected(RejectReason::OutOfBounds));
        }

        let actor = self.current_combatant()?.clone();
        let cell = self.grid.cell(at).ok_or(EngineError::OutOfBounds(at))?;
        let (walkable, occupant) = (cell.walkable, cell.occupant);

        let report = match occupant {
            None if walkable => match self.route_to(actor.pos, at) {
                Some(route) => {
                    let steps = route.len().saturating_sub(1);
                    let ap_cost = actor.walk_cost_for(steps);
                    let affordable_steps = if actor.walk_cost == 0 {
                        steps
                    } else {
                        ((actor.ap / actor.walk_cost) as usize).min(steps)
                    };
                    self.hover_route = Some(route.clone());
                    self.log.push(BoardEvent::RouteComputed {
                        route: route.clone(),
                        affordable_steps,
                    });
                    HoverReport::WalkPreview {
                        route,
                        ap_cost,
                        affordable: actor.can_afford(ap_cost),
                    }
                }
                None => HoverReport::Unreachable,
            },
            None => HoverReport::Terrain,
            Some(occupant_id) => {
                let occupant = self.roster.get(occupant_id)?;
                if occupant.side == actor.side {
                    HoverReport::AllyInfo {
                        combatant: occupant_id,
                        hp: occupant.hp,
                    }
                } else if at.is_adjacent(&actor.pos) {
                    HoverReport::AttackPreview {
                        defender: occupant_id,
                        ap_cost: actor.attack_cost,
                        affordable: actor.can_afford(actor.attack_cost),
                    }
                } else {
                    HoverReport::EnemyInfo {
                        combatant: occupant_id,
                        health: occupant.health_status(),
                    }
                }
            }
        };

        self.log.push(BoardEvent::CellHovered { at, report });
        Ok(CommandReply::Accepted)
    }

    /// Cursor left a cell; drops the highlight route
    pub fn request_exit(&mut self, at: GridPos) -> Result<CommandReply> {
        if let Some(reason) = self.admission(BoardCommand::Exit) {
            tracing::debug!(?at, ?reason, "exit rejected");
            return Ok(CommandReply::Rejected(reason));
        }
        if !self.grid.in_bounds(at) {
            return Ok(CommandReply::Rejected(RejectReason::OutOfBounds));
        }

        self.hover_route = None;
        self.log.push(BoardEvent::CellExited { at });
        Ok(CommandReply::Accepted)
    }

    /// Cell clicked: attempt a move onto a vacant cell or an attack on an
    /// adjacent enemy. Clicks are validated from scratch; no prior hover is
    /// required.
    pub fn request_click(&mut self, at: GridPos) -> Result<CommandReply> {
        if let Some(reason) = self.admission(BoardCommand::Click) {
            return Ok(self.reject_click(at, reason));
        }
        if !self.grid.in_bounds(at) {
            return Ok(self.reject_click(at, RejectReason::OutOfBounds));
        }

        let actor = self.current_combatant()?.clone();
        let cell = self.grid.cell(at).ok_or(EngineError::OutOfBounds(at))?;
        let (walkable, occupant) = (cell.walkable, cell.occupant);

        match occupant {
            None if walkable => self.confirm_move(&actor, at),
            // unwalkable terrain: no route can end there
            None => Ok(self.reject_click(at, RejectReason::NoRouteToCell)),
            Some(occupant_id) => {
                let occupant_side = self.roster.get(occupant_id)?.side;
                if occupant_side == actor.side {
                    // own cell or an ally's: nothing to do here
                    Ok(self.reject_click(at, RejectReason::CellNotVacant))
                } else {
                    self.confirm_attack(&actor, occupant_id, at)
                }
            }
        }
    }

    /// The player gave up the rest of the current turn
    pub fn request_end_turn(&mut self) -> Result<CommandReply> {
        if let Some(reason) = self.admission(BoardCommand::EndTurn) {
            tracing::debug!(?reason, "end turn rejected");
            return Ok(CommandReply::Rejected(reason));
        }

        // scheduler precondition: rule out end-of-battle before rotating
        if self.check_battle_end()? {
            return Ok(CommandReply::Accepted);
        }
        self.advance_turn()?;
        Ok(CommandReply::Accepted)
    }

    /// A collaborator reports one participant of the in-flight action done.
    ///
    /// Signals naming a participant the tracker does not expect are dropped
    /// without touching the world: that covers duplicates, reordered
    /// deliveries, and leftovers from an already resolved action.
    pub fn resolution_signal(&mut self, signal: ResolutionSignal) -> Result<()> {
        let participant = signal.participant();
        if !self.tracker.expects(participant) {
            tracing::debug!(?signal, "stray completion signal ignored");
            return Ok(());
        }

        match signal {
            ResolutionSignal::Moved { mover } => self.finish_move(mover)?,
            ResolutionSignal::Attacked { .. } => {}
            ResolutionSignal::Hit { defender, damage } => self.apply_hit(defender, damage)?,
        }

        if self.tracker.complete(participant) == Completion::Resolved {
            self.action_resolved()?;
        }
        Ok(())
    }

    // --- validation and confirmation ------------------------------------

    fn admission(&self, command: BoardCommand) -> Option<RejectReason> {
        if self.is_finished() {
            return Some(RejectReason::BattleOver);
        }
        if !self.gate.admits(command) {
            return Some(RejectReason::InputDisabled);
        }
        None
    }

    fn reject_click(&mut self, at: GridPos, reason: RejectReason) -> CommandReply {
        tracing::debug!(?at, ?reason, "click rejected");
        self.log.push(BoardEvent::ClickRejected { at, reason });
        CommandReply::Rejected(reason)
    }

    /// Passability snapshot for movement: walkable and vacant. The actor's
    /// own cell is the search origin and needs no exemption.
    fn route_to(&self, from: GridPos, to: GridPos) -> Option<Route> {
        let search = SearchGrid::from_fn(self.grid.width(), self.grid.height(), |pos| {
            self.grid.is_vacant(pos)
        });
        find_route(&search, from, to)
    }

    fn confirm_move(&mut self, actor: &Combatant, at: GridPos) -> Result<CommandReply> {
        let Some(route) = self.route_to(actor.pos, at) else {
            return Ok(self.reject_click(at, RejectReason::NoRouteToCell));
        };

        let steps = route.len().saturating_sub(1);
        let ap_cost = actor.walk_cost_for(steps);
        if !actor.can_afford(ap_cost) {
            return Ok(self.reject_click(at, RejectReason::NotEnoughAp));
        }

        self.roster.get_mut(actor.id)?.spend_ap(ap_cost);
        self.hover_route = None;
        self.set_input(InputState::Disabled);
        self.tracker.begin([actor.id]);

        let order = MoveOrder {
            mover: actor.id,
            route,
            ap_cost,
        };
        self.active_move = Some(order.clone());

        self.log.push(BoardEvent::ClickAccepted { at });
        tracing::debug!(mover = ?actor.id, ?at, ap_cost, "move confirmed");
        Ok(CommandReply::MoveStarted(order))
    }

    fn confirm_attack(
        &mut self,
        actor: &Combatant,
        defender: CombatantId,
        at: GridPos,
    ) -> Result<CommandReply> {
        if !at.is_adjacent(&actor.pos) {
            return Ok(self.reject_click(at, RejectReason::TargetTooFar));
        }
        if !actor.can_afford(actor.attack_cost) {
            return Ok(self.reject_click(at, RejectReason::NotEnoughAp));
        }

        let ap_cost = actor.attack_cost;
        self.roster.get_mut(actor.id)?.spend_ap(ap_cost);
        self.hover_route = None;
        self.set_input(InputState::Disabled);
        self.tracker.begin([actor.id, defender]);

        self.log.push(BoardEvent::ClickAccepted { at });
        tracing::debug!(attacker = ?actor.id, ?defender, ap_cost, "attack confirmed");
        Ok(CommandReply::AttackStarted(AttackOrder {
            attacker: actor.id,
            defender,
            ap_cost,
        }))
    }

    // --- resolution -----------------------------------------------------

    fn finish_move(&mut self, mover: CombatantId) -> Result<()> {
        let order = self
            .active_move
            .take()
            .ok_or(EngineError::NoActiveMove(mover))?;
        debug_assert_eq!(order.mover, mover);

        let (Some(&from), Some(&to)) = (order.route.first(), order.route.last()) else {
            return Err(EngineError::NoActiveMove(mover));
        };

        // the start cell must still hold the mover, or our books are cooked
        match self.grid.occupant(from) {
            Some(id) if id == mover => {}
            found => {
                return Err(EngineError::StaleOccupancy {
                    id: mover,
                    at: from,
                    found,
                })
            }
        }

        self.grid.clear(from);
        self.grid.place(mover, to)?;
        self.roster.get_mut(mover)?.pos = to;

        self.log.push(BoardEvent::MoveCompleted {
            combatant: mover,
            from,
            to,
        });
        Ok(())
    }

    fn apply_hit(&mut self, defender: CombatantId, damage: u32) -> Result<()> {
        let (pos, dead) = {
            let combatant = self.roster.get_mut(defender)?;
            combatant.take_damage(damage);
            (combatant.pos, !combatant.is_alive())
        };

        if dead {
            // vacate immediately; the paired attacker signal is not waited on
            match self.grid.occupant(pos) {
                Some(id) if id == defender => {
                    self.grid.clear(pos);
                }
                found => {
                    return Err(EngineError::StaleOccupancy {
                        id: defender,
                        at: pos,
                        found,
                    })
                }
            }
            self.log.push(BoardEvent::CombatantDied {
                combatant: defender,
                at: pos,
            });
            tracing::info!(?defender, ?pos, "combatant died");
        }
        Ok(())
    }

    /// Fired exactly once per action, when the pending set empties.
    /// End-of-battle always wins over the automatic end-of-turn.
    fn action_resolved(&mut self) -> Result<()> {
        self.set_input(InputState::Enabled);

        if self.check_battle_end()? {
            return Ok(());
        }

        let current = self.turn_queue.current()?;
        if self.roster.get(current)?.ap == 0 {
            self.advance_turn()?;
        }
        Ok(())
    }

    fn check_battle_end(&mut self) -> Result<bool> {
        let player_wiped = self.player_party.is_wiped(&self.roster);
        let enemy_wiped = self.enemy_party.is_wiped(&self.roster);
        if !player_wiped && !enemy_wiped {
            return Ok(false);
        }

        let winner = if enemy_wiped { Side::Player } else { Side::Enemy };
        self.phase = BattlePhase::Finished;
        self.winner = Some(winner);
        self.log.push(BoardEvent::BattleEnded { winner });
        tracing::info!(?winner, "battle ended");
        Ok(true)
    }

    fn advance_turn(&mut self) -> Result<()> {
        let leaving = self.turn_queue.current()?;
        self.roster.get_mut(leaving)?.is_current = false;

        let roster = &self.roster;
        let next = self.turn_queue.advance(|id| roster.is_alive(id))?;
        self.start_turn(next)
    }

    fn start_turn(&mut self, id: CombatantId) -> Result<()> {
        let combatant = self.roster.get_mut(id)?;
        combatant.is_current = true;
        combatant.refill_ap();
        self.log.push(BoardEvent::TurnStarted { combatant: id });
        tracing::debug!(?id, "turn started");
        Ok(())
    }

    fn set_input(&mut self, state: InputState) {
        if self.gate.set(state) {
            self.log.push(BoardEvent::StateChanged { state });
        }
    }
}

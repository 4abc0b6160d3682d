//! Battleboard - Entry Point
//!
//! Loads a board definition and plays out a scripted skirmish: each action,
//! the current combatant attacks an adjacent opponent when it can, otherwise
//! walks toward the nearest one. In-process stand-ins play the mover and
//! attack-resolution collaborators, acknowledging orders immediately.

use std::path::Path;

use battleboard::board::{
    find_route, AttackOrder, BattleSession, BoardEvent, CommandReply, Combatant, MoveOrder,
    ResolutionSignal, Route, SearchGrid,
};
use battleboard::core::types::{CombatantId, GridPos, Side};
use battleboard::data::BoardFile;

/// Damage the stand-in resolver deals per hit
const DEMO_DAMAGE: u32 = 4;

/// Safety cap so a stalemated script cannot spin forever
const MAX_ACTIONS: u32 = 200;

const FALLBACK_BOARD: &str = r#"{
    "width": 5,
    "height": 5,
    "parties": [
        {"combatants": [{"x": 0, "y": 2, "name": "Aldric"}]},
        {"enemy": true, "combatants": [{"x": 4, "y": 2, "name": "Grukk"}]}
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("battleboard=info")
        .init();

    let path = Path::new("boards/skirmish.json");
    let board = match BoardFile::from_path(path) {
        Ok(board) => board,
        Err(err) => {
            tracing::warn!(%err, "could not load boards/skirmish.json, using built-in board");
            BoardFile::from_json(FALLBACK_BOARD)?
        }
    };

    let mut session = BattleSession::from_board(&board)?;

    let order: Vec<String> = session
        .turn_order()
        .map(|id| display_name(&session, id))
        .collect();
    tracing::info!(?order, "turn order fixed");
    report_events(&mut session);

    let mut actions = 0;
    while !session.is_finished() && actions < MAX_ACTIONS {
        actions += 1;
        play_one_action(&mut session)?;
        report_events(&mut session);
    }

    match session.winner() {
        Some(winner) => tracing::info!(?winner, actions, "skirmish decided"),
        None => tracing::info!(actions, "action cap reached before a decision"),
    }
    Ok(())
}

fn play_one_action(session: &mut BattleSession) -> Result<(), Box<dyn std::error::Error>> {
    let actor = session.current_combatant()?.clone();

    let Some(target) = nearest_opponent(session, &actor)? else {
        session.request_end_turn()?;
        return Ok(());
    };

    let reply = if actor.pos.is_adjacent(&target) {
        session.request_click(target)?
    } else {
        match approach_step(session, &actor, target) {
            Some(destination) => session.request_click(destination)?,
            None => {
                session.request_end_turn()?;
                return Ok(());
            }
        }
    };

    match reply {
        CommandReply::MoveStarted(order) => run_mover(session, &order),
        CommandReply::AttackStarted(order) => run_resolver(session, &order),
        CommandReply::Accepted | CommandReply::Rejected(_) => {
            session.request_end_turn()?;
            Ok(())
        }
    }
}

/// Position of the closest living opponent
fn nearest_opponent(
    session: &BattleSession,
    actor: &Combatant,
) -> Result<Option<GridPos>, Box<dyn std::error::Error>> {
    let party = match actor.side {
        Side::Player => session.enemy_party(),
        Side::Enemy => session.player_party(),
    };

    let mut best: Option<(u32, GridPos)> = None;
    for &id in &party.members {
        let combatant = session.combatant(id)?;
        if !combatant.is_alive() {
            continue;
        }
        let distance = actor.pos.manhattan(&combatant.pos);
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, combatant.pos));
        }
    }
    Ok(best.map(|(_, pos)| pos))
}

/// Furthest affordable cell along a route toward a cell adjacent to `target`
fn approach_step(session: &BattleSession, actor: &Combatant, target: GridPos) -> Option<GridPos> {
    let route = route_toward(session, actor, target)?;
    let affordable = if actor.walk_cost == 0 {
        usize::MAX
    } else {
        (actor.ap / actor.walk_cost) as usize
    };
    let steps = route.len().saturating_sub(1).min(affordable);
    if steps == 0 {
        return None;
    }
    Some(route[steps])
}

/// Route to whichever vacant neighbor of `target` is cheapest to reach
fn route_toward(session: &BattleSession, actor: &Combatant, target: GridPos) -> Option<Route> {
    let grid = session.grid();
    let search = SearchGrid::from_fn(grid.width(), grid.height(), |pos| grid.is_vacant(pos));

    target
        .neighbors()
        .into_iter()
        .filter(|goal| grid.is_vacant(*goal))
        .filter_map(|goal| find_route(&search, actor.pos, goal))
        .min_by_key(Route::len)
}

/// Stand-in mover: a real host animates the walk first
fn run_mover(
    session: &mut BattleSession,
    order: &MoveOrder,
) -> Result<(), Box<dyn std::error::Error>> {
    session.resolution_signal(ResolutionSignal::Moved { mover: order.mover })?;
    Ok(())
}

/// Stand-in attack resolver: fixed damage, both signals at once
fn run_resolver(
    session: &mut BattleSession,
    order: &AttackOrder,
) -> Result<(), Box<dyn std::error::Error>> {
    session.resolution_signal(ResolutionSignal::Attacked {
        attacker: order.attacker,
    })?;
    session.resolution_signal(ResolutionSignal::Hit {
        defender: order.defender,
        damage: DEMO_DAMAGE,
    })?;
    Ok(())
}

fn report_events(session: &mut BattleSession) {
    for event in session.drain_events() {
        match &event {
            BoardEvent::TurnStarted { combatant } => {
                let name = display_name(session, *combatant);
                tracing::info!(%name, "turn started");
            }
            BoardEvent::MoveCompleted { combatant, from, to } => {
                let name = display_name(session, *combatant);
                tracing::info!(%name, ?from, ?to, "moved");
            }
            BoardEvent::CombatantDied { combatant, at } => {
                let name = display_name(session, *combatant);
                tracing::info!(%name, ?at, "falls");
            }
            BoardEvent::BattleEnded { winner } => {
                tracing::info!(?winner, "battle ended");
            }
            other => tracing::debug!(event = ?other, "board event"),
        }
    }
}

fn display_name(session: &BattleSession, id: CombatantId) -> String {
    session
        .combatant(id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|_| "unknown".into())
}

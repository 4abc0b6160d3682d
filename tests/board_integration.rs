//! Battle session integration tests
//!
//! Drive the full command -> order -> signal -> resolution loop the way a
//! host would, and check the world state after each step.

use battleboard::board::{
    BattleSession, BoardEvent, CommandReply, HealthStatus, HoverReport, InputState, RejectReason,
    ResolutionSignal,
};
use battleboard::core::error::EngineError;
use battleboard::core::types::{CombatantId, GridPos, Side};
use battleboard::data::{BoardFile, CellOverride, CombatantSpawn, PartySpawn};

fn spawn(x: i32, y: i32) -> CombatantSpawn {
    CombatantSpawn {
        x,
        y,
        name: None,
        max_hp: None,
        max_ap: None,
        walk_cost: None,
        attack_cost: None,
        facing: None,
    }
}

fn board(
    width: u32,
    height: u32,
    cells: Vec<CellOverride>,
    players: Vec<CombatantSpawn>,
    enemies: Vec<CombatantSpawn>,
) -> BoardFile {
    BoardFile {
        width,
        height,
        cells,
        parties: vec![
            PartySpawn {
                enemy: false,
                combatants: players,
            },
            PartySpawn {
                enemy: true,
                combatants: enemies,
            },
        ],
    }
}

/// 5x5 open board, one player at (0,0), one enemy at (4,4)
fn duel() -> BattleSession {
    let board = board(5, 5, Vec::new(), vec![spawn(0, 0)], vec![spawn(4, 4)]);
    BattleSession::from_board(&board).unwrap()
}

fn current_id(session: &BattleSession) -> CombatantId {
    session.current_combatant().unwrap().id
}

#[test]
fn test_setup_places_everyone_and_starts_player_turn() {
    let mut session = duel();

    let actor = session.current_combatant().unwrap();
    assert_eq!(actor.side, Side::Player);
    assert!(actor.is_current);
    assert_eq!(actor.ap, actor.max_ap);
    assert_eq!(session.grid().occupant(GridPos::new(0, 0)), Some(actor.id));
    assert_eq!(session.input_state(), InputState::Enabled);

    let events = session.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, BoardEvent::TurnStarted { .. })));
}

#[test]
fn test_move_flow_updates_occupancy_and_reenables_input() {
    let mut session = duel();
    let mover = current_id(&session);
    session.drain_events();

    let reply = session.request_click(GridPos::new(3, 0)).unwrap();
    let CommandReply::MoveStarted(order) = reply else {
        panic!("expected a move order, got {reply:?}");
    };
    assert_eq!(order.mover, mover);
    assert_eq!(order.route.len(), 4); // 3 steps
    assert_eq!(order.ap_cost, 3);
    assert_eq!(session.input_state(), InputState::Disabled);

    // the gate is closed while the mover works
    assert_eq!(
        session.request_click(GridPos::new(1, 1)).unwrap(),
        CommandReply::Rejected(RejectReason::InputDisabled)
    );

    session
        .resolution_signal(ResolutionSignal::Moved { mover })
        .unwrap();

    assert_eq!(session.input_state(), InputState::Enabled);
    assert_eq!(session.grid().occupant(GridPos::new(0, 0)), None);
    assert_eq!(session.grid().occupant(GridPos::new(3, 0)), Some(mover));
    assert_eq!(session.combatant(mover).unwrap().pos, GridPos::new(3, 0));
    // 6 AP - 3 spent
    assert_eq!(session.combatant(mover).unwrap().ap, 3);

    let events = session.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, BoardEvent::MoveCompleted { .. })));
}

#[test]
fn test_move_rejected_without_enough_ap() {
    let mut player = spawn(0, 0);
    player.max_ap = Some(2);
    let board = board(5, 5, Vec::new(), vec![player], vec![spawn(4, 4)]);
    let mut session = BattleSession::from_board(&board).unwrap();
    let mover = current_id(&session);

    // 3 steps at walk cost 1 against 2 AP
    let reply = session.request_click(GridPos::new(3, 0)).unwrap();
    assert_eq!(reply, CommandReply::Rejected(RejectReason::NotEnoughAp));

    // nothing moved, nothing spent, gate still open
    assert_eq!(session.grid().occupant(GridPos::new(0, 0)), Some(mover));
    assert_eq!(session.combatant(mover).unwrap().ap, 2);
    assert_eq!(session.input_state(), InputState::Enabled);
}

#[test]
fn test_move_rejected_when_walled_off() {
    let walls = (0..5)
        .map(|col| CellOverride {
            x: col,
            y: 2,
            walkable: false,
        })
        .collect();
    let board = board(5, 5, walls, vec![spawn(0, 0)], vec![spawn(4, 4)]);
    let mut session = BattleSession::from_board(&board).unwrap();

    let reply = session.request_click(GridPos::new(0, 4)).unwrap();
    assert_eq!(reply, CommandReply::Rejected(RejectReason::NoRouteToCell));
}

#[test]
fn test_route_detours_around_occupied_cells() {
    // an ally parked directly in the corridor
    let board = board(
        5,
        3,
        Vec::new(),
        vec![spawn(0, 1), spawn(2, 1)],
        vec![spawn(4, 2)],
    );
    let mut session = BattleSession::from_board(&board).unwrap();

    let reply = session.request_click(GridPos::new(4, 1)).unwrap();
    let CommandReply::MoveStarted(order) = reply else {
        panic!("expected a move order, got {reply:?}");
    };
    assert!(!order.route.contains(&GridPos::new(2, 1)));
    assert_eq!(order.route.len(), 7); // 4 straight-line steps + 2 for the detour
}

#[test]
fn test_click_own_or_ally_cell_rejected() {
    let board = board(
        5,
        5,
        Vec::new(),
        vec![spawn(0, 0), spawn(1, 0)],
        vec![spawn(4, 4)],
    );
    let mut session = BattleSession::from_board(&board).unwrap();

    assert_eq!(
        session.request_click(GridPos::new(0, 0)).unwrap(),
        CommandReply::Rejected(RejectReason::CellNotVacant)
    );
    assert_eq!(
        session.request_click(GridPos::new(1, 0)).unwrap(),
        CommandReply::Rejected(RejectReason::CellNotVacant)
    );
}

#[test]
fn test_click_outside_board_rejected() {
    let mut session = duel();
    assert_eq!(
        session.request_click(GridPos::new(9, 9)).unwrap(),
        CommandReply::Rejected(RejectReason::OutOfBounds)
    );
}

#[test]
fn test_attack_rejected_when_target_too_far() {
    let mut session = duel();
    // enemy is at (4,4), actor at (0,0)
    assert_eq!(
        session.request_click(GridPos::new(4, 4)).unwrap(),
        CommandReply::Rejected(RejectReason::TargetTooFar)
    );
}

#[test]
fn test_attack_flow_with_signals_in_either_order() {
    let board = board(5, 5, Vec::new(), vec![spawn(1, 1)], vec![spawn(2, 1)]);
    let mut session = BattleSession::from_board(&board).unwrap();
    let attacker = current_id(&session);
    let defender = session.grid().occupant(GridPos::new(2, 1)).unwrap();

    let reply = session.request_click(GridPos::new(2, 1)).unwrap();
    let CommandReply::AttackStarted(order) = reply else {
        panic!("expected an attack order, got {reply:?}");
    };
    assert_eq!(order.attacker, attacker);
    assert_eq!(order.defender, defender);
    assert_eq!(session.input_state(), InputState::Disabled);

    // defender-side signal lands first
    session
        .resolution_signal(ResolutionSignal::Hit {
            defender,
            damage: 4,
        })
        .unwrap();
    assert_eq!(session.input_state(), InputState::Disabled);
    assert_eq!(session.combatant(defender).unwrap().hp, 8);

    session
        .resolution_signal(ResolutionSignal::Attacked { attacker })
        .unwrap();
    assert_eq!(session.input_state(), InputState::Enabled);
    // attack cost 3 off the default 6
    assert_eq!(session.combatant(attacker).unwrap().ap, 3);
}

#[test]
fn test_duplicate_and_stray_signals_are_noops() {
    let board = board(5, 5, Vec::new(), vec![spawn(1, 1)], vec![spawn(2, 1)]);
    let mut session = BattleSession::from_board(&board).unwrap();
    let attacker = current_id(&session);
    let defender = session.grid().occupant(GridPos::new(2, 1)).unwrap();

    session.request_click(GridPos::new(2, 1)).unwrap();
    session
        .resolution_signal(ResolutionSignal::Hit {
            defender,
            damage: 4,
        })
        .unwrap();
    // duplicate hit while the attacker signal is still outstanding
    session
        .resolution_signal(ResolutionSignal::Hit {
            defender,
            damage: 4,
        })
        .unwrap();
    assert_eq!(session.combatant(defender).unwrap().hp, 8);

    session
        .resolution_signal(ResolutionSignal::Attacked { attacker })
        .unwrap();
    assert_eq!(session.input_state(), InputState::Enabled);

    // leftovers from the resolved action change nothing
    session
        .resolution_signal(ResolutionSignal::Hit {
            defender,
            damage: 4,
        })
        .unwrap();
    session
        .resolution_signal(ResolutionSignal::Attacked { attacker })
        .unwrap();
    assert_eq!(session.combatant(defender).unwrap().hp, 8);
    assert_eq!(session.input_state(), InputState::Enabled);
}

#[test]
fn test_death_clears_occupancy_before_paired_signal() {
    let mut enemy = spawn(2, 1);
    enemy.max_hp = Some(4);
    let board = board(5, 5, Vec::new(), vec![spawn(1, 1), spawn(0, 0)], vec![enemy]);
    let mut session = BattleSession::from_board(&board).unwrap();
    let attacker = current_id(&session);
    let defender = session.grid().occupant(GridPos::new(2, 1)).unwrap();
    session.drain_events();

    session.request_click(GridPos::new(2, 1)).unwrap();
    session
        .resolution_signal(ResolutionSignal::Hit {
            defender,
            damage: 4,
        })
        .unwrap();

    // dead and gone from the board, attacker signal still outstanding
    assert!(!session.combatant(defender).unwrap().is_alive());
    assert_eq!(session.grid().occupant(GridPos::new(2, 1)), None);
    assert_eq!(session.input_state(), InputState::Disabled);

    let events = session.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, BoardEvent::CombatantDied { .. })));

    session
        .resolution_signal(ResolutionSignal::Attacked { attacker })
        .unwrap();
    // sole enemy died: battle over
    assert!(session.is_finished());
    assert_eq!(session.winner(), Some(Side::Player));
}

#[test]
fn test_battle_end_overrides_automatic_end_turn() {
    // attack cost equals max AP, so the kill leaves the attacker at 0 AP
    let mut player = spawn(1, 1);
    player.max_ap = Some(3);
    let mut enemy = spawn(2, 1);
    enemy.max_hp = Some(2);
    let board = board(5, 5, Vec::new(), vec![player], vec![enemy]);
    let mut session = BattleSession::from_board(&board).unwrap();
    let attacker = current_id(&session);
    let defender = session.grid().occupant(GridPos::new(2, 1)).unwrap();
    session.drain_events();

    session.request_click(GridPos::new(2, 1)).unwrap();
    session
        .resolution_signal(ResolutionSignal::Attacked { attacker })
        .unwrap();
    session
        .resolution_signal(ResolutionSignal::Hit {
            defender,
            damage: 5,
        })
        .unwrap();

    assert!(session.is_finished());
    assert_eq!(session.winner(), Some(Side::Player));
    assert_eq!(session.combatant(attacker).unwrap().ap, 0);

    // battle end fired; the 0-AP automatic end-turn did not
    let events = session.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, BoardEvent::BattleEnded { winner: Side::Player })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, BoardEvent::TurnStarted { .. })));

    // terminal phase rejects everything
    assert_eq!(
        session.request_click(GridPos::new(3, 3)).unwrap(),
        CommandReply::Rejected(RejectReason::BattleOver)
    );
    assert_eq!(
        session.request_end_turn().unwrap(),
        CommandReply::Rejected(RejectReason::BattleOver)
    );
}

#[test]
fn test_ap_exhaustion_triggers_automatic_end_turn() {
    // exactly enough AP for the walk
    let mut player = spawn(0, 0);
    player.max_ap = Some(3);
    let board = board(5, 5, Vec::new(), vec![player], vec![spawn(4, 4)]);
    let mut session = BattleSession::from_board(&board).unwrap();
    let mover = current_id(&session);
    session.drain_events();

    session.request_click(GridPos::new(3, 0)).unwrap();
    session
        .resolution_signal(ResolutionSignal::Moved { mover })
        .unwrap();

    // the walk drained the pool, so the enemy's turn began
    let actor = session.current_combatant().unwrap();
    assert_eq!(actor.side, Side::Enemy);
    assert_eq!(actor.ap, actor.max_ap);
    assert!(actor.is_current);
    assert!(!session.combatant(mover).unwrap().is_current);

    let events = session.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, BoardEvent::TurnStarted { .. })));
}

#[test]
fn test_manual_end_turn_cycles_through_the_queue() {
    let board = board(
        6,
        6,
        Vec::new(),
        vec![spawn(0, 0), spawn(0, 2)],
        vec![spawn(5, 5)],
    );
    let mut session = BattleSession::from_board(&board).unwrap();
    let first = current_id(&session);
    let second = session.grid().occupant(GridPos::new(0, 2)).unwrap();
    let enemy = session.grid().occupant(GridPos::new(5, 5)).unwrap();

    session.request_end_turn().unwrap();
    assert_eq!(current_id(&session), second);

    session.request_end_turn().unwrap();
    assert_eq!(current_id(&session), enemy);

    // full cycle lands back on the first combatant
    session.request_end_turn().unwrap();
    assert_eq!(current_id(&session), first);
}

#[test]
fn test_hover_reports() {
    let board = board(
        5,
        5,
        vec![CellOverride {
            x: 0,
            y: 4,
            walkable: false,
        }],
        vec![spawn(1, 1), spawn(0, 0)],
        vec![spawn(2, 1), spawn(4, 4)],
    );
    let mut session = BattleSession::from_board(&board).unwrap();
    session.drain_events();

    // vacant cell: walk preview plus a route for highlighting
    session.request_hover(GridPos::new(3, 3)).unwrap();
    let events = session.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, BoardEvent::RouteComputed { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        BoardEvent::CellHovered {
            report: HoverReport::WalkPreview {
                ap_cost: 4,
                affordable: true,
                ..
            },
            ..
        }
    )));

    // adjacent enemy: attack preview
    session.request_hover(GridPos::new(2, 1)).unwrap();
    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        BoardEvent::CellHovered {
            report: HoverReport::AttackPreview {
                ap_cost: 3,
                affordable: true,
                ..
            },
            ..
        }
    )));

    // distant enemy: name-and-health card only
    session.request_hover(GridPos::new(4, 4)).unwrap();
    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        BoardEvent::CellHovered {
            report: HoverReport::EnemyInfo {
                health: HealthStatus::Unscathed,
                ..
            },
            ..
        }
    )));

    // ally: exact HP
    session.request_hover(GridPos::new(0, 0)).unwrap();
    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        BoardEvent::CellHovered {
            report: HoverReport::AllyInfo { hp: 12, .. },
            ..
        }
    )));

    // unwalkable terrain
    session.request_hover(GridPos::new(0, 4)).unwrap();
    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        BoardEvent::CellHovered {
            report: HoverReport::Terrain,
            ..
        }
    )));

    // hovering a vacant cell leaves a highlight route behind; exit clears it
    session.request_hover(GridPos::new(3, 3)).unwrap();
    assert!(session.hover_route().is_some());
    let reply = session.request_exit(GridPos::new(3, 3)).unwrap();
    assert_eq!(reply, CommandReply::Accepted);
    assert!(session.hover_route().is_none());
}

#[test]
fn test_hover_rejected_while_action_in_flight() {
    let mut session = duel();
    let mover = current_id(&session);

    session.request_click(GridPos::new(2, 0)).unwrap();
    assert_eq!(
        session.request_hover(GridPos::new(1, 1)).unwrap(),
        CommandReply::Rejected(RejectReason::InputDisabled)
    );
    assert_eq!(
        session.request_end_turn().unwrap(),
        CommandReply::Rejected(RejectReason::InputDisabled)
    );

    session
        .resolution_signal(ResolutionSignal::Moved { mover })
        .unwrap();
    assert!(!session
        .request_hover(GridPos::new(1, 1))
        .unwrap()
        .is_rejected());
}

#[test]
fn test_spawn_collision_is_a_setup_fault() {
    let board = board(5, 5, Vec::new(), vec![spawn(0, 0)], vec![spawn(0, 0)]);
    assert!(matches!(
        BattleSession::from_board(&board),
        Err(EngineError::CellOccupied(_))
    ));
}

#[test]
fn test_board_without_enemies_is_a_setup_fault() {
    let board = board(5, 5, Vec::new(), vec![spawn(0, 0)], Vec::new());
    assert!(matches!(
        BattleSession::from_board(&board),
        Err(EngineError::EmptyParty(Side::Enemy))
    ));
}

#[test]
fn test_session_from_json_definition() {
    let json = r#"{
        "width": 7,
        "height": 5,
        "cells": [
            {"x": 3, "y": 1, "walkable": false},
            {"x": 3, "y": 2, "walkable": false},
            {"x": 3, "y": 3, "walkable": false},
            {"x": 3, "y": 4, "walkable": false}
        ],
        "parties": [
            {"combatants": [{"x": 2, "y": 2, "name": "Aldric", "max_ap": 12}]},
            {"enemy": true, "combatants": [{"x": 6, "y": 2, "name": "Grukk"}]}
        ]
    }"#;
    let board = BoardFile::from_json(json).unwrap();
    let mut session = BattleSession::from_board(&board).unwrap();

    assert_eq!(session.current_combatant().unwrap().name, "Aldric");

    // the wall spans rows 1..=4, so the only way past column 3 is row 0
    let reply = session.request_click(GridPos::new(4, 2)).unwrap();
    let CommandReply::MoveStarted(order) = reply else {
        panic!("expected a move order, got {reply:?}");
    };
    assert!(order.route.contains(&GridPos::new(2, 0)));
    assert!(order.route.contains(&GridPos::new(4, 0)));
    assert_eq!(order.route.len(), 7); // 6 steps around the wall
}

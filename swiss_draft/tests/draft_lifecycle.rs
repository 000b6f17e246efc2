//! End-to-end tests of a multi-stage draft event driven through the manager.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::sync::Arc;
use swiss_draft::store::InMemoryRepository;
use swiss_draft::swiss::{EnrollmentId, RoundState, StageId, StageState, TournamentId};
use swiss_draft::tournament::{NewStage, RoundAdvance, StandingsScope, TournamentManager};
use swiss_draft::SwissConfig;

fn setup(players: usize) -> (TournamentManager, TournamentId, Vec<EnrollmentId>) {
    let manager = TournamentManager::with_seed(Arc::new(InMemoryRepository::new()), 2024);
    let id = manager
        .create_tournament("Friday Cube", 0, SwissConfig::default())
        .expect("create");
    let enrollments = (0..players)
        .map(|i| manager.enroll(id, &format!("player{i:02}")).expect("enroll"))
        .collect();
    (manager, id, enrollments)
}

/// Pair, play and finish the current round with decisive results
fn play_round(
    manager: &TournamentManager,
    id: TournamentId,
    stage_id: StageId,
    results: &mut StdRng,
) -> RoundAdvance {
    let round_id = manager.pair_round(id, stage_id).expect("pair");
    manager.start_round(id, round_id).expect("start");

    for game in manager.matches_for_round(id, round_id).expect("matches") {
        let (w1, w2) = match results.random_range(0..4) {
            0 => (2, 0),
            1 => (2, 1),
            2 => (1, 2),
            _ => (0, 2),
        };
        manager
            .report_result(id, game.id, w1, w2, "player")
            .expect("report");
        manager.confirm_result(id, game.id).expect("confirm");
    }

    manager.finish_round(id, round_id).expect("finish")
}

#[test]
fn test_two_pods_then_top_eight() {
    let (manager, id, enrollments) = setup(16);
    let mut results = StdRng::seed_from_u64(99);

    let pod_a = manager
        .add_stage(
            id,
            NewStage::new("Pod A", 3).with_enrollments(enrollments[..8].to_vec()),
        )
        .expect("pod a");
    let pod_b = manager
        .add_stage(
            id,
            NewStage::new("Pod B", 3)
                .with_first_table(5)
                .with_enrollments(enrollments[8..].to_vec()),
        )
        .expect("pod b");
    manager.seat_stage(id, pod_a).expect("seat a");
    manager.seat_stage(id, pod_b).expect("seat b");

    for round in 1..=3 {
        let a = play_round(&manager, id, pod_a, &mut results);
        let b = play_round(&manager, id, pod_b, &mut results);
        if round < 3 {
            assert!(matches!(a, RoundAdvance::NextRound(_)));
            assert!(matches!(b, RoundAdvance::NextRound(_)));
        } else {
            assert_eq!(a, RoundAdvance::StageFinished);
            assert_eq!(b, RoundAdvance::StageFinished);
        }
        assert_eq!(manager.finish_event_round(id).expect("event round"), round);
    }

    let snapshot = manager.snapshot(id).expect("snapshot");
    for enrollment in snapshot.enrollments.values() {
        // Three different opponents in three rounds
        assert_eq!(enrollment.pairings.len(), 3, "{}", enrollment.player_name);
        assert_eq!(enrollment.event_opponents.len(), 3);
        assert!(enrollment.stage.games_played >= 6);
    }
    for stage_id in [pod_a, pod_b] {
        assert_eq!(snapshot.stages[&stage_id].state, StageState::Finished);
    }
    let pod_b_tables: BTreeSet<u32> = snapshot
        .matches
        .values()
        .filter(|m| snapshot.rounds[&m.round_id].stage_id == pod_b)
        .map(|m| m.table)
        .collect();
    assert_eq!(pod_b_tables, BTreeSet::from([5, 6, 7, 8]));

    let event = manager
        .standings(id, StandingsScope::Event)
        .expect("event standings");
    assert_eq!(event.len(), 16);
    // 24 decisive matches
    assert_eq!(event.iter().map(|e| e.score).sum::<u32>(), 72);
    assert_eq!(
        event.iter().map(|e| e.place).collect::<Vec<_>>(),
        (1..=16).collect::<Vec<_>>()
    );
    for pair in event.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    let top_eight: Vec<EnrollmentId> = event.iter().take(8).map(|e| e.enrollment_id).collect();
    let final_stage = manager
        .add_stage(
            id,
            NewStage::new("Top 8", 1)
                .in_phase(2)
                .with_enrollments(top_eight.clone()),
        )
        .expect("top 8");
    manager.seat_stage(id, final_stage).expect("seat");
    assert_eq!(
        play_round(&manager, id, final_stage, &mut results),
        RoundAdvance::StageFinished
    );

    let finals = manager
        .standings(id, StandingsScope::Stage(final_stage))
        .expect("final standings");
    assert_eq!(finals.len(), 8);
    assert!(finals.iter().all(|e| top_eight.contains(&e.enrollment_id)));
    assert_eq!(finals.iter().filter(|e| e.score == 3).count(), 4);
}

#[test]
fn test_odd_pod_gives_one_bye_per_round() {
    let (manager, id, _) = setup(7);
    let mut results = StdRng::seed_from_u64(5);
    let stage_id = manager
        .add_stage(id, NewStage::new("Pod", 2))
        .expect("stage");
    manager.seat_stage(id, stage_id).expect("seat");

    let mut bye_players = Vec::new();
    for _ in 0..2 {
        play_round(&manager, id, stage_id, &mut results);
        let snapshot = manager.snapshot(id).expect("snapshot");
        let round = snapshot
            .rounds
            .values()
            .filter(|r| r.stage_id == stage_id && r.state == RoundState::Finished)
            .last()
            .expect("finished round");
        assert_eq!(round.byes.len(), 1);
        assert_eq!(round.matches.len(), 3);
        bye_players.push(round.byes[0]);
    }
    assert_ne!(bye_players[0], bye_players[1]);

    let table = manager
        .standings(id, StandingsScope::Stage(stage_id))
        .expect("standings");
    assert_eq!(table.len(), 7);
    // Two rounds: 3 decisive matches and one bye each
    assert_eq!(table.iter().map(|e| e.score).sum::<u32>(), 24);
}

#[test]
fn test_dropped_player_leaves_pairings_and_standings() {
    let (manager, id, enrollments) = setup(8);
    let mut results = StdRng::seed_from_u64(11);
    let stage_id = manager
        .add_stage(id, NewStage::new("Pod", 2))
        .expect("stage");
    manager.seat_stage(id, stage_id).expect("seat");
    play_round(&manager, id, stage_id, &mut results);

    let dropped = enrollments[3];
    manager.drop_enrollment(id, dropped).expect("drop");
    let round_id = manager.pair_round(id, stage_id).expect("pair");

    let matches = manager.matches_for_round(id, round_id).expect("matches");
    assert_eq!(matches.len(), 3);
    assert!(matches.iter().all(|m| !m.involves(dropped)));
    let snapshot = manager.snapshot(id).expect("snapshot");
    assert_eq!(snapshot.rounds[&round_id].byes.len(), 1);

    let table = manager
        .standings(id, StandingsScope::Stage(stage_id))
        .expect("standings");
    assert_eq!(table.len(), 7);
    assert!(table.iter().all(|e| e.enrollment_id != dropped));
}

#[test]
fn test_reset_history_allows_reseating() {
    let (manager, id, _) = setup(6);
    let mut results = StdRng::seed_from_u64(8);
    let stage_id = manager
        .add_stage(id, NewStage::new("Pod", 2))
        .expect("stage");
    manager.seat_stage(id, stage_id).expect("seat");
    play_round(&manager, id, stage_id, &mut results);

    manager.reset_history(id, stage_id).expect("reset");
    let snapshot = manager.snapshot(id).expect("snapshot");
    assert!(snapshot.rounds.is_empty());
    assert!(snapshot.matches.is_empty());
    assert!(
        snapshot
            .enrollments
            .values()
            .all(|e| e.event.score == 0 && e.event_opponents.is_empty())
    );

    manager.seat_stage(id, stage_id).expect("reseat");
    let status = manager.stage_status(id, stage_id).expect("status");
    assert_eq!(status.state, StageState::Seated);
    assert_eq!(status.round_idx, Some(1));

    assert!(matches!(
        play_round(&manager, id, stage_id, &mut results),
        RoundAdvance::NextRound(_)
    ));
}


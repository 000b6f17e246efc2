//! Integration tests running operator commands end to end.

use std::sync::Arc;
use sd_cli::app::App;
use sd_cli::commands::parse_command;
use swiss_draft::SwissConfig;
use swiss_draft::store::InMemoryRepository;
use swiss_draft::tournament::TournamentManager;

fn app_with(seed: u64, config: SwissConfig) -> (App, TournamentManager) {
    let manager = TournamentManager::with_seed(Arc::new(InMemoryRepository::new()), seed);
    (App::new(manager.clone(), config, Some(seed)), manager)
}

fn app(seed: u64) -> (App, TournamentManager) {
    app_with(seed, SwissConfig::default())
}

fn run(app: &mut App, line: &str) -> anyhow::Result<String> {
    let words: Vec<String> = line.split_whitespace().map(String::from).collect();
    app.execute(parse_command(&words)?)
}

#[test]
fn test_operator_session() {
    let (mut app, manager) = app(12);

    assert_eq!(run(&mut app, "new Cube 8").expect("new"), "Created tournament 1 (Cube)");
    let enrolled = run(&mut app, "enroll 1 ana ben cai dee eli").expect("enroll");
    assert_eq!(enrolled.lines().count(), 5);
    assert!(enrolled.contains("Enrolled ana as 1"));

    assert_eq!(
        run(&mut app, "stage 1 Pod 2 --table 3").expect("stage"),
        "Added stage 6 (Pod)"
    );
    assert!(run(&mut app, "seat 1 6").expect("seat").contains("round 7"));

    let pairings = run(&mut app, "pair 1 6").expect("pair");
    assert!(pairings.contains("Table   3"));
    assert!(pairings.contains("Table   4"));
    assert!(pairings.contains("Bye:"));

    let round = manager.snapshot(1).expect("snapshot").rounds[&7].clone();
    for match_id in &round.matches {
        run(&mut app, &format!("report 1 {} 2 1", match_id)).expect("report");
        run(&mut app, &format!("confirm 1 {}", match_id)).expect("confirm");
    }
    assert!(
        run(&mut app, "finish 1 7")
            .expect("finish")
            .contains("is ready")
    );

    let standings = run(&mut app, "standings 1 6").expect("standings");
    // Header plus five players
    assert_eq!(standings.lines().count(), 6);

    let shown = run(&mut app, "show 1 6").expect("show");
    assert!(shown.contains("round 2/2"));
}

#[test]
fn test_simulate_finishes_stage() {
    let config = SwissConfig {
        allow_repeat_fallback: true,
        ..SwissConfig::default()
    };
    let (mut app, manager) = app_with(3, config);
    run(&mut app, "new League").expect("new");
    run(&mut app, "enroll 1 a b c d e f g h").expect("enroll");
    run(&mut app, "stage 1 Pod 3").expect("stage");

    let output = run(&mut app, "simulate 1 9").expect("simulate");
    assert!(output.contains("Simulated round 3"));

    let status = manager.stage_status(1, 9).expect("status");
    assert_eq!(status.round_idx, Some(3));
    assert!(run(&mut app, "event-round 1").is_ok());
    let export = run(&mut app, "export 1").expect("export");
    assert!(export.contains("\"name\": \"League\""));
}

#[test]
fn test_engine_errors_surface() {
    let (mut app, _) = app(1);
    run(&mut app, "new Cube 1").expect("new");
    run(&mut app, "enroll 1 ana").expect("enroll");

    let err = run(&mut app, "enroll 1 ben").unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to enroll ben"));

    let err = run(&mut app, "seat 7 1").unwrap_err();
    let swiss = err
        .downcast_ref::<swiss_draft::SwissError>()
        .expect("engine error");
    assert_eq!(swiss.client_message(), "Tournament not found");
}

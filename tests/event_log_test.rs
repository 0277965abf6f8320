//! Event log end to end: a scripted session written to a real file

use std::fs;
use std::path::PathBuf;

use classic_tetris::config::{GameConfig, ENV_LOG_PATH, ENV_SEED};
use classic_tetris::core::{tetromino, ActivePiece, Board, GameState};
use classic_tetris::event_log::EventLog;
use classic_tetris::types::{GameAction, PieceKind, Rgb};

fn temp_log_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("classic-tetris-{}-{}.jsonl", name, std::process::id()))
}

#[test]
fn session_events_are_appended_as_json_lines() {
    let path = temp_log_path("session");
    let _ = fs::remove_file(&path);

    let config = GameConfig::from_lookup(|key| match key {
        ENV_SEED => Some("77".to_string()),
        ENV_LOG_PATH => Some(path.display().to_string()),
        _ => None,
    });

    let board = Board::from_ascii(&["####..####"], Rgb::new(5, 5, 5));
    let mut state = GameState::from_position(
        board,
        ActivePiece::at(tetromino(PieceKind::O), 4, 0),
        PieceKind::I,
        config.resolve_seed(),
        0,
    );

    let mut log = EventLog::open(config.log_path.as_ref().unwrap()).unwrap();
    log.session_start(0, config.resolve_seed(), config.tick_ms);
    state.apply_action(GameAction::HardDrop, 120);
    state.apply_action(GameAction::TogglePause, 200);
    for ev in state.take_events() {
        log.record(200, &ev);
    }
    assert!(log.finish().is_none());

    let text = fs::read_to_string(&path).unwrap();
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let types: Vec<&str> = records.iter().map(|r| r["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["sessionStart", "pieceLocked", "linesCleared", "paused"]);

    assert_eq!(records[0]["seed"], 77);
    assert_eq!(records[0]["tickMs"], 16);
    assert_eq!(records[1]["kind"], "O");
    assert_eq!(records[2]["rows"], 1);
    assert_eq!(records[2]["points"], 40);
    assert_eq!(records[2]["totalLines"], 1);
    assert!(records.iter().all(|r| r["tMs"].is_u64()));

    let _ = fs::remove_file(&path);
}

#[test]
fn reopening_appends() {
    let path = temp_log_path("append");
    let _ = fs::remove_file(&path);

    for t in [1, 2] {
        let mut log = EventLog::open(&path).unwrap();
        log.session_start(t, 1, 16);
        assert!(log.finish().is_none());
    }

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
    let _ = fs::remove_file(&path);
}

#[test]
fn unopenable_path_is_an_error() {
    let dir = std::env::temp_dir();
    // A directory cannot be opened for appending.
    assert!(EventLog::open(&dir).is_err());
}

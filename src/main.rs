//! Terminal Tetris runner (default binary).
//!
//! Polls crossterm input with a timeout until the next tick, applies mapped
//! actions immediately, then ticks gravity. Every loop iteration redraws
//! through the diffing renderer.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use classic_tetris::config::GameConfig;
use classic_tetris::core::{Clock, GameLoop, GameSnapshot, SystemClock};
use classic_tetris::event_log::EventLog;
use classic_tetris::input::{handle_key_event, should_quit};
use classic_tetris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

fn main() -> Result<()> {
    let config = GameConfig::from_env();

    // Nothing may be printed once raw mode is on, so open the log first.
    let mut log = match &config.log_path {
        Some(path) => EventLog::open(path).unwrap_or_else(|err| {
            eprintln!("classic-tetris: event log disabled: {err:#}");
            EventLog::disabled()
        }),
        None => EventLog::disabled(),
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config, &mut log);

    // Always try to restore terminal state.
    let restored = term.exit();
    if let Some(err) = log.finish() {
        eprintln!("classic-tetris: event log disabled: {err:#}");
    }
    result.and(restored)
}

fn run(term: &mut TerminalRenderer, config: &GameConfig, log: &mut EventLog) -> Result<()> {
    let seed = config.resolve_seed();
    let mut game = GameLoop::new(seed, SystemClock::new());
    log.session_start(game.clock().now_ms(), seed, config.tick_ms);

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();

    let tick_duration = Duration::from_millis(config.tick_ms as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        game.dispatch(action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            game.tick();
        }

        let now = game.clock().now_ms();
        for ev in game.take_events() {
            log.record(now, &ev);
        }
    }
}

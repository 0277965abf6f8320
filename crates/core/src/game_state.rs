//! Game state module - one game session
//!
//! This module ties together the board, the active and lookahead pieces, the
//! RNG and the score keeper. It owns the Running / Paused / GameOver state
//! machine and the lock sequence.
//!
//! Nothing here reads a clock. Operations that touch the gravity timer take the
//! current time as `now_ms`; [`crate::GameLoop`] supplies it from a
//! [`crate::Clock`].

use crate::board::Board;
use crate::catalog::{random_tetromino, tetromino, Tetromino};
use crate::piece::ActivePiece;
use crate::rng::SimpleRng;
use crate::scoring::ScoreKeeper;
use crate::snapshot::GameSnapshot;
use crate::types::*;

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: ActivePiece,
    /// Lookahead piece, promoted to active on the next spawn.
    next: &'static Tetromino,
    rng: SimpleRng,
    scores: ScoreKeeper,
    status: GameStatus,
    /// Gravity timer reference: the last time the piece fell (or gravity resumed).
    last_drop_ms: u64,
    /// Events recorded since the last `take_events`.
    events: Vec<CoreEvent>,
}

impl GameState {
    /// Start a new game with the given RNG seed
    pub fn new(seed: u32, now_ms: u64) -> Self {
        let mut rng = SimpleRng::new(seed);
        let active = ActivePiece::spawn(random_tetromino(&mut rng));
        let next = random_tetromino(&mut rng);

        Self {
            board: Board::new(),
            active,
            next,
            rng,
            scores: ScoreKeeper::new(),
            status: GameStatus::Running,
            last_drop_ms: now_ms,
            events: Vec::new(),
        }
    }

    /// Start a game from an arranged position.
    ///
    /// Used for scripted scenarios and tests: the board, active piece and
    /// lookahead are given, later pieces come from `seed`.
    pub fn from_position(
        board: Board,
        active: ActivePiece,
        next: PieceKind,
        seed: u32,
        now_ms: u64,
    ) -> Self {
        Self {
            board,
            active,
            next: tetromino(next),
            rng: SimpleRng::new(seed),
            scores: ScoreKeeper::new(),
            status: GameStatus::Running,
            last_drop_ms: now_ms,
            events: Vec::new(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn score(&self) -> u32 {
        self.scores.score()
    }

    pub fn level(&self) -> u32 {
        self.scores.level()
    }

    pub fn lines(&self) -> u32 {
        self.scores.lines()
    }

    /// Current gravity interval
    pub fn drop_interval_ms(&self) -> u32 {
        self.scores.drop_interval_ms()
    }

    pub fn last_drop_ms(&self) -> u64 {
        self.last_drop_ms
    }

    pub fn active(&self) -> ActivePiece {
        self.active
    }

    pub fn next(&self) -> &'static Tetromino {
        self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = if self.game_over() {
            None
        } else {
            Some(self.active)
        };
        out.next = *self.next;
        out.score = self.score();
        out.lines = self.lines();
        out.level = self.level();
        out.status = self.status;
        out.drop_interval_ms = self.drop_interval_ms();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Take the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move the active piece if the target is free
    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if !self.is_running() || self.active.collides(&self.board, dx, dy) {
            return false;
        }
        self.active = self.active.shifted(dx, dy);
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// Rotate clockwise with wall kicks; a rejected rotation leaves the piece untouched.
    pub fn rotate(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        match self.active.try_rotate(&self.board) {
            Some(rotated) => {
                self.active = rotated;
                true
            }
            None => false,
        }
    }

    /// Player-requested one-row drop (+1 point when the piece moves).
    ///
    /// Returns `true` if the piece moved; a blocked piece locks instead.
    pub fn soft_drop(&mut self, now_ms: u64) -> bool {
        let moved = self.step_down(now_ms);
        if moved {
            self.scores.record_drop(1, false);
        }
        moved
    }

    /// Gravity-driven one-row drop (no points).
    pub fn gravity_drop(&mut self, now_ms: u64) -> bool {
        self.step_down(now_ms)
    }

    /// Move down one row and reset the gravity timer, or lock if blocked.
    fn step_down(&mut self, now_ms: u64) -> bool {
        if !self.is_running() {
            return false;
        }
        if self.try_move(0, 1) {
            self.last_drop_ms = now_ms;
            true
        } else {
            self.lock_active();
            false
        }
    }

    /// Drop the active piece to its resting row and lock it.
    ///
    /// Awards 2 points per row descended and returns the row count.
    pub fn hard_drop(&mut self) -> u32 {
        if !self.is_running() {
            return 0;
        }

        let distance = self.active.drop_distance(&self.board);
        if distance > 0 {
            self.active = self.active.shifted(0, distance as i8);
        }
        self.scores.record_drop(distance, true);

        self.lock_active();
        distance
    }

    /// Lock sequence: write the piece, clear rows, score, then either end the
    /// game or promote the lookahead piece.
    fn lock_active(&mut self) {
        let piece = self.active;
        self.board.lock(&piece);
        self.events.push(CoreEvent::PieceLocked {
            kind: piece.kind(),
            x: piece.x,
            y: piece.y,
        });

        let rows = self.board.clear_completed_rows();
        let result = self.scores.record_clear(rows);
        if rows > 0 {
            self.events.push(CoreEvent::LinesCleared {
                rows,
                points: result.points,
                total_lines: self.scores.lines(),
            });
        }
        if result.leveled_up() {
            self.events.push(CoreEvent::LevelUp {
                level: result.level_after,
                drop_interval_ms: self.scores.drop_interval_ms(),
            });
        }

        // A piece that locks while still touching the top row means the next
        // piece has no room to enter.
        if piece.y <= 0 {
            self.status = GameStatus::GameOver;
            self.events.push(CoreEvent::GameOver {
                score: self.scores.score(),
                lines: self.scores.lines(),
                level: self.scores.level(),
            });
            return;
        }

        self.active = ActivePiece::spawn(self.next);
        self.next = random_tetromino(&mut self.rng);
    }

    /// Pause or resume. Resuming restarts the gravity timer from `now_ms`.
    pub fn toggle_pause(&mut self, now_ms: u64) -> bool {
        match self.status {
            GameStatus::Running => {
                self.status = GameStatus::Paused;
                self.events.push(CoreEvent::Paused);
                true
            }
            GameStatus::Paused => {
                self.status = GameStatus::Running;
                self.last_drop_ms = now_ms;
                self.events.push(CoreEvent::Resumed);
                true
            }
            GameStatus::GameOver => false,
        }
    }

    /// Reset every session counter and start over.
    ///
    /// The RNG carries on from its current state, so a restarted game gets a
    /// fresh piece sequence.
    pub fn restart(&mut self, now_ms: u64) {
        self.board.clear();
        self.active = ActivePiece::spawn(random_tetromino(&mut self.rng));
        self.next = random_tetromino(&mut self.rng);
        self.scores = ScoreKeeper::new();
        self.status = GameStatus::Running;
        self.last_drop_ms = now_ms;
        self.events.push(CoreEvent::Restarted);
    }

    /// Gravity tick.
    ///
    /// While running, once more than one drop interval has passed since the
    /// last drop, the piece falls (or locks) and the timer restarts at `now_ms`.
    /// Returns `true` when gravity was applied.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.is_running() {
            return false;
        }

        let elapsed = now_ms.saturating_sub(self.last_drop_ms);
        if elapsed <= self.drop_interval_ms() as u64 {
            return false;
        }

        self.gravity_drop(now_ms);
        self.last_drop_ms = now_ms;
        true
    }

    /// Apply a game action
    ///
    /// - GameOver: only `Restart` acts.
    /// - Paused: only `TogglePause` and `Restart` act.
    ///
    /// Returns whether the action changed anything.
    pub fn apply_action(&mut self, action: GameAction, now_ms: u64) -> bool {
        match (self.status, action) {
            (_, GameAction::Restart) => {
                self.restart(now_ms);
                true
            }
            (GameStatus::GameOver, _) => false,
            (_, GameAction::TogglePause) => self.toggle_pause(now_ms),
            (GameStatus::Paused, _) => false,
            (GameStatus::Running, GameAction::MoveLeft) => self.move_left(),
            (GameStatus::Running, GameAction::MoveRight) => self.move_right(),
            (GameStatus::Running, GameAction::SoftDrop) => {
                // A blocked soft drop still acts: it locks the piece.
                self.soft_drop(now_ms);
                true
            }
            (GameStatus::Running, GameAction::Rotate) => self.rotate(),
            (GameStatus::Running, GameAction::HardDrop) => {
                self.hard_drop();
                true
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREY: Rgb = Rgb::new(128, 128, 128);

    fn piece(kind: PieceKind, x: i8, y: i8) -> ActivePiece {
        ActivePiece::at(tetromino(kind), x, y)
    }

    fn state_with(board: Board, active: ActivePiece) -> GameState {
        GameState::from_position(board, active, PieceKind::T, 12345, 0)
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345, 0);

        assert_eq!(state.status(), GameStatus::Running);
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.drop_interval_ms(), 1000);
        assert_eq!((state.active().x, state.active().y), (SPAWN_X, SPAWN_Y));
        assert_eq!(state.board().filled_count(), 0);
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let a = GameState::new(777, 0);
        let b = GameState::new(777, 0);
        assert_eq!(a.active(), b.active());
        assert_eq!(a.next().kind(), b.next().kind());
    }

    #[test]
    fn test_move_left_right() {
        let mut state = state_with(Board::new(), piece(PieceKind::O, 4, 5));

        assert!(state.move_right());
        assert_eq!(state.active().x, 5);
        assert!(state.move_left());
        assert!(state.move_left());
        assert_eq!(state.active().x, 3);
    }

    #[test]
    fn test_move_into_wall_is_noop() {
        let mut state = state_with(Board::new(), piece(PieceKind::O, 0, 5));
        assert!(!state.move_left());
        assert_eq!(state.active().x, 0);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_soft_drop_awards_point_and_resets_timer() {
        let mut state = state_with(Board::new(), piece(PieceKind::O, 4, 5));

        assert!(state.soft_drop(300));
        assert_eq!(state.active().y, 6);
        assert_eq!(state.score(), 1);
        assert_eq!(state.last_drop_ms(), 300);
    }

    #[test]
    fn test_gravity_drop_awards_nothing() {
        let mut state = state_with(Board::new(), piece(PieceKind::O, 4, 5));
        assert!(state.gravity_drop(10));
        assert_eq!(state.active().y, 6);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_blocked_soft_drop_locks_and_promotes_next() {
        let mut state = state_with(Board::new(), piece(PieceKind::O, 4, 18));

        assert!(!state.soft_drop(0));
        assert_eq!(state.score(), 0);
        assert_eq!(state.board().get(4, 19), Some(Some(tetromino(PieceKind::O).color())));
        assert_eq!(state.active().kind(), PieceKind::T);
        assert_eq!((state.active().x, state.active().y), (SPAWN_X, SPAWN_Y));

        let events = state.take_events();
        assert_eq!(
            events,
            vec![CoreEvent::PieceLocked {
                kind: PieceKind::O,
                x: 4,
                y: 18
            }]
        );
    }

    #[test]
    fn test_hard_drop_scores_two_per_row() {
        let mut state = state_with(Board::new(), piece(PieceKind::O, 4, 2));

        assert_eq!(state.hard_drop(), 16);
        assert_eq!(state.score(), 32);
        assert_eq!(state.board().is_occupied(4, 19), Some(true));
        assert_eq!(state.board().is_occupied(5, 18), Some(true));
    }

    #[test]
    fn test_rotate_commits_or_reverts() {
        let mut state = state_with(Board::new(), piece(PieceKind::T, 4, 8));
        let before = state.active();
        assert!(state.rotate());
        assert_eq!(state.active().shape(), before.shape().rotated_cw());

        // Fill everything around a vertical I so no kick can help.
        let mut board = Board::new();
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                if x != 6 {
                    board.set(x, y, Some(GREY));
                }
            }
        }
        let vertical = piece(PieceKind::I, 4, 5)
            .try_rotate(&Board::new())
            .unwrap();
        assert_eq!(vertical.board_cells()[0].0, 6);
        let mut boxed = state_with(board, vertical);
        assert!(!boxed.rotate());
        assert_eq!(boxed.active(), vertical);
    }

    #[test]
    fn test_line_clear_scoring_and_events() {
        // Bottom two rows full except columns 4-5, filled by an O.
        let board = Board::from_ascii(&["####..####", "####..####"], GREY);
        let mut state = state_with(board, piece(PieceKind::O, 4, 10));

        state.hard_drop();

        assert_eq!(state.lines(), 2);
        assert_eq!(state.score(), 100 + 2 * 8);
        assert_eq!(state.board().filled_count(), 0);

        let events = state.take_events();
        assert!(events.contains(&CoreEvent::LinesCleared {
            rows: 2,
            points: 100,
            total_lines: 2
        }));
    }

    #[test]
    fn test_level_up_event() {
        let board = Board::from_ascii(&["####..####", "####..####"], GREY);
        let mut state = state_with(board, piece(PieceKind::O, 4, 10));
        for _ in 0..4 {
            state.scores.record_clear(2);
        }
        assert_eq!(state.lines(), 8);

        state.hard_drop();

        assert_eq!(state.level(), 2);
        let events = state.take_events();
        assert!(events.contains(&CoreEvent::LevelUp {
            level: 2,
            drop_interval_ms: 950
        }));
    }

    #[test]
    fn test_lock_at_top_row_is_game_over() {
        // Column stack reaching row 2: an O spawned at y=0 rests there.
        let mut board = Board::new();
        for y in 2..BOARD_HEIGHT as i8 {
            board.set(4, y, Some(GREY));
        }
        let mut state = state_with(board, piece(PieceKind::O, 3, 0));

        assert!(!state.soft_drop(0));
        assert!(state.game_over());
        assert!(state.snapshot().active.is_none());

        let events = state.take_events();
        assert!(matches!(events.last(), Some(CoreEvent::GameOver { .. })));
    }

    #[test]
    fn test_game_over_ignores_everything_but_restart() {
        let mut board = Board::new();
        for y in 2..BOARD_HEIGHT as i8 {
            board.set(4, y, Some(GREY));
        }
        let mut state = state_with(board, piece(PieceKind::O, 3, 0));
        state.hard_drop();
        assert!(state.game_over());

        let frozen = state.board().clone();
        for action in [
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::SoftDrop,
            GameAction::Rotate,
            GameAction::HardDrop,
            GameAction::TogglePause,
        ] {
            assert!(!state.apply_action(action, 5000));
        }
        assert!(!state.tick(100_000));
        assert_eq!(state.board(), &frozen);

        assert!(state.apply_action(GameAction::Restart, 6000));
        assert_eq!(state.status(), GameStatus::Running);
        assert_eq!(state.board().filled_count(), 0);
        assert_eq!(state.score(), 0);
        assert_eq!(state.last_drop_ms(), 6000);
    }

    #[test]
    fn test_pause_blocks_moves_and_gravity() {
        let mut state = state_with(Board::new(), piece(PieceKind::O, 4, 5));

        assert!(state.apply_action(GameAction::TogglePause, 100));
        assert!(state.paused());
        assert!(!state.apply_action(GameAction::MoveLeft, 110));
        assert!(!state.apply_action(GameAction::HardDrop, 120));
        assert!(!state.tick(10_000));
        assert_eq!(state.active(), piece(PieceKind::O, 4, 5));

        assert!(state.apply_action(GameAction::TogglePause, 20_000));
        assert!(state.is_running());
        assert_eq!(state.last_drop_ms(), 20_000);
        // No catch-up drop right after resuming.
        assert!(!state.tick(20_016));
    }

    #[test]
    fn test_tick_requires_more_than_interval() {
        let mut state = state_with(Board::new(), piece(PieceKind::O, 4, 5));

        assert!(!state.tick(1000));
        assert_eq!(state.active().y, 5);

        assert!(state.tick(1001));
        assert_eq!(state.active().y, 6);
        assert_eq!(state.last_drop_ms(), 1001);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_tick_locks_grounded_piece() {
        let mut state = state_with(Board::new(), piece(PieceKind::O, 4, 18));
        assert!(state.tick(1500));
        assert_eq!(state.board().filled_count(), 4);
        assert_eq!(state.last_drop_ms(), 1500);
        assert_eq!(state.active().kind(), PieceKind::T);
    }

    #[test]
    fn test_restart_records_event() {
        let mut state = GameState::new(1, 0);
        state.hard_drop();
        state.take_events();

        state.restart(50);
        assert_eq!(state.take_events(), vec![CoreEvent::Restarted]);
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut board = Board::new();
        board.set(0, 19, Some(GREY));
        let state = state_with(board, piece(PieceKind::L, 2, 3));

        let snap = state.snapshot();
        assert_eq!(snap.board[19][0], Some(GREY));
        assert_eq!(snap.active, Some(piece(PieceKind::L, 2, 3)));
        assert_eq!(snap.next.kind(), PieceKind::T);
        assert_eq!(snap.level, 1);
        assert!(snap.playable());
    }
}

//! Core game logic - pure, deterministic, and testable
//!
//! Everything here is independent of the terminal: no I/O, no wall clock.
//! Timestamps come in as `now_ms` arguments or through a [`Clock`].
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid of locked cells and row clearing
//! - [`catalog`]: the seven tetrominoes, their shapes and colors
//! - [`piece`]: the active piece, collision, rotation with wall kicks
//! - [`rng`]: seeded LCG used for piece selection
//! - [`scoring`]: line-clear scores, levels and gravity speed
//! - [`game_state`]: one game session and its Running / Paused / GameOver states
//! - [`game_loop`]: a session driven by an injected [`Clock`]
//! - [`snapshot`]: read-only copy of a session for rendering
//!
//! # Game Rules
//!
//! - Pieces are chosen uniformly at random (no bag) and spawn at (3, 0).
//! - Rotation is clockwise only, with horizontal kicks `0, -1, +1, -2, +2`.
//! - A piece locks the moment it cannot fall. There is no lock delay.
//! - Line clears pay 40 / 100 / 300 / 1200 times the level.
//! - The level goes up every 10 lines; gravity speeds up 50ms per level down to 100ms.
//!
//! # Example
//!
//! ```
//! use classic_tetris_core::GameState;
//! use classic_tetris_core::types::GameAction;
//!
//! let mut game = GameState::new(12345, 0);
//!
//! game.apply_action(GameAction::MoveRight, 0);
//! game.apply_action(GameAction::Rotate, 0);
//! game.apply_action(GameAction::HardDrop, 0);
//!
//! assert!(game.score() > 0); // Hard drop awards points
//! ```

pub mod board;
pub mod catalog;
pub mod clock;
pub mod game_loop;
pub mod game_state;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use classic_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use catalog::{catalog, random_tetromino, tetromino, Shape, Tetromino};
pub use clock::{Clock, ManualClock, SystemClock};
pub use game_loop::GameLoop;
pub use game_state::GameState;
pub use piece::ActivePiece;
pub use rng::SimpleRng;
pub use scoring::{
    calculate_drop_score, calculate_level, calculate_line_score, get_drop_interval_ms,
    ClearResult, ScoreKeeper,
};
pub use snapshot::GameSnapshot;

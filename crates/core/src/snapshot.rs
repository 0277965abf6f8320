//! Read-only view of a game session for renderers and observers.

use crate::catalog::{tetromino, Tetromino};
use crate::piece::ActivePiece;
use crate::types::{Cell, GameStatus, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    /// The falling piece; `None` once the game is over.
    pub active: Option<ActivePiece>,
    pub next: Tetromino,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub status: GameStatus,
    pub drop_interval_ms: u32,
}

impl GameSnapshot {
    /// Reset to the empty level-1 view.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            next: *tetromino(PieceKind::I),
            score: 0,
            lines: 0,
            level: 1,
            status: GameStatus::Running,
            drop_interval_ms: 0,
        }
    }
}

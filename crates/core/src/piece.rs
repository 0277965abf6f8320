//! Piece module - the active falling piece
//!
//! An [`ActivePiece`] is a copy of a catalog entry placed on the board. Its
//! current rotation is carried by its own [`Shape`] value, so rotating never
//! touches the catalog.
//!
//! Movement and rotation follow compute / validate / commit: every candidate
//! position is a new value, checked with [`ActivePiece::collides`] before the
//! caller adopts it.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::catalog::{Shape, Tetromino, MAX_SHAPE_SIZE};
use crate::types::{PieceKind, Rgb, BOARD_HEIGHT, BOARD_WIDTH, SPAWN_X, SPAWN_Y, WALL_KICKS};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    kind: PieceKind,
    shape: Shape,
    color: Rgb,
    pub x: i8,
    pub y: i8,
}

impl ActivePiece {
    /// Place a catalog entry at the spawn position
    pub fn spawn(tetromino: &Tetromino) -> Self {
        Self::at(tetromino, SPAWN_X, SPAWN_Y)
    }

    /// Place a catalog entry at an arbitrary position
    pub fn at(tetromino: &Tetromino, x: i8, y: i8) -> Self {
        Self {
            kind: tetromino.kind(),
            shape: tetromino.shape(),
            color: tetromino.color(),
            x,
            y,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Board coordinates of every occupied cell (may include rows above the board)
    pub fn board_cells(&self) -> ArrayVec<(i8, i8), { MAX_SHAPE_SIZE * MAX_SHAPE_SIZE }> {
        self.shape
            .cells()
            .into_iter()
            .map(|(lx, ly)| (self.x + lx, self.y + ly))
            .collect()
    }

    /// Would the piece collide after moving by (dx, dy)?
    ///
    /// A cell collides when its column leaves [0, W), its row reaches H, or it
    /// lands on an occupied board cell. Rows above the board never collide.
    pub fn collides(&self, board: &Board, dx: i8, dy: i8) -> bool {
        self.board_cells().into_iter().any(|(x, y)| {
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || nx >= BOARD_WIDTH as i8 || ny >= BOARD_HEIGHT as i8 {
                return true;
            }
            ny >= 0 && board.is_occupied(nx, ny) == Some(true)
        })
    }

    /// The same piece moved by (dx, dy)
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Rotate clockwise with horizontal wall kicks.
    ///
    /// The candidate shape is tried at each offset of [`WALL_KICKS`] in order;
    /// the first that fits is returned. `None` means every offset collided and
    /// the caller keeps the current piece unchanged.
    pub fn try_rotate(&self, board: &Board) -> Option<Self> {
        let candidate = Self {
            shape: self.shape.rotated_cw(),
            ..*self
        };

        WALL_KICKS
            .iter()
            .find(|&&dx| !candidate.collides(board, dx, 0))
            .map(|&dx| candidate.shifted(dx, 0))
    }

    /// How many rows the piece can fall before it would collide
    pub fn drop_distance(&self, board: &Board) -> u32 {
        let mut distance = 0;
        while !self.collides(board, 0, distance as i8 + 1) {
            distance += 1;
        }
        distance
    }
}

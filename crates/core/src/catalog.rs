//! Catalog module - the seven tetromino definitions
//!
//! Each tetromino is a square occupancy matrix (2x2, 3x3 or 4x4) plus a color.
//! Matrices are square so that a clockwise quarter turn (transpose + reverse)
//! always stays inside the same frame.
//!
//! Catalog entries are `'static` and never change. Rotating a piece produces a
//! new [`Shape`] value owned by the active piece.

use arrayvec::ArrayVec;

use crate::rng::SimpleRng;
use crate::types::{PieceKind, Rgb};

/// Largest shape frame (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// Occupied local cells of a shape, as `(x, y)` within its frame
pub type ShapeCells = ArrayVec<(i8, i8), { MAX_SHAPE_SIZE * MAX_SHAPE_SIZE }>;

/// Square occupancy matrix describing a piece in its local frame.
///
/// Only the top-left `size x size` part of `cells` is meaningful; the rest
/// stays empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a shape from an `N x N` matrix of 0/1 flags (row-major, top row first).
    pub const fn from_rows<const N: usize>(rows: [[u8; N]; N]) -> Self {
        assert!(N >= 1 && N <= MAX_SHAPE_SIZE, "shape frame must be 1..=4");

        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < N {
            let mut x = 0;
            while x < N {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }

        Self {
            size: N as u8,
            cells,
        }
    }

    /// Side length of the square frame
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Whether local cell `(x, y)` is occupied. Outside the frame is empty.
    pub fn filled(&self, x: usize, y: usize) -> bool {
        let n = self.size as usize;
        x < n && y < n && self.cells[y][x]
    }

    /// Occupied cells as `(x, y)` offsets, scanning rows top to bottom.
    pub fn cells(&self) -> ShapeCells {
        let mut out = ShapeCells::new();
        let n = self.size as usize;
        for y in 0..n {
            for x in 0..n {
                if self.cells[y][x] {
                    out.push((x as i8, y as i8));
                }
            }
        }
        out
    }

    /// The shape turned 90° clockwise.
    ///
    /// Row `y` of the result is column `y` of `self` read bottom to top.
    pub fn rotated_cw(&self) -> Shape {
        let n = self.size as usize;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in cells.iter_mut().enumerate().take(n) {
            for (x, cell) in row.iter_mut().enumerate().take(n) {
                *cell = self.cells[n - 1 - x][y];
            }
        }
        Shape {
            size: self.size,
            cells,
        }
    }
}

/// A catalog entry: piece kind, spawn-orientation shape, and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tetromino {
    kind: PieceKind,
    shape: Shape,
    color: Rgb,
}

impl Tetromino {
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn color(&self) -> Rgb {
        self.color
    }
}

/// The seven pieces, indexed by [`PieceKind::index`].
static CATALOG: [Tetromino; 7] = [
    Tetromino {
        kind: PieceKind::I,
        shape: Shape::from_rows([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
        color: Rgb::new(0x00, 0xFF, 0xFF), // cyan
    },
    Tetromino {
        kind: PieceKind::J,
        shape: Shape::from_rows([[1, 0, 0], [1, 1, 1], [0, 0, 0]]),
        color: Rgb::new(0x00, 0x00, 0xFF), // blue
    },
    Tetromino {
        kind: PieceKind::L,
        shape: Shape::from_rows([[0, 0, 1], [1, 1, 1], [0, 0, 0]]),
        color: Rgb::new(0xFF, 0x80, 0x00), // orange
    },
    Tetromino {
        kind: PieceKind::O,
        shape: Shape::from_rows([[1, 1], [1, 1]]),
        color: Rgb::new(0xFF, 0xFF, 0x00), // yellow
    },
    Tetromino {
        kind: PieceKind::S,
        shape: Shape::from_rows([[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
        color: Rgb::new(0x00, 0xFF, 0x00), // green
    },
    Tetromino {
        kind: PieceKind::T,
        shape: Shape::from_rows([[0, 1, 0], [1, 1, 1], [0, 0, 0]]),
        color: Rgb::new(0x80, 0x00, 0x80), // purple
    },
    Tetromino {
        kind: PieceKind::Z,
        shape: Shape::from_rows([[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
        color: Rgb::new(0xFF, 0x00, 0x00), // red
    },
];

/// All catalog entries
pub fn catalog() -> &'static [Tetromino; 7] {
    &CATALOG
}

/// Catalog entry for a piece kind
pub fn tetromino(kind: PieceKind) -> &'static Tetromino {
    &CATALOG[kind.index()]
}

/// Uniformly random catalog entry
pub fn random_tetromino(rng: &mut SimpleRng) -> &'static Tetromino {
    &CATALOG[rng.next_range(CATALOG.len() as u32) as usize]
}

//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or holds the color of the
//! piece that locked there. Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Rows above the board (y < 0) are legal piece positions but never stored.

use crate::piece::ActivePiece;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether (x, y) holds a color.
    ///
    /// `None` means the coordinates are outside the grid.
    pub fn is_occupied(&self, x: i8, y: i8) -> Option<bool> {
        self.get(x, y).map(|cell| cell.is_some())
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Remove row `y`, shift every row above it down by one, and empty the top row.
    fn remove_row(&mut self, y: usize) {
        let width = BOARD_WIDTH as usize;

        // copy_within handles the overlapping ranges
        self.cells.copy_within(0..y * width, width);

        for cell in &mut self.cells[..width] {
            *cell = None;
        }
    }

    /// Clear every complete row and return how many were removed.
    ///
    /// Rows are scanned bottom to top. After a row is removed the rows above
    /// slide down into the same index, so that index is examined again before
    /// moving up.
    pub fn clear_completed_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = BOARD_HEIGHT as usize;

        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.remove_row(row);
                cleared += 1;
                // Same row again: it now holds what used to be the row above.
                continue;
            }
            y -= 1;
        }

        cleared
    }

    /// Write the piece's color into every board cell it covers.
    ///
    /// Cells above the board (negative rows) are skipped.
    pub fn lock(&mut self, piece: &ActivePiece) {
        let color = piece.color();
        for (x, y) in piece.board_cells() {
            if y >= 0 {
                self.set(x, y, Some(color));
            }
        }
    }

    /// Iterate rows top to bottom as slices of `BOARD_WIDTH` cells
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(BOARD_WIDTH as usize)
    }

    /// Copy the grid into a fixed 2D array (used by snapshots).
    pub fn write_grid(&self, out: &mut [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Build a board from text rows, bottom-aligned.
    ///
    /// `#` is an occupied cell (filled with `color`), anything else is empty.
    /// Fewer than 20 rows fill the bottom of the board. Useful for scripted setups.
    pub fn from_ascii(rows: &[&str], color: crate::types::Rgb) -> Self {
        let mut board = Self::new();
        let height = BOARD_HEIGHT as usize;
        let offset = height.saturating_sub(rows.len());
        for (i, row) in rows.iter().take(height).enumerate() {
            let y = (offset + i) as i8;
            for (x, ch) in row.chars().take(BOARD_WIDTH as usize).enumerate() {
                if ch == '#' {
                    board.set(x as i8, y, Some(color));
                }
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn fill_row(board: &mut Board, y: i8, color: Rgb) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Some(color));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new();

        board.set(0, 0, Some(RED));
        board.set(5, 10, Some(BLUE));

        assert_eq!(board.get(0, 0), Some(Some(RED)));
        assert_eq!(board.get(5, 10), Some(Some(BLUE)));

        assert_eq!(board.cells[0], Some(RED));
        assert_eq!(board.cells[10 * 10 + 5], Some(BLUE));
    }

    #[test]
    fn test_is_occupied_out_of_bounds() {
        let mut board = Board::new();
        board.set(3, 4, Some(RED));
        assert_eq!(board.is_occupied(3, 4), Some(true));
        assert_eq!(board.is_occupied(4, 4), Some(false));
        assert_eq!(board.is_occupied(-1, 4), None);
        assert_eq!(board.is_occupied(3, 20), None);
    }

    #[test]
    fn test_remove_row_shifts_down() {
        let mut board = Board::new();
        board.set(2, 17, Some(BLUE));
        fill_row(&mut board, 18, RED);

        board.remove_row(18);

        assert_eq!(board.get(2, 18), Some(Some(BLUE)));
        assert_eq!(board.get(2, 17), Some(None));
        assert!(board.rows().next().unwrap().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_clear_adjacent_rows_rechecks_same_index() {
        let mut board = Board::new();
        fill_row(&mut board, 19, RED);
        fill_row(&mut board, 18, BLUE);
        board.set(0, 17, Some(RED));

        assert_eq!(board.clear_completed_rows(), 2);
        assert_eq!(board.get(0, 19), Some(Some(RED)));
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn test_clear_whole_board() {
        let mut board = Board::new();
        for y in 0..BOARD_HEIGHT as i8 {
            fill_row(&mut board, y, RED);
        }
        assert_eq!(board.clear_completed_rows(), BOARD_HEIGHT as u32);
        assert_eq!(board.filled_count(), 0);
    }

    #[test]
    fn test_from_ascii_bottom_aligned() {
        let board = Board::from_ascii(&["#.........", "##########"], RED);
        assert_eq!(board.get(0, 18), Some(Some(RED)));
        assert_eq!(board.get(1, 18), Some(None));
        assert!(board.is_row_full(19));
        assert_eq!(board.filled_count(), 11);
    }

    #[test]
    fn test_write_grid_matches_cells() {
        let mut board = Board::new();
        board.set(7, 12, Some(BLUE));
        let mut grid = [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        board.write_grid(&mut grid);
        assert_eq!(grid[12][7], Some(BLUE));
        assert_eq!(grid[0][0], None);
    }
}

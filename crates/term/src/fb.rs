//! Character-cell framebuffer the game view paints into.
//!
//! Cells are stored row-major. Writes outside the buffer are clipped, so
//! drawing code never has to bounds-check a small terminal.

use std::ops::Range;

pub use crate::types::Rgb;

/// Colors and attributes of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl CellStyle {
    /// Light grey on black, no attributes.
    pub const PLAIN: CellStyle = CellStyle {
        fg: Rgb::new(220, 220, 220),
        bg: Rgb::new(0, 0, 0),
        bold: false,
        dim: false,
    };

    /// Halve both colors and set the dim attribute.
    pub fn dimmed(self) -> CellStyle {
        let half = |c: Rgb| Rgb::new(c.r / 2, c.g / 2, c.b / 2);
        CellStyle {
            fg: half(self.fg),
            bg: half(self.bg),
            dim: true,
            ..self
        }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::PLAIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Cell {
    pub const BLANK: Cell = Cell::new(' ', CellStyle::PLAIN);

    pub const fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Change dimensions. A resized buffer is blank; the allocation is reused.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (self.width, self.height) == (width, height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(width as usize * height as usize, Cell::BLANK);
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of cells, left to right.
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        let span = self.span(y, 0..self.width)?;
        Some(&self.cells[span])
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        let span = self.span(y, x..x.saturating_add(1))?;
        self.cells.get(span.start).copied()
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(span) = self.span(y, x..x.saturating_add(1)) {
            self.cells[span.start] = cell;
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        self.set(x, y, Cell::new(ch, style));
    }

    /// Write a string left to right; characters past the right edge are dropped.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) {
        for (cx, ch) in (x..self.width).zip(s.chars()) {
            self.put_char(cx, y, ch, style);
        }
    }

    /// Write a decimal number without allocating.
    pub fn put_u32(&mut self, x: u16, y: u16, value: u32, style: CellStyle) {
        let mut digits = [b'0'; 10];
        let mut start = digits.len();
        let mut n = value;
        loop {
            start -= 1;
            digits[start] += (n % 10) as u8;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        for (cx, &d) in (x..self.width).zip(&digits[start..]) {
            self.put_char(cx, y, d as char, style);
        }
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: CellStyle) {
        let cell = Cell::new(ch, style);
        self.each_in_rect(x, y, w, h, |c| *c = cell);
    }

    /// Dim everything inside a rectangle, keeping its characters.
    pub fn dim_rect(&mut self, x: u16, y: u16, w: u16, h: u16) {
        self.each_in_rect(x, y, w, h, |c| c.style = c.style.dimmed());
    }

    /// Index range of columns `cols` on row `y`, clipped to the buffer.
    fn span(&self, y: u16, cols: Range<u16>) -> Option<Range<usize>> {
        if y >= self.height || cols.start >= self.width {
            return None;
        }
        let base = y as usize * self.width as usize;
        let end = cols.end.min(self.width);
        Some(base + cols.start as usize..base + end as usize)
    }

    fn each_in_rect(&mut self, x: u16, y: u16, w: u16, h: u16, mut f: impl FnMut(&mut Cell)) {
        let bottom = y.saturating_add(h).min(self.height);
        for row in y..bottom {
            if let Some(span) = self.span(row, x..x.saturating_add(w)) {
                self.cells[span].iter_mut().for_each(&mut f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(fb: &FrameBuffer, y: u16) -> String {
        fb.row(y)
            .map(|cells| cells.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(1, 0, "SCORE", CellStyle::default());
        assert_eq!(row_text(&fb, 0), " SCO");
    }

    #[test]
    fn put_u32_writes_digits() {
        let mut fb = FrameBuffer::new(12, 2);
        fb.put_u32(0, 0, 1200, CellStyle::default());
        fb.put_u32(0, 1, 0, CellStyle::default());
        assert_eq!(row_text(&fb, 0).trim_end(), "1200");
        assert_eq!(row_text(&fb, 1).trim_end(), "0");

        let mut wide = FrameBuffer::new(12, 1);
        wide.put_u32(0, 0, u32::MAX, CellStyle::default());
        assert_eq!(row_text(&wide, 0).trim_end(), "4294967295");

        let mut narrow = FrameBuffer::new(3, 1);
        narrow.put_u32(1, 0, 987, CellStyle::default());
        assert_eq!(row_text(&narrow, 0), " 98");
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_char(5, 5, 'X', CellStyle::default());
        fb.put_char(2, 0, 'X', CellStyle::default());
        fb.fill_rect(1, 1, 9, 9, '#', CellStyle::default());
        assert_eq!(fb.get(5, 5), None);
        assert_eq!(fb.row(2), None);
        assert_eq!(row_text(&fb, 0), "  ");
        assert_eq!(row_text(&fb, 1), " #");
    }

    #[test]
    fn dim_rect_keeps_characters() {
        let mut fb = FrameBuffer::new(3, 1);
        let style = CellStyle {
            fg: Rgb::new(200, 100, 50),
            ..CellStyle::default()
        };
        fb.put_str(0, 0, "abc", style);
        fb.dim_rect(1, 0, 5, 1);

        assert_eq!(row_text(&fb, 0), "abc");
        assert!(!fb.get(0, 0).unwrap().style.dim);
        let dimmed = fb.get(1, 0).unwrap().style;
        assert!(dimmed.dim);
        assert_eq!(dimmed.fg, Rgb::new(100, 50, 25));
    }

    #[test]
    fn resize_blanks_and_changes_dimensions() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_str(0, 0, "ab", CellStyle::default());
        fb.resize(5, 3);
        assert_eq!((fb.width(), fb.height()), (5, 3));
        assert_eq!(fb.cells().len(), 15);
        assert!(fb.cells().iter().all(|c| *c == Cell::BLANK));
    }
}

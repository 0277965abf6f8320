//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! Pure (no I/O), so everything here is unit-tested against framebuffer contents.
//!
//! Layout, left to right: the bordered well (each board cell two columns wide,
//! centered in the viewport) and a side panel with SCORE, LEVEL, LINES and a
//! NEXT preview. Paused and GameOver dim the well and print centered text.

use crate::core::catalog::MAX_SHAPE_SIZE;
use crate::core::{GameSnapshot, Tetromino};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

pub const PAUSED_TEXT: &str = "PAUSED";
pub const GAME_OVER_TEXT: &str = "GAME OVER";
pub const RESTART_HINT: &str = "Press R to play again";

const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const BLOCK: char = '█';

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Where the well landed inside the viewport for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellRect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

/// A lightweight terminal renderer for the Tetris game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 roughly squares the cells with common terminal glyph ratios.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Bordered well position for a viewport
    pub fn well_rect(&self, viewport: Viewport) -> WellRect {
        let w = (BOARD_WIDTH as u16) * self.cell_w + 2;
        let h = (BOARD_HEIGHT as u16) * self.cell_h + 2;
        let x = viewport.width.saturating_sub(w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        WellRect { x, y, w, h }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::BLANK);

        let well = self.well_rect(viewport);
        let border = CellStyle {
            fg: Rgb::new(200, 200, 200),
            ..CellStyle::default()
        };
        fb.fill_rect(
            well.x + 1,
            well.y + 1,
            well.w - 2,
            well.h - 2,
            ' ',
            CellStyle {
                bg: WELL_BG,
                ..CellStyle::default()
            },
        );
        draw_border(fb, well, border);

        // Locked cells.
        for (y, row) in snap.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                match cell {
                    Some(color) => self.draw_block(fb, well, x as u16, y as u16, *color),
                    None => self.draw_empty_cell(fb, well, x as u16, y as u16),
                }
            }
        }

        // Active piece; rows above the board are not drawn.
        if let Some(active) = snap.active {
            for (x, y) in active.board_cells() {
                if x >= 0 && x < BOARD_WIDTH as i8 && y >= 0 && y < BOARD_HEIGHT as i8 {
                    self.draw_block(fb, well, x as u16, y as u16, active.color());
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, well);

        if snap.paused() {
            fb.dim_rect(well.x + 1, well.y + 1, well.w - 2, well.h - 2);
            draw_centered(fb, well, well.y + well.h / 2, PAUSED_TEXT);
        } else if snap.game_over() {
            fb.dim_rect(well.x + 1, well.y + 1, well.w - 2, well.h - 2);
            let mid = well.y + well.h / 2;
            draw_centered(fb, well, mid.saturating_sub(1), GAME_OVER_TEXT);
            draw_centered(fb, well, mid + 1, RESTART_HINT);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn cell_origin(&self, well: WellRect, x: u16, y: u16) -> (u16, u16) {
        (well.x + 1 + x * self.cell_w, well.y + 1 + y * self.cell_h)
    }

    fn draw_block(&self, fb: &mut FrameBuffer, well: WellRect, x: u16, y: u16, color: Rgb) {
        let (px, py) = self.cell_origin(well, x, y);
        let style = CellStyle {
            fg: color,
            bg: WELL_BG,
            bold: true,
            dim: false,
        };
        fb.fill_rect(px, py, self.cell_w, self.cell_h, BLOCK, style);
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, well: WellRect, x: u16, y: u16) {
        let (px, py) = self.cell_origin(well, x, y);
        let style = CellStyle {
            fg: Rgb::new(90, 90, 100),
            bg: WELL_BG,
            bold: false,
            dim: true,
        };
        fb.fill_rect(px, py, self.cell_w, self.cell_h, '·', style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        well: WellRect,
    ) {
        let panel_x = well.x.saturating_add(well.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle {
            fg: Rgb::new(200, 200, 200),
            ..CellStyle::default()
        };

        let mut y = well.y;
        for (name, number) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), number, value);
            y = y.saturating_add(3);
        }

        // Label, blank row, then the preview.
        fb.put_str(panel_x, y, "NEXT", label);
        self.draw_preview(fb, &snap.next, panel_x, y.saturating_add(2));
    }

    /// Draw the lookahead piece's spawn shape, trimmed to its filled rows.
    fn draw_preview(&self, fb: &mut FrameBuffer, next: &Tetromino, x: u16, y: u16) {
        let shape = next.shape();
        let style = CellStyle {
            fg: next.color(),
            bold: true,
            ..CellStyle::default()
        };

        let first_row = (0..MAX_SHAPE_SIZE)
            .find(|&row| (0..MAX_SHAPE_SIZE).any(|col| shape.filled(col, row)))
            .unwrap_or(0);
        for (lx, ly) in shape.cells() {
            let px = x + (lx as u16) * self.cell_w;
            let py = y + (ly as u16 - first_row as u16) * self.cell_h;
            fb.fill_rect(px, py, self.cell_w, self.cell_h, BLOCK, style);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, r: WellRect, style: CellStyle) {
    if r.w < 2 || r.h < 2 {
        return;
    }

    fb.put_char(r.x, r.y, '┌', style);
    fb.put_char(r.x + r.w - 1, r.y, '┐', style);
    fb.put_char(r.x, r.y + r.h - 1, '└', style);
    fb.put_char(r.x + r.w - 1, r.y + r.h - 1, '┘', style);

    for dx in 1..r.w - 1 {
        fb.put_char(r.x + dx, r.y, '─', style);
        fb.put_char(r.x + dx, r.y + r.h - 1, '─', style);
    }
    for dy in 1..r.h - 1 {
        fb.put_char(r.x, r.y + dy, '│', style);
        fb.put_char(r.x + r.w - 1, r.y + dy, '│', style);
    }
}

/// Text centered on the well's horizontal midpoint.
fn draw_centered(fb: &mut FrameBuffer, well: WellRect, y: u16, text: &str) {
    let text_w = text.chars().count() as u16;
    let x = (well.x + well.w / 2).saturating_sub(text_w / 2);
    let style = CellStyle {
        fg: Rgb::new(255, 255, 255),
        bg: Rgb::new(0, 0, 0),
        bold: true,
        dim: false,
    };
    fb.put_str(x, y, text, style);
}

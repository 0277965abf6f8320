//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! The first frame (and the first after a resize or [`TerminalRenderer::invalidate`])
//! is a full redraw. Every later frame only emits the runs of cells that changed.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Colors, Print, ResetColor, SetAttribute, SetColors},
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    active: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Render into any byte sink; `enter`/`exit` still drive the real terminal mode.
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            last: None,
            buf: Vec::with_capacity(64 * 1024),
            active: false,
        }
    }

    /// Switch to raw mode and the alternate screen, hiding the cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        self.last = None;
        Ok(())
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        // Leave raw mode even if the escape sequences could not be written.
        let flushed = self.flush_buf();
        terminal::disable_raw_mode()?;
        flushed
    }

    /// Force the next draw to be a full redraw (e.g. after a terminal resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a framebuffer and keep it as the base for the next diff.
    ///
    /// `fb` comes back holding a spare buffer (the frame drawn before this
    /// one, or a blank one). `GameView::render_into` resizes and repaints it.
    /// A failed write leaves no base, so the next frame is a full redraw.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let stale = self.last.take();
        match &stale {
            Some(prev) if (prev.width(), prev.height()) == (fb.width(), fb.height()) => {
                encode_diff_into(prev, fb, &mut self.buf)?
            }
            _ => encode_full_into(fb, &mut self.buf)?,
        }
        self.flush_buf()?;

        let spare = stale.unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
        self.last = Some(std::mem::replace(fb, spare));
        Ok(())
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalRenderer<W> {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut writer = CellWriter::new(out);
    for y in 0..fb.height() {
        if let Some(row) = fb.row(y) {
            writer.run(0, y, row)?;
        }
    }
    writer.finish()
}

/// Encode only the changed runs between two equally sized frames into `out`.
///
/// Identical frames encode to nothing.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut writer = CellWriter::new(out);
    for_each_changed_run(prev, next, |x, y, cells| writer.run(x, y, cells))?;
    writer.finish()
}

/// Queues positioned runs of cells, emitting style escapes only when the
/// style differs from the last cell written.
struct CellWriter<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> CellWriter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn run(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
        self.out.queue(cursor::MoveTo(x, y))?;
        for cell in cells {
            if self.style != Some(cell.style) {
                self.set_style(cell.style)?;
            }
            self.out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    fn set_style(&mut self, style: CellStyle) -> Result<()> {
        // SGR reset also drops colors, so it has to precede them.
        self.out.queue(SetAttribute(Attribute::Reset))?;
        if style.bold {
            self.out.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            self.out.queue(SetAttribute(Attribute::Dim))?;
        }
        self.out
            .queue(SetColors(Colors::new(rgb_to_color(style.fg), rgb_to_color(style.bg))))?;
        self.style = Some(style);
        Ok(())
    }

    /// Leave the terminal in its default style if anything was styled.
    fn finish(self) -> Result<()> {
        if self.style.is_some() {
            self.out.queue(SetAttribute(Attribute::Reset))?;
            self.out.queue(ResetColor)?;
        }
        Ok(())
    }
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Call `f(x, y, cells)` for every horizontal run of cells in `next` that
/// differ from `prev`. Rows whose width or presence differ are one whole run.
fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, &[Cell]) -> Result<()>,
) -> Result<()> {
    for y in 0..next.height() {
        let Some(new) = next.row(y) else { continue };
        let Some(old) = prev.row(y).filter(|old| old.len() == new.len()) else {
            f(0, y, new)?;
            continue;
        };

        let differs = |i: usize| old[i] != new[i];
        let mut x = 0;
        while let Some(offset) = (x..new.len()).position(differs) {
            let start = x + offset;
            let len = (start..new.len()).take_while(|&i| differs(i)).count();
            f(start as u16, y, &new[start..start + len])?;
            x = start + len;
        }
    }
    Ok(())
}

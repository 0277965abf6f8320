//! Terminal game renderer.
//!
//! A small, game-oriented rendering layer: [`GameView`] draws a
//! [`core::GameSnapshot`](crate::core::GameSnapshot) into a [`FrameBuffer`], and
//! [`TerminalRenderer`] flushes framebuffers to the terminal, diffing against the
//! previous frame. No widget toolkit is involved, which keeps full control over
//! the cell aspect ratio (two columns per board cell).

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use classic_tetris_core as core;
pub use classic_tetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport, WellRect};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};

//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]s plus a
//! separate quit check. The mapping is fixed; there is no key repeat logic
//! beyond what the terminal itself sends.

pub mod map;

pub use classic_tetris_types as types;

pub use map::{handle_key_event, should_quit};

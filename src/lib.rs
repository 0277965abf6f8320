//! Classic Tetris (workspace facade crate).
//!
//! The game itself lives in dedicated crates under `crates/`; this package
//! re-exports them as `classic_tetris::{core,input,term,types}` and adds the
//! runner's environment config and JSON-lines event log.

pub mod config;
pub mod event_log;

pub use classic_tetris_core as core;
pub use classic_tetris_input as input;
pub use classic_tetris_term as term;
pub use classic_tetris_types as types;

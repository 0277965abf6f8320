//! Runtime configuration read from the environment.
//!
//! | Variable          | Meaning                       | Default                 |
//! |-------------------|-------------------------------|-------------------------|
//! | `TETRIS_SEED`     | RNG seed (u32)                | derived from the time   |
//! | `TETRIS_TICK_MS`  | tick period in ms (1..=1000)  | 16                      |
//! | `TETRIS_LOG_PATH` | JSON-lines event log path     | unset (logging off)     |
//!
//! Values that do not parse or are out of range fall back to the default.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::TICK_MS;

pub const ENV_SEED: &str = "TETRIS_SEED";
pub const ENV_TICK_MS: &str = "TETRIS_TICK_MS";
pub const ENV_LOG_PATH: &str = "TETRIS_LOG_PATH";

const TICK_MS_RANGE: std::ops::RangeInclusive<u32> = 1..=1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Fixed seed, or `None` to derive one from the clock at startup.
    pub seed: Option<u32>,
    pub tick_ms: u32,
    pub log_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_ms: TICK_MS,
            log_path: None,
        }
    }
}

impl GameConfig {
    /// Create from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup (the environment, a map in tests, ...)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup(ENV_SEED).and_then(|s| s.trim().parse::<u32>().ok());

        let tick_ms = lookup(ENV_TICK_MS)
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|ms| TICK_MS_RANGE.contains(ms))
            .unwrap_or(TICK_MS);

        let log_path = lookup(ENV_LOG_PATH)
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) })
            .map(PathBuf::from);

        Self {
            seed,
            tick_ms,
            log_path,
        }
    }

    /// The configured seed, or one derived from the system time.
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(time_seed)
    }
}

fn time_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    (nanos ^ (nanos >> 32)) as u32
}

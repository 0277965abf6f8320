//! Scoring module - classic line-clear scoring, levels and gravity speed
//!
//! - Line clears pay `LINE_SCORES[rows] * level`.
//! - Level starts at 1 and goes up every 10 lines.
//! - Gravity starts at 1000ms per row and speeds up 50ms per level, floored at 100ms.
//! - Soft drop pays 1 point per manual step, hard drop 2 points per row.

use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_MIN_MS, DROP_STEP_MS, HARD_DROP_POINTS_PER_ROW, LINES_PER_LEVEL,
    LINE_SCORES, SOFT_DROP_POINTS,
};

/// Calculate line clear score
/// rows: rows cleared by one lock (1-4; more pays the 4-row reward)
/// level: current level (1-based)
pub fn calculate_line_score(rows: u32, level: u32) -> u32 {
    if rows == 0 {
        return 0;
    }
    let idx = rows.min(4) as usize;
    LINE_SCORES[idx].saturating_mul(level)
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        cells * HARD_DROP_POINTS_PER_ROW
    } else {
        cells * SOFT_DROP_POINTS
    }
}

/// Level for a total line count (starts at 1)
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity interval in milliseconds for a level
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    BASE_DROP_MS
        .saturating_sub(speedup)
        .max(DROP_INTERVAL_MIN_MS)
}

/// Outcome of feeding one lock's cleared rows into the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearResult {
    pub points: u32,
    pub level_before: u32,
    pub level_after: u32,
}

impl ClearResult {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// Score, lines and level of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreKeeper {
    score: u32,
    lines: u32,
    level: u32,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self {
            score: 0,
            lines: 0,
            level: 1,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Current gravity interval
    pub fn drop_interval_ms(&self) -> u32 {
        get_drop_interval_ms(self.level)
    }

    /// Apply rows cleared by one lock.
    ///
    /// Points use the level in effect before the clear; the level is then
    /// recomputed from the new line total.
    pub fn record_clear(&mut self, rows: u32) -> ClearResult {
        let level_before = self.level;
        if rows == 0 {
            return ClearResult {
                points: 0,
                level_before,
                level_after: level_before,
            };
        }

        let points = calculate_line_score(rows, self.level);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(rows);
        self.level = calculate_level(self.lines);

        ClearResult {
            points,
            level_before,
            level_after: self.level,
        }
    }

    /// Apply drop points (manual soft drop or hard drop)
    pub fn record_drop(&mut self, cells: u32, is_hard_drop: bool) -> u32 {
        let points = calculate_drop_score(cells, is_hard_drop);
        self.score = self.score.saturating_add(points);
        points
    }
}

impl Default for ScoreKeeper {
    fn default() -> Self {
        Self::new()
    }
}

//! JSON-lines event log.
//!
//! One JSON object per line, tagged by `"type"` and stamped with `tMs`
//! (milliseconds since the session clock started):
//!
//! ```text
//! {"type":"sessionStart","tMs":0,"seed":42,"tickMs":16}
//! {"type":"pieceLocked","tMs":1520,"kind":"T","x":3,"y":18}
//! {"type":"linesCleared","tMs":1520,"rows":1,"points":40,"totalLines":1}
//! ```
//!
//! The log never interrupts play. The first write failure is kept, logging is
//! switched off, and the runner reports the error once the terminal is restored.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::types::CoreEvent;

/// One line of the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LogRecord {
    SessionStart {
        t_ms: u64,
        seed: u32,
        tick_ms: u32,
    },
    PieceLocked {
        t_ms: u64,
        kind: &'static str,
        x: i8,
        y: i8,
    },
    LinesCleared {
        t_ms: u64,
        rows: u32,
        points: u32,
        total_lines: u32,
    },
    LevelUp {
        t_ms: u64,
        level: u32,
        drop_interval_ms: u32,
    },
    Paused {
        t_ms: u64,
    },
    Resumed {
        t_ms: u64,
    },
    GameOver {
        t_ms: u64,
        score: u32,
        lines: u32,
        level: u32,
    },
    Restarted {
        t_ms: u64,
    },
}

impl LogRecord {
    pub fn from_event(t_ms: u64, event: &CoreEvent) -> Self {
        match *event {
            CoreEvent::PieceLocked { kind, x, y } => LogRecord::PieceLocked {
                t_ms,
                kind: kind.letter(),
                x,
                y,
            },
            CoreEvent::LinesCleared {
                rows,
                points,
                total_lines,
            } => LogRecord::LinesCleared {
                t_ms,
                rows,
                points,
                total_lines,
            },
            CoreEvent::LevelUp {
                level,
                drop_interval_ms,
            } => LogRecord::LevelUp {
                t_ms,
                level,
                drop_interval_ms,
            },
            CoreEvent::Paused => LogRecord::Paused { t_ms },
            CoreEvent::Resumed => LogRecord::Resumed { t_ms },
            CoreEvent::GameOver {
                score,
                lines,
                level,
            } => LogRecord::GameOver {
                t_ms,
                score,
                lines,
                level,
            },
            CoreEvent::Restarted => LogRecord::Restarted { t_ms },
        }
    }
}

/// Append-only JSON-lines sink; a disabled log accepts and drops everything.
pub struct EventLog<W: Write = BufWriter<File>> {
    out: Option<W>,
    buf: Vec<u8>,
    error: Option<anyhow::Error>,
}

impl EventLog<BufWriter<File>> {
    /// Open (or create) `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening event log {}", path.display()))?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    pub fn disabled() -> Self {
        Self {
            out: None,
            buf: Vec::new(),
            error: None,
        }
    }
}

impl<W: Write> EventLog<W> {
    pub fn from_writer(out: W) -> Self {
        Self {
            out: Some(out),
            buf: Vec::with_capacity(256),
            error: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.out.is_some()
    }

    pub fn session_start(&mut self, t_ms: u64, seed: u32, tick_ms: u32) {
        self.write_record(&LogRecord::SessionStart {
            t_ms,
            seed,
            tick_ms,
        });
    }

    pub fn record(&mut self, t_ms: u64, event: &CoreEvent) {
        self.write_record(&LogRecord::from_event(t_ms, event));
    }

    pub fn write_record(&mut self, record: &LogRecord) {
        let Some(out) = self.out.as_mut() else {
            return;
        };

        self.buf.clear();
        let written = serde_json::to_writer(&mut self.buf, record)
            .context("encoding event log record")
            .and_then(|()| {
                self.buf.push(b'\n');
                out.write_all(&self.buf).context("writing event log")
            });

        if let Err(err) = written {
            self.error = Some(err);
            self.out = None;
        }
    }

    /// Flush, close the log and hand back the first failure, if any.
    pub fn finish(&mut self) -> Option<anyhow::Error> {
        if let Some(mut out) = self.out.take() {
            if let Err(err) = out.flush() {
                self.error.get_or_insert(anyhow::Error::new(err).context("flushing event log"));
            }
        }
        self.error.take()
    }

    /// The underlying writer, while logging is still enabled.
    pub fn writer(&self) -> Option<&W> {
        self.out.as_ref()
    }
}

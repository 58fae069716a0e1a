/// Flat-file high-score table.
///
/// One record per line, `<name> <score> <seconds>`.  Names may contain
/// spaces, so a line is split on its two rightmost spaces.  The table is kept
/// sorted by descending score, ties broken by the faster time, and holds at
/// most [`MAX_ENTRIES`] records.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{GameError, Result};

pub const MAX_ENTRIES: usize = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    /// Whole seconds; fractions are truncated when a run is recorded.
    pub time_secs: u32,
}

impl HighScoreEntry {
    pub fn new(name: impl Into<String>, score: u32, time_secs: f32) -> Self {
        Self {
            name: name.into(),
            score,
            time_secs: time_secs.max(0.0) as u32,
        }
    }

    /// Parse one `<name> <score> <seconds>` line.
    pub fn parse_line(line: &str) -> Result<Self> {
        let invalid = || GameError::InvalidState(format!("malformed high-score line: {line:?}"));

        let line = line.trim_end();
        let (rest, time) = line.rsplit_once(' ').ok_or_else(invalid)?;
        let (name, score) = rest.rsplit_once(' ').ok_or_else(invalid)?;
        if name.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            name: name.to_string(),
            score: score.parse().map_err(|_| invalid())?,
            time_secs: time.parse().map_err(|_| invalid())?,
        })
    }

    /// True when `self` ranks above `other`.
    fn outranks(&self, other: &HighScoreEntry) -> bool {
        self.score > other.score || (self.score == other.score && self.time_secs < other.time_secs)
    }
}

impl fmt::Display for HighScoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.score, self.time_secs)
    }
}

/// `mm:ss`, minutes capped at 99.
pub fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    let minutes = (total / 60).min(99);
    format!("{:02}:{:02}", minutes, total % 60)
}

// ── Table ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighScoreTable {
    entries: Vec<HighScoreEntry>,
}

impl HighScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse file contents, skipping lines that do not parse.  Records keep
    /// their file order.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|line| match HighScoreEntry::parse_line(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::debug!("skipping high-score line: {e}");
                    None
                }
            })
            .take(MAX_ENTRIES)
            .collect();
        Self { entries }
    }

    /// Insert in rank order and drop whatever falls past the cap.  Returns
    /// the 0-based rank, or `None` when the entry did not make the table.
    pub fn insert(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| entry.outranks(e))
            .unwrap_or(self.entries.len());
        if rank >= MAX_ENTRIES {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_text(&self) -> String {
        self.entries.iter().map(|e| format!("{e}\n")).collect()
    }
}

// ── File store ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table.  A file that does not exist yet is an empty table.
    pub fn load(&self) -> Result<HighScoreTable> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(HighScoreTable::parse(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("no high-score file at {}; starting empty", self.path.display());
                Ok(HighScoreTable::new())
            }
            Err(e) => Err(GameError::resource_load(&self.path, e)),
        }
    }

    /// Read, insert and write back.  Returns the entry's rank.
    pub fn save(&self, entry: HighScoreEntry) -> Result<Option<usize>> {
        let mut table = self.load()?;
        let summary = entry.to_string();
        let rank = table.insert(entry);
        fs::write(&self.path, table.to_text())?;
        match rank {
            Some(r) => log::info!("saved high score \"{summary}\" at rank {}", r + 1),
            None => log::info!("score \"{summary}\" did not make the table"),
        }
        Ok(rank)
    }
}

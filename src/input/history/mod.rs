mod file_ops;

use std::{collections::VecDeque, fmt, io, path::PathBuf};

use log::warn;

use self::file_ops::FileOps;

#[derive(Debug)]
pub enum HistoryError {
    Io(io::Error),
}

impl From<io::Error> for HistoryError {
    fn from(e: io::Error) -> Self {
        HistoryError::Io(e)
    }
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Io(e) => write!(f, "history file error: {}", e),
        }
    }
}

impl std::error::Error for HistoryError {}

/// Bounded list of submitted lines in insertion order.
///
/// Once `max_entries` is exceeded the oldest line is evicted. When backed by
/// a file, new lines are appended; the file is rewritten only after an
/// eviction or a clear.
pub struct History {
    entries: VecDeque<String>,
    file_ops: Option<FileOps>,
    max_entries: usize,
}

impl History {
    pub fn new(max_entries: usize) -> Self {
        History {
            entries: VecDeque::new(),
            file_ops: None,
            max_entries: max_entries.max(1),
        }
    }

    /// Loads `history_file`, starting empty if it is missing or unreadable.
    pub fn with_file(history_file: PathBuf, max_entries: usize) -> Self {
        let file_ops = FileOps::new(history_file);
        let entries = file_ops.load_entries(max_entries).unwrap_or_else(|e| {
            warn!("starting with empty history ({}): {}", file_ops.path().display(), e);
            VecDeque::new()
        });

        History {
            entries,
            file_ops: Some(file_ops),
            max_entries: max_entries.max(1),
        }
    }

    /// Appends `entry`. Blank lines are ignored. The in-memory list is
    /// updated even when persisting fails.
    pub fn add(&mut self, entry: &str) -> Result<(), HistoryError> {
        if entry.trim().is_empty() {
            return Ok(());
        }

        self.entries.push_back(entry.to_owned());
        if self.trim_entries() {
            return self.persist();
        }
        match &self.file_ops {
            Some(file_ops) => file_ops.append_entry(entry),
            None => Ok(()),
        }
    }

    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.entries.clear();
        self.persist()
    }

    /// Entry `offset` positions back from the newest (0 = newest).
    pub fn from_newest(&self, offset: usize) -> Option<&str> {
        let index = self.entries.len().checked_sub(offset + 1)?;
        self.entries.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn search_contains(&self, needle: &str) -> Vec<&str> {
        self.entries().filter(|e| e.contains(needle)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// True when anything was evicted.
    fn trim_entries(&mut self) -> bool {
        let before = self.entries.len();
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
        self.entries.len() != before
    }

    fn persist(&self) -> Result<(), HistoryError> {
        match &self.file_ops {
            Some(file_ops) => file_ops.write_all(&self.entries),
            None => Ok(()),
        }
    }
}

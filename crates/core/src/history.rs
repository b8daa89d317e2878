//! Command line history.
//!
//! Entries are kept in memory, bounded in length, and can be persisted as a
//! plain text file holding one entry per line.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};

/// Default number of entries to keep.
pub const DEFAULT_HISTORY_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<String>,
    max_len: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

impl History {
    #[must_use]
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_len,
        }
    }

    /// Appends an entry.
    ///
    /// Blank lines and repeats of the newest entry are ignored. The oldest
    /// entries are dropped once the history is full.
    pub fn add(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || self.max_len == 0 {
            return;
        }

        if self.entries.back().is_some_and(|last| last == line) {
            return;
        }

        if self.entries.len() == self.max_len {
            self.entries.pop_front();
        }
        self.entries.push_back(line.to_string());
    }

    /// Changes the bound, dropping the oldest entries if needed.
    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = max_len;
        while self.entries.len() > max_len {
            self.entries.pop_front();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry `index`, oldest first.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Reads a history file.
    ///
    /// A file that does not exist yet gives an empty history.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(path: &str, max_len: usize) -> Result<Self> {
        let mut history = Self::new(max_len);

        if !Path::exists(Path::new(path)) {
            debug!("No history file at `{path}`");
            return Ok(history);
        }

        let file = File::open(path)
            .map_err(|e| Error::io_error("history".to_string(), path.to_string(), e))?;

        for line in BufReader::new(file).lines() {
            let line =
                line.map_err(|e| Error::io_error("history".to_string(), path.to_string(), e))?;
            history.add(&line);
        }

        info!("Loaded {} history entries from `{path}`", history.len());
        Ok(history)
    }

    /// Writes the history to a file, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save(&self, path: &str) -> Result<()> {
        let to_error = |e| Error::io_error("history".to_string(), path.to_string(), e);

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(to_error)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path).map_err(to_error)?);
        for entry in &self.entries {
            writeln!(writer, "{entry}").map_err(to_error)?;
        }
        writer.flush().map_err(to_error)?;

        info!("Saved {} history entries to `{path}`", self.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_add_skips_blank_and_repeats() {
        let mut history = History::new(10);
        history.add("show system");
        history.add("   ");
        history.add("show system");
        history.add("show version");
        history.add("show system");

        let entries: Vec<&str> = history.iter().collect();
        assert_eq!(entries, vec!["show system", "show version", "show system"]);
    }

    #[test]
    fn test_bounded() {
        let mut history = History::new(2);
        history.add("one");
        history.add("two");
        history.add("three");

        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0), Some("two"));
        assert_eq!(history.get(1), Some("three"));

        history.set_max_len(1);
        assert_eq!(history.get(0), Some("three"));
    }

    #[test]
    fn test_zero_length_keeps_nothing() {
        let mut history = History::new(0);
        history.add("one");
        assert!(history.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("history");
        let path = path.to_str().unwrap();

        let mut history = History::new(10);
        history.add("enable");
        history.add("configure terminal");
        history.save(path).unwrap();

        let loaded = History::load(path, 10).unwrap();
        assert_eq!(loaded, history);
    }

    #[test]
    fn test_load_applies_bound() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history");
        std::fs::write(&path, "a\nb\nc\n").unwrap();

        let loaded = History::load(path.to_str().unwrap(), 2).unwrap();
        let entries: Vec<&str> = loaded.iter().collect();
        assert_eq!(entries, vec!["b", "c"]);
    }

    #[test]
    fn test_load_missing_file() {
        let history = History::load("/this/path/does/not/exist", 10).unwrap();
        assert!(history.is_empty());
    }
}

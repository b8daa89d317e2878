//! The line editing collaborator.
//!
//! A shell loop only ever reads whole lines and records history. Completion
//! and contextual help flow the other way: the editor calls back into the
//! shell through [`Assist`] while the user is still typing.

use std::io::{self, BufRead, Write};

use log::debug;

use crate::error::Result;
use crate::history::History;

/// Hooks an editor can use while a line is being typed.
pub trait Assist {
    /// Candidate words for `word`, the word being typed at the end of `line`.
    fn complete(&self, line: &str, word: &str) -> Vec<String>;

    /// Writes contextual help for the partial `line`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    fn describe(&self, line: &str, out: &mut dyn Write) -> io::Result<()>;
}

pub trait LineEditor {
    /// Reads the next line, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    fn read_line(&mut self, prompt: &str, assist: &dyn Assist) -> Result<Option<String>>;

    fn add_history(&mut self, line: &str);
}

/// Line editor over any buffered reader, for piped input and scripts.
///
/// There is no interactive editing, so the [`Assist`] hooks go unused; a
/// trailing `?` is handled by the shell loop instead.
pub struct ReaderEditor<R> {
    reader: R,
    history: History,
}

impl<R: BufRead> ReaderEditor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            history: History::default(),
        }
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }
}

impl<R: BufRead> LineEditor for ReaderEditor<R> {
    fn read_line(&mut self, prompt: &str, _assist: &dyn Assist) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            debug!("End of input at prompt `{prompt}`");
            return Ok(None);
        }

        let line = line.trim_end_matches(['\r', '\n']).to_string();
        Ok(Some(line))
    }

    fn add_history(&mut self, line: &str) {
        self.history.add(line);
    }
}

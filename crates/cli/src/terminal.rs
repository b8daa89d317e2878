//! Interactive line editing on a raw-mode terminal.
//!
//! The editor keeps the cursor at the end of the line. Besides plain typing it
//! understands these keys:
//!
//! | Key            | Effect                                        |
//! |----------------|-----------------------------------------------|
//! | `Backspace`    | Delete the last character                     |
//! | `Ctrl-U`       | Clear the line                                |
//! | `Ctrl-C`       | Discard the line and start a new one          |
//! | `Ctrl-D`       | End of input, on an empty line only           |
//! | `Up` / `Down`  | Walk the history                              |
//! | `Tab`          | Complete the word being typed                 |
//! | `?`            | Describe what may follow the current line     |

use std::io::{stdout, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::{execute, queue};
use itertools::Itertools;
use log::debug;

use iscli_core::editor::{Assist, LineEditor};
use iscli_core::error::Result;
use iscli_core::history::History;

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Disable raw mode on drop
        let _ = disable_raw_mode();
    }
}

/// What the read loop does after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing visible changed.
    Ignore,
    /// Repaint the prompt and buffer.
    Redraw,
    /// Print text below the line, then repaint.
    Show(String),
    /// Abandon the line and start over on a fresh one.
    Discard,
    /// The line is finished.
    Submit(String),
    EndOfInput,
}

/// The line being edited, plus where the user is in the history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineState {
    pub buffer: String,
    /// Index into the history; equal to its length while on a fresh line.
    history_index: usize,
    /// Whatever was typed before walking into the history.
    draft: String,
}

impl LineState {
    #[must_use]
    pub fn new(history: &History) -> Self {
        Self {
            history_index: history.len(),
            ..Self::default()
        }
    }

    /// Applies one key press.
    pub fn handle_key(&mut self, key: KeyEvent, history: &History, assist: &dyn Assist) -> Action {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Enter => Action::Submit(std::mem::take(&mut self.buffer)),
            KeyCode::Char('c') if control => {
                self.buffer.clear();
                self.history_index = history.len();
                Action::Discard
            }
            KeyCode::Char('d') if control => {
                if self.buffer.is_empty() {
                    Action::EndOfInput
                } else {
                    Action::Ignore
                }
            }
            KeyCode::Char('u') if control => {
                self.buffer.clear();
                Action::Redraw
            }
            KeyCode::Char('?') => {
                let mut help = Vec::new();
                match assist.describe(&self.buffer, &mut help) {
                    Ok(()) => Action::Show(String::from_utf8_lossy(&help).into_owned()),
                    Err(e) => {
                        debug!("Describe failed: {e}");
                        Action::Ignore
                    }
                }
            }
            KeyCode::Tab => self.complete(assist),
            KeyCode::Backspace => {
                if self.buffer.pop().is_some() {
                    Action::Redraw
                } else {
                    Action::Ignore
                }
            }
            KeyCode::Up => self.walk_history(history, true),
            KeyCode::Down => self.walk_history(history, false),
            KeyCode::Char(c) if !control => {
                self.buffer.push(c);
                Action::Redraw
            }
            _ => Action::Ignore,
        }
    }

    fn complete(&mut self, assist: &dyn Assist) -> Action {
        let word = current_word(&self.buffer).to_string();
        let candidates = assist.complete(&self.buffer, &word);
        debug!("Completing `{word}` with {candidates:?}");

        match candidates.as_slice() {
            [] => Action::Ignore,
            [single] => {
                self.replace_word(&format!("{single} "));
                Action::Redraw
            }
            _ => {
                let prefix = common_prefix(&candidates);
                if prefix.len() > word.len() {
                    self.replace_word(prefix);
                    Action::Redraw
                } else {
                    Action::Show(format!("{}\n", candidates.iter().join("  ")))
                }
            }
        }
    }

    fn replace_word(&mut self, replacement: &str) {
        let keep = self.buffer.len() - current_word(&self.buffer).len();
        self.buffer.truncate(keep);
        self.buffer.push_str(replacement);
    }

    fn walk_history(&mut self, history: &History, back: bool) -> Action {
        let fresh = history.len();

        let index = if back {
            if self.history_index == 0 {
                return Action::Ignore;
            }
            self.history_index - 1
        } else {
            if self.history_index >= fresh {
                return Action::Ignore;
            }
            self.history_index + 1
        };

        if self.history_index == fresh {
            self.draft = self.buffer.clone();
        }
        self.history_index = index;
        self.buffer = match history.get(index) {
            Some(entry) => entry.to_string(),
            None => self.draft.clone(),
        };
        Action::Redraw
    }
}

/// The trailing word of `line`, empty if it ends in whitespace.
#[must_use]
pub fn current_word(line: &str) -> &str {
    line.rsplit(char::is_whitespace).next().unwrap_or_default()
}

/// The longest prefix shared by every candidate.
#[must_use]
pub fn common_prefix(candidates: &[String]) -> &str {
    let Some((first, rest)) = candidates.split_first() else {
        return "";
    };

    let mut len = first.len();
    for candidate in rest {
        len = first
            .char_indices()
            .zip(candidate.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map_or(0, |((i, a), _)| i + a.len_utf8())
            .min(len);
    }
    &first[..len]
}

/// Line editor for an interactive terminal.
pub struct TerminalEditor {
    history: History,
}

impl TerminalEditor {
    #[must_use]
    pub fn new(history: History) -> Self {
        Self { history }
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }
}

fn redraw(out: &mut impl Write, prompt: &str, buffer: &str) -> Result<()> {
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(prompt),
        Print(buffer)
    )?;
    out.flush()?;
    Ok(())
}

impl LineEditor for TerminalEditor {
    fn read_line(&mut self, prompt: &str, assist: &dyn Assist) -> Result<Option<String>> {
        let mut stdout = stdout();

        enable_raw_mode()?;
        let _raw_mode_guard = RawModeGuard; // When this goes out of scope, raw mode is disabled

        let mut state = LineState::new(&self.history);
        redraw(&mut stdout, prompt, &state.buffer)?;

        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match state.handle_key(key, &self.history, assist) {
                Action::Ignore => {}
                Action::Redraw => redraw(&mut stdout, prompt, &state.buffer)?,
                Action::Show(text) => {
                    // Raw mode does not return the carriage on its own
                    execute!(stdout, Print("\r\n"), Print(text.replace('\n', "\r\n")))?;
                    redraw(&mut stdout, prompt, &state.buffer)?;
                }
                Action::Discard => {
                    execute!(stdout, Print("^C\r\n"))?;
                    redraw(&mut stdout, prompt, &state.buffer)?;
                }
                Action::Submit(line) => {
                    execute!(stdout, Print("\r\n"))?;
                    return Ok(Some(line));
                }
                Action::EndOfInput => {
                    execute!(stdout, Print("\r\n"))?;
                    return Ok(None);
                }
            }
        }
    }

    fn add_history(&mut self, line: &str) {
        self.history.add(line);
    }
}

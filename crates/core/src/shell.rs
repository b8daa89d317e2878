//! Shell orchestration.
//!
//! A [`Shell`] owns one command tree and a prompt. Lines are resolved against
//! the tree and either dispatched to a handler, described (trailing `?`), or
//! reported as unrecognized or ambiguous. Handlers can hand control to a
//! nested shell, whose loop runs until it exits or input ends.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use log::{debug, info, warn};

use crate::command_set::{CommandOptions, CommandSet};
use crate::converter::Value;
use crate::editor::{Assist, LineEditor};
use crate::error::{Error, Result};
use crate::expand::{expand, Expansion};
use crate::grammar::compile;
use crate::handler::{Invocation, Outcome};
use crate::node::Node;

const UNRECOGNIZED: &str = "% Unrecognized command";
const CR: &str = "<cr>";

#[derive(Debug)]
pub struct Shell {
    root: Node,
    prompt: String,
    modes: BTreeMap<String, Shell>,
}

impl Shell {
    pub fn new(prompt: &str) -> Self {
        Self {
            root: Node::root(),
            prompt: prompt.to_string(),
            modes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Attaches a nested shell, entered when a handler returns
    /// [`Outcome::Enter`] with `name`.
    pub fn add_mode(&mut self, name: &str, shell: Shell) -> &mut Self {
        self.modes.insert(name.to_string(), shell);
        self
    }

    #[must_use]
    pub fn mode(&self, name: &str) -> Option<&Shell> {
        self.modes.get(name)
    }

    pub fn mode_mut(&mut self, name: &str) -> Option<&mut Shell> {
        self.modes.get_mut(name)
    }

    /// Compiles and merges a batch of commands into this shell.
    ///
    /// The batch is built into a fresh tree first and then folded into a copy
    /// of the current one. If any command fails to compile, or the batch's
    /// load callback fails, the shell keeps its previous tree.
    ///
    /// # Errors
    ///
    /// Returns the first compile, merge or callback error.
    pub fn load(&mut self, commands: &CommandSet) -> Result<()> {
        let previous = self.root.clone();

        match self.load_batch(commands) {
            Ok(()) => {
                info!(
                    "Loaded {} commands into shell `{}`",
                    commands.len(),
                    self.prompt
                );
                Ok(())
            }
            Err(e) => {
                warn!("Rolling back shell `{}` after failed load: {e}", self.prompt);
                self.root = previous;
                Err(e)
            }
        }
    }

    fn load_batch(&mut self, commands: &CommandSet) -> Result<()> {
        let mut batch = Node::root();
        for command in commands.commands() {
            let tokens = compile(&command.spec, &command.help)?;
            batch.build(&tokens, &command.handler, command.options.hidden);
        }

        let mut root = self.root.clone();
        root.merge(batch)?;
        self.root = root;

        if let Some(callback) = commands.on_load_callback() {
            callback(self)?;
        }
        Ok(())
    }

    /// Registers a single command.
    ///
    /// # Errors
    ///
    /// Returns an error if the specification does not compile.
    pub fn register<F>(
        &mut self,
        handler: F,
        spec: &str,
        help: &[&str],
        options: CommandOptions,
    ) -> Result<()>
    where
        F: Fn(&mut Invocation<'_>) -> Result<Outcome> + 'static,
    {
        let mut commands = CommandSet::new();
        commands.add(handler, spec, help, options);
        self.load(&commands)
    }

    /// Splits a line into fragments, honouring shell quoting.
    ///
    /// A line with unbalanced quotes yields `None`.
    #[must_use]
    pub fn parse(&self, line: &str) -> Option<Vec<String>> {
        match shell_words::split(line.trim()) {
            Ok(fragments) => Some(fragments),
            Err(e) => {
                debug!("Cannot split `{line}`: {e}");
                None
            }
        }
    }

    /// Expands a line against this shell's tree.
    #[must_use]
    pub fn expand(&self, fragments: &[String], lookahead: bool) -> Vec<Expansion<'_>> {
        expand(&self.root, fragments, lookahead)
    }

    /// Executes a line.
    ///
    /// Unrecognized and ambiguous lines are reported to `out` and yield
    /// [`Outcome::Continue`].
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails, or whatever the handler
    /// reports.
    pub fn dispatch(&self, line: &str, out: &mut dyn Write) -> Result<Outcome> {
        let Some(fragments) = self.parse(line) else {
            self.error_unrecognized(line, out)?;
            return Ok(Outcome::Continue);
        };

        let mut expansions = self.expand(&fragments, false);
        if expansions.len() > 1 {
            self.error_ambiguous(line, out)?;
            return Ok(Outcome::Continue);
        }

        let Some(expansion) = expansions.pop() else {
            self.error_unrecognized(line, out)?;
            return Ok(Outcome::Continue);
        };

        let Some(handler) = expansion.last().and_then(Node::handler) else {
            self.error_unrecognized(line, out)?;
            return Ok(Outcome::Continue);
        };

        let args: Vec<Value> = expansion
            .path
            .iter()
            .zip(&expansion.nodes)
            .filter(|(_, node)| node.element().is_argument)
            .map(|(value, _)| value.clone())
            .collect();

        debug!("Dispatching `{line}` to `{}` with {args:?}", handler.name());
        let mut invocation = Invocation { line, args, out };
        handler.call(&mut invocation)
    }

    /// Writes contextual help for a partial line.
    ///
    /// A line that is empty or ends in whitespace asks what may come next;
    /// otherwise the last word is being completed. A `<cr>` entry marks a line
    /// that is already a complete command.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn describe(&self, line: &str, out: &mut dyn Write) -> io::Result<()> {
        let extra = line.is_empty() || line.ends_with(char::is_whitespace);
        debug!("Describing `{line}`");

        let Some(fragments) = self.parse(line) else {
            writeln!(out, "{line}")?;
            return self.error_unrecognized(line, out);
        };

        let mut candidates = self.expand(&fragments, extra);
        if candidates.is_empty() {
            writeln!(out, "{line}")?;
            return self.error_unrecognized(line, out);
        }

        let mut complete: Option<Vec<Value>> = None;
        if extra {
            let mut exact = self.expand(&fragments, false);
            if exact.len() > 1 {
                return self.error_ambiguous(line, out);
            }
            complete = exact.pop().map(|expansion| expansion.path);
        }

        candidates.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then_with(|| a.last().map(Node::keyword).cmp(&b.last().map(Node::keyword)))
        });

        let mut print_cr = false;
        for candidate in &candidates {
            let Some(node) = candidate.last() else {
                continue;
            };
            if node.is_hidden() {
                continue;
            }

            if extra && node.handler().is_some() && complete.as_ref() == Some(&candidate.path) {
                print_cr = true;
                continue;
            }

            let shown = candidate
                .path
                .last()
                .map_or_else(String::new, ToString::to_string);
            writeln!(out, "  {shown}\t{}", node.element().description)?;
        }

        if print_cr {
            writeln!(out, "  {CR}")?;
        }
        writeln!(out)
    }

    /// Lists the keywords that can complete `word`, the word being typed at
    /// the end of `line`.
    ///
    /// Typed arguments cannot be completed, so only literal keywords are
    /// offered.
    #[must_use]
    pub fn complete(&self, line: &str, word: &str) -> Vec<String> {
        let Some(fragments) = self.parse(line) else {
            return Vec::new();
        };

        let extra = word.trim().is_empty();
        if !extra && fragments.is_empty() {
            return Vec::new();
        }
        let position = if extra {
            fragments.len()
        } else {
            fragments.len() - 1
        };

        let keywords: BTreeSet<String> = self
            .expand(&fragments, extra)
            .iter()
            .filter_map(|expansion| expansion.nodes.get(position).copied())
            .filter(|node| node.element().converter.is_none() && !node.is_hidden())
            .map(|node| node.keyword().to_string())
            .collect();

        debug!("Completions for `{line}`: {keywords:?}");
        keywords.into_iter().collect()
    }

    /// Runs the read, dispatch loop until input ends or a handler exits.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails, if a
    /// handler fails with anything other than [`Error::Command`], or if a
    /// handler asks for a nested shell that does not exist.
    pub fn run(&mut self, editor: &mut dyn LineEditor, out: &mut dyn Write) -> Result<()> {
        loop {
            let Some(line) = editor.read_line(&self.prompt, &*self)? else {
                debug!("End of input for shell `{}`", self.prompt);
                break;
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.ends_with('?') {
                self.describe(line.trim_end_matches('?'), out)?;
                continue;
            }

            editor.add_history(line);

            match self.dispatch(line, out) {
                Ok(Outcome::Continue) => {}
                Ok(Outcome::Exit) => {
                    info!("Leaving shell `{}`", self.prompt);
                    break;
                }
                Ok(Outcome::Enter(name)) => self.enter(&name, editor, out)?,
                Err(Error::Command(message)) => {
                    warn!("Command `{line}` failed: {message}");
                    writeln!(out, "% {message}\n")?;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// Runs the nested shell registered as `name` until it ends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMode`] if there is no such shell, or whatever
    /// ends the nested loop.
    pub fn enter(
        &mut self,
        name: &str,
        editor: &mut dyn LineEditor,
        out: &mut dyn Write,
    ) -> Result<()> {
        let mode = self
            .modes
            .get_mut(name)
            .ok_or_else(|| Error::UnknownMode(name.to_string()))?;

        info!("Entering shell `{name}`");
        mode.run(editor, out)
    }

    fn error_unrecognized(&self, line: &str, out: &mut dyn Write) -> io::Result<()> {
        debug!("Unrecognized command `{line}` in shell `{}`", self.prompt);
        writeln!(out, "{UNRECOGNIZED}\n")
    }

    fn error_ambiguous(&self, line: &str, out: &mut dyn Write) -> io::Result<()> {
        debug!("Ambiguous command `{line}` in shell `{}`", self.prompt);
        writeln!(out, "% Ambiguous command: \"{line}\"\n")
    }
}

impl Assist for Shell {
    fn complete(&self, line: &str, word: &str) -> Vec<String> {
        Shell::complete(self, line, word)
    }

    fn describe(&self, line: &str, out: &mut dyn Write) -> io::Result<()> {
        Shell::describe(self, line, out)
    }
}

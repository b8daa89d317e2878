//! Batches of commands waiting to be loaded into a shell.

use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::Result;
use crate::handler::{Handler, Invocation, Outcome};
use crate::shell::Shell;

/// Per-command registration options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandOptions {
    /// Dispatchable, but left out of help listings and completion.
    pub hidden: bool,
}

impl CommandOptions {
    #[must_use]
    pub fn hidden() -> Self {
        Self { hidden: true }
    }
}

/// A command as registered, before compilation.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub handler: Handler,
    pub spec: String,
    pub help: Vec<String>,
    pub options: CommandOptions,
}

type LoadCallback = dyn Fn(&mut Shell) -> Result<()>;

/// A group of commands loaded into a [`Shell`] as one unit.
///
/// Commands are keyed by their specification, so adding the same
/// specification twice keeps only the later handler.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use iscli_core::command_set::{CommandOptions, CommandSet};
/// use iscli_core::handler::Outcome;
/// use iscli_core::shell::Shell;
///
/// let mut commands = CommandSet::new();
/// commands.install("hello world", &["Say hello", "To the world"], |inv| {
///     writeln!(inv.out, "Hello World!")?;
///     Ok(Outcome::Continue)
/// });
///
/// let mut shell = Shell::new("> ");
/// shell.load(&commands)?;
///
/// let mut out = Vec::new();
/// shell.dispatch("he wo", &mut out)?;
/// assert_eq!(String::from_utf8_lossy(&out), "Hello World!\n");
/// # Ok::<(), iscli_core::error::Error>(())
/// ```
#[derive(Default)]
pub struct CommandSet {
    commands: IndexMap<String, CommandSpec>,
    on_load: Option<Rc<LoadCallback>>,
}

impl CommandSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command.
    ///
    /// `help` holds one description per token of `spec`, in order.
    pub fn add<F>(&mut self, handler: F, spec: &str, help: &[&str], options: CommandOptions) -> &mut Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<Outcome> + 'static,
    {
        let command = CommandSpec {
            handler: Handler::new(spec, handler),
            spec: spec.to_string(),
            help: help.iter().map(ToString::to_string).collect(),
            options,
        };
        self.commands.insert(spec.to_string(), command);
        self
    }

    /// Adds a command with default options.
    pub fn install<F>(&mut self, spec: &str, help: &[&str], handler: F) -> &mut Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<Outcome> + 'static,
    {
        self.add(handler, spec, help, CommandOptions::default())
    }

    /// Sets a callback run with the shell once this set has been loaded.
    pub fn on_load<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut Shell) -> Result<()> + 'static,
    {
        self.on_load = Some(Rc::new(callback));
        self
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn on_load_callback(&self) -> Option<Rc<LoadCallback>> {
        self.on_load.clone()
    }
}

impl Debug for CommandSet {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("CommandSet")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field("on_load", &self.on_load.is_some())
            .finish()
    }
}

use std::fmt::{Debug, Formatter};
use std::io::Write;
use std::rc::Rc;

use crate::converter::Value;
use crate::error::Result;

/// What the shell loop should do once a handler returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Read the next line at the current level.
    Continue,
    /// End the loop level that dispatched this command.
    Exit,
    /// Run the nested shell registered under this name, then resume here.
    Enter(String),
}

/// Everything a handler gets to see about the command being run.
pub struct Invocation<'a> {
    /// The line as typed, abbreviations included.
    pub line: &'a str,
    /// Matched fragments of argument elements, in the order they were typed.
    pub args: Vec<Value>,
    pub out: &'a mut dyn Write,
}

impl Invocation<'_> {
    /// The argument at `index` as a word, if it is one.
    #[must_use]
    pub fn word(&self, index: usize) -> Option<&str> {
        self.args.get(index).and_then(Value::as_str)
    }

    /// The argument at `index` as an integer, if it is one.
    #[must_use]
    pub fn integer(&self, index: usize) -> Option<i64> {
        self.args.get(index).and_then(Value::as_integer)
    }
}

type HandlerFn = dyn Fn(&mut Invocation<'_>) -> Result<Outcome>;

/// A command handler attached to a tree endpoint.
///
/// Cloning shares the underlying function, so one handler can sit at every
/// path its specification expands to.
#[derive(Clone)]
pub struct Handler {
    name: String,
    function: Rc<HandlerFn>,
}

impl Handler {
    pub fn new<F>(name: &str, function: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> Result<Outcome> + 'static,
    {
        Self {
            name: name.to_string(),
            function: Rc::new(function),
        }
    }

    /// The command specification this handler was registered with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the handler.
    ///
    /// # Errors
    ///
    /// Whatever the handler itself reports.
    pub fn call(&self, invocation: &mut Invocation<'_>) -> Result<Outcome> {
        (self.function)(invocation)
    }

    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.function, &other.function)
    }
}

impl Debug for Handler {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "Handler({:?})", self.name)
    }
}

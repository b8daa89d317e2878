//! Command specification compiler.
//!
//! A specification such as `sshfs HOSTNAME ({username USERNAME | port <1-65535>}|)`
//! is scanned left to right into a sequence of [`Token`]s: plain elements and
//! nested groups. Help texts are handed out one per produced element, in the
//! order the elements appear.

use std::rc::Rc;

use itertools::Itertools;
use log::debug;

use crate::element::{Element, Group, GroupKind, Token};
use crate::error::{Error, Result};

/// Largest permutation group accepted; expansion cost is factorial in this.
pub const MAX_PERMUTATION_BRANCHES: usize = 6;

/// A group still being scanned.
struct OpenGroup {
    kind: GroupKind,
    branches: Vec<Vec<Token>>,
    current: Vec<Token>,
}

struct Compiler<'a> {
    spec: &'a str,
    descriptions: std::slice::Iter<'a, String>,
    elements: Vec<Token>,
    groups: Vec<OpenGroup>,
    pending: String,
}

impl<'a> Compiler<'a> {
    fn branch(&mut self) -> &mut Vec<Token> {
        match self.groups.last_mut() {
            Some(group) => &mut group.current,
            None => &mut self.elements,
        }
    }

    /// Turns the pending characters, if any, into an element.
    fn consume(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let argspec = std::mem::take(&mut self.pending);
        let description = self.descriptions.next().map_or("", String::as_str);
        let element = Element::new(&argspec, description, !self.groups.is_empty());
        self.branch().push(Token::Element(Rc::new(element)));
    }

    fn push_group(&mut self, kind: GroupKind) {
        self.consume();
        self.groups.push(OpenGroup {
            kind,
            branches: Vec::new(),
            current: Vec::new(),
        });
    }

    fn pop_group(&mut self, kind: GroupKind) -> Result<()> {
        self.consume();
        let mut group = match self.groups.pop() {
            Some(group) if group.kind == kind => group,
            _ => return Err(Error::unbalanced(self.spec)),
        };
        group.branches.push(group.current);

        if group.kind == GroupKind::Permutation && group.branches.len() > MAX_PERMUTATION_BRANCHES {
            return Err(Error::TooManyBranches {
                spec: self.spec.to_string(),
                branches: group.branches.len(),
                limit: MAX_PERMUTATION_BRANCHES,
            });
        }

        self.branch().push(Token::Group(Group {
            kind,
            branches: group.branches,
        }));
        Ok(())
    }

    fn next_branch(&mut self) -> Result<()> {
        self.consume();
        match self.groups.last_mut() {
            Some(group) => {
                let branch = std::mem::take(&mut group.current);
                group.branches.push(branch);
                Ok(())
            }
            None => Err(Error::unbalanced(self.spec)),
        }
    }
}

/// Compiles a command specification into its token sequence.
///
/// # Errors
///
/// Returns [`Error::UnbalancedGrammar`] when group markers do not pair up,
/// and [`Error::TooManyBranches`] for an oversized permutation group.
///
/// # Examples
///
/// ```
/// use iscli_core::grammar::compile;
///
/// let help = vec!["Show running system information".to_string()];
/// let tokens = compile("show (system|version)", &help)?;
/// assert_eq!(tokens.len(), 2);
/// # Ok::<(), iscli_core::error::Error>(())
/// ```
pub fn compile(spec: &str, descriptions: &[String]) -> Result<Vec<Token>> {
    let spec = spec.trim();
    let mut compiler = Compiler {
        spec,
        descriptions: descriptions.iter(),
        elements: Vec::new(),
        groups: Vec::new(),
        pending: String::new(),
    };

    for c in spec.chars() {
        match c {
            '(' => compiler.push_group(GroupKind::Alternation),
            '{' => compiler.push_group(GroupKind::Permutation),
            ')' => compiler.pop_group(GroupKind::Alternation)?,
            '}' => compiler.pop_group(GroupKind::Permutation)?,
            '|' => compiler.next_branch()?,
            c if c.is_whitespace() => compiler.consume(),
            c => compiler.pending.push(c),
        }
    }
    compiler.consume();

    if !compiler.groups.is_empty() {
        return Err(Error::unbalanced(spec));
    }

    debug!(
        "Compiled `{spec}` into `{}`",
        compiler.elements.iter().join(" ")
    );
    Ok(compiler.elements)
}

use std::fmt::{Display, Formatter};
use std::rc::Rc;

use itertools::Itertools;

use crate::converter::Converter;

/// Keyword of the synthetic element anchoring every command tree.
pub const ROOT_KEYWORD: &str = "_root";

/// Leading marker turning an argument into a vararg.
const RECURSIVE_MARKER: char = '.';

/// One compiled unit of a command specification.
///
/// An element can belong to several tree nodes, e.g. when a permutation group
/// places the same branch at different depths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Token as written in the specification.
    pub argspec: String,
    /// What is displayed to, and matched against, the user.
    pub keyword: String,
    pub description: String,
    /// Present when the keyword is a typed placeholder.
    pub converter: Option<Converter>,
    /// Included in the arguments passed to the command handler.
    pub is_argument: bool,
    /// May consume its own slot repeatedly.
    pub is_recursive: bool,
}

impl Element {
    pub fn new(argspec: &str, description: &str, in_group: bool) -> Self {
        let keyword = argspec.trim_start_matches(RECURSIVE_MARKER).to_string();
        let converter = Converter::resolve(&keyword);

        Self {
            argspec: argspec.to_string(),
            is_argument: in_group || converter.is_some(),
            is_recursive: argspec.starts_with(RECURSIVE_MARKER),
            keyword,
            description: description.to_string(),
            converter,
        }
    }

    #[must_use]
    pub fn root() -> Self {
        Self::new(ROOT_KEYWORD, "", false)
    }
}

impl Display for Element {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.keyword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// `( a | b )`: exactly one branch; an empty branch makes the group optional.
    Alternation,
    /// `{ a | b }`: any non-empty ordered subset of the branches.
    Permutation,
}

impl GroupKind {
    #[must_use]
    pub fn open(self) -> char {
        match self {
            Self::Alternation => '(',
            Self::Permutation => '{',
        }
    }

    #[must_use]
    pub fn close(self) -> char {
        match self {
            Self::Alternation => ')',
            Self::Permutation => '}',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: GroupKind,
    pub branches: Vec<Vec<Token>>,
}

impl Display for Group {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let branches = self
            .branches
            .iter()
            .map(|branch| branch.iter().join(" "))
            .join(" | ");
        write!(formatter, "{}{}{}", self.kind.open(), branches, self.kind.close())
    }
}

/// Output unit of the grammar compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Element(Rc<Element>),
    Group(Group),
}

impl Display for Token {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Element(element) => formatter.write_str(&element.argspec),
            Self::Group(group) => group.fmt(formatter),
        }
    }
}

impl Token {
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Group(_) => None,
        }
    }

    #[must_use]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Element(_) => None,
        }
    }
}
